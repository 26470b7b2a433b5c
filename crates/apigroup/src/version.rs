//! The API version tag attached to every call.
//!
//! A [`Version`] is parsed exactly once, when an adapter type is defined, and is
//! immutable afterwards. The grammar is `v<major>` optionally followed by
//! `alpha<n>` or `beta<n>`:
//!
//! | Literal | Major | Stability | Revision |
//! |---------|-------|-----------|----------|
//! | `v1` | 1 | GA | – |
//! | `v1alpha2` | 1 | alpha | 2 |
//! | `v2beta1` | 2 | beta | 1 |
//!
//! Numbers are decimal, at least `1`, carry no leading zeros, and fit in `u32`.
//! This keeps the textual form canonical: `Display` always reproduces the
//! literal a version was parsed from.

use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::errors::{VersionError, VersionErrorKind};

/// Maturity of an API version. Ordered `Alpha < Beta < Stable`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Stability {
    /// `v<N>alpha<M>`: may change or disappear without notice.
    Alpha,
    /// `v<N>beta<M>`: feature complete, wire shape may still change.
    Beta,
    /// `v<N>`: generally available; wire shape is frozen.
    Stable,
}

/// An immutable, comparable API version tag.
///
/// Ordering follows release order: major first, then stability, then revision,
/// so `v1alpha1 < v1beta1 < v1 < v2alpha1`.
// Field order drives the derived `Ord`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Version {
    major: u32,
    stability: Stability,
    revision: u32,
}

impl Version {
    /// Parses a version literal at compile time.
    ///
    /// Intended for `const` items: a malformed literal fails const evaluation,
    /// so an adapter bound to it cannot be built at all.
    ///
    /// # Panics
    ///
    /// Panics if `literal` does not match the version grammar.
    pub const fn from_static(literal: &'static str) -> Self {
        match parse_bytes(literal.as_bytes()) {
            Ok(version) => version,
            Err(_) => panic!("malformed API version literal"),
        }
    }

    /// Returns the major version number.
    pub fn major(self) -> u32 {
        self.major
    }

    /// Returns the stability level.
    pub fn stability(self) -> Stability {
        self.stability
    }

    /// Returns the alpha/beta revision, or `None` for a GA version.
    pub fn revision(self) -> Option<u32> {
        match self.stability {
            Stability::Stable => None,
            Stability::Alpha | Stability::Beta => Some(self.revision),
        }
    }

    /// Returns `true` for a generally available (`v<N>`) version.
    pub fn is_stable(self) -> bool {
        self.stability == Stability::Stable
    }
}

impl FromStr for Version {
    type Err = VersionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        parse_bytes(s.as_bytes()).map_err(|kind| VersionError {
            literal: s.to_string(),
            kind,
        })
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self.stability {
            Stability::Alpha => write!(f, "v{}alpha{}", self.major, self.revision),
            Stability::Beta => write!(f, "v{}beta{}", self.major, self.revision),
            Stability::Stable => write!(f, "v{}", self.major),
        }
    }
}

impl Serialize for Version {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Version {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let literal = String::deserialize(deserializer)?;
        literal.parse().map_err(serde::de::Error::custom)
    }
}

// ---------------------------------------------------------------------------
// Grammar. Written as `const fn` so `from_static` can run in const context.
// ---------------------------------------------------------------------------

const fn parse_bytes(bytes: &[u8]) -> Result<Version, VersionErrorKind> {
    if bytes.is_empty() {
        return Err(VersionErrorKind::Empty);
    }
    if bytes[0] != b'v' {
        return Err(VersionErrorKind::MissingPrefix);
    }

    let (major, mut pos) = match parse_number(bytes, 1) {
        Ok(parsed) => parsed,
        Err(kind) => return Err(kind),
    };
    if pos == bytes.len() {
        return Ok(Version {
            major,
            stability: Stability::Stable,
            revision: 0,
        });
    }

    let stability = if starts_with_at(bytes, pos, b"alpha") {
        pos += 5;
        Stability::Alpha
    } else if starts_with_at(bytes, pos, b"beta") {
        pos += 4;
        Stability::Beta
    } else {
        return Err(VersionErrorKind::UnknownQualifier);
    };

    let (revision, end) = match parse_number(bytes, pos) {
        Ok(parsed) => parsed,
        Err(kind) => return Err(kind),
    };
    if end != bytes.len() {
        return Err(VersionErrorKind::TrailingCharacters);
    }

    Ok(Version {
        major,
        stability,
        revision,
    })
}

/// Parses a positive decimal without leading zeros starting at `start`.
/// Returns the value and the index of the first byte after it.
const fn parse_number(bytes: &[u8], start: usize) -> Result<(u32, usize), VersionErrorKind> {
    let mut pos = start;
    let mut value: u32 = 0;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        if pos == start && bytes[pos] == b'0' {
            return Err(VersionErrorKind::InvalidNumber);
        }
        let digit = (bytes[pos] - b'0') as u32;
        value = match value.checked_mul(10) {
            Some(v) => v,
            None => return Err(VersionErrorKind::Overflow),
        };
        value = match value.checked_add(digit) {
            Some(v) => v,
            None => return Err(VersionErrorKind::Overflow),
        };
        pos += 1;
    }
    if pos == start {
        return Err(VersionErrorKind::MissingNumber);
    }
    Ok((value, pos))
}

const fn starts_with_at(bytes: &[u8], at: usize, prefix: &[u8]) -> bool {
    if bytes.len() - at < prefix.len() {
        return false;
    }
    let mut i = 0;
    while i < prefix.len() {
        if bytes[at + i] != prefix[i] {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    const V1: Version = Version::from_static("v1");

    #[test]
    fn parses_every_stability() {
        let alpha: Version = "v1alpha2".parse().unwrap();
        assert_eq!(alpha.major(), 1);
        assert_eq!(alpha.stability(), Stability::Alpha);
        assert_eq!(alpha.revision(), Some(2));

        let beta: Version = "v3beta1".parse().unwrap();
        assert_eq!(beta.stability(), Stability::Beta);
        assert_eq!(beta.revision(), Some(1));

        assert!(V1.is_stable());
        assert_eq!(V1.revision(), None);
        assert_eq!(V1, "v1".parse().unwrap());
    }

    #[test]
    fn rejects_malformed_literals() {
        let cases = [
            ("", VersionErrorKind::Empty),
            ("1", VersionErrorKind::MissingPrefix),
            ("V1", VersionErrorKind::MissingPrefix),
            ("v", VersionErrorKind::MissingNumber),
            ("valpha1", VersionErrorKind::MissingNumber),
            ("v0", VersionErrorKind::InvalidNumber),
            ("v01", VersionErrorKind::InvalidNumber),
            ("v1alpha0", VersionErrorKind::InvalidNumber),
            ("v1alpha", VersionErrorKind::MissingNumber),
            ("v1gamma1", VersionErrorKind::UnknownQualifier),
            ("v1 ", VersionErrorKind::UnknownQualifier),
            ("v1beta1x", VersionErrorKind::TrailingCharacters),
            ("v4294967296", VersionErrorKind::Overflow),
        ];
        for (literal, expected) in cases {
            let err = literal.parse::<Version>().unwrap_err();
            assert_eq!(err.kind, expected, "literal {literal:?}");
            assert_eq!(err.literal, literal);
        }
    }

    #[test]
    fn orders_by_release() {
        let ordered = ["v1alpha1", "v1alpha2", "v1beta1", "v1", "v2alpha1", "v2beta3", "v2", "v10"];
        let parsed: Vec<Version> = ordered.iter().map(|s| s.parse().unwrap()).collect();
        for pair in parsed.windows(2) {
            assert!(pair[0] < pair[1], "{} < {}", pair[0], pair[1]);
        }
    }

    #[test]
    fn different_literals_never_compare_equal() {
        let a: Version = "v1alpha1".parse().unwrap();
        let b: Version = "v1beta1".parse().unwrap();
        assert_ne!(a, b);
        assert_ne!(a, V1);
    }

    #[test]
    fn serde_uses_the_literal() {
        let json = serde_json::to_string(&V1).unwrap();
        assert_eq!(json, "\"v1\"");
        let back: Version = serde_json::from_str("\"v2beta1\"").unwrap();
        assert_eq!(back.to_string(), "v2beta1");
        assert!(serde_json::from_str::<Version>("\"2\"").is_err());
    }

    proptest! {
        #[test]
        fn display_reproduces_literal(
            major in 1u32..=u32::MAX,
            qualifier in prop::option::of((prop::bool::ANY, 1u32..=u32::MAX)),
        ) {
            let literal = match qualifier {
                None => format!("v{major}"),
                Some((true, rev)) => format!("v{major}alpha{rev}"),
                Some((false, rev)) => format!("v{major}beta{rev}"),
            };
            let version: Version = literal.parse().unwrap();
            prop_assert_eq!(version.to_string(), literal);
        }
    }
}
