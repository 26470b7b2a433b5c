//! The version-agnostic model of the dummy API group.
//!
//! Every wire version maps onto these shapes. They are a superset of what any
//! version can express; anything a version cannot carry is documented on that
//! version's conversions.

use apigroup::{CallContext, Status, Version};
use async_trait::async_trait;

// ---------------------------------------------------------------------------
// ComputeDouble
// ---------------------------------------------------------------------------

/// An integer whose double is representable as `i64`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Operand(i64);

impl Operand {
    /// Smallest accepted operand.
    pub const MIN: i64 = i64::MIN / 2;
    /// Largest accepted operand.
    pub const MAX: i64 = i64::MAX / 2;

    /// Creates an [`Operand`], returning `None` if doubling `value` would
    /// overflow `i64`.
    #[must_use]
    pub fn new(value: i64) -> Option<Self> {
        if (Self::MIN..=Self::MAX).contains(&value) {
            Some(Self(value))
        } else {
            None
        }
    }

    /// Returns the raw value.
    pub fn as_i64(self) -> i64 {
        self.0
    }

    /// Returns `2 * self`. Cannot overflow by construction.
    pub fn doubled(self) -> i64 {
        self.0 * 2
    }
}

/// Every 32-bit value is in range, so widening cannot fail.
impl From<i32> for Operand {
    fn from(value: i32) -> Self {
        Self(i64::from(value))
    }
}

impl std::fmt::Display for Operand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Asks for `input` to be doubled.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeDoubleRequest {
    /// The number to double.
    pub input: Operand,
}

/// The doubled value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComputeDoubleResponse {
    /// `2 * input`.
    pub value: i64,
}

// ---------------------------------------------------------------------------
// TellMeAPoem
// ---------------------------------------------------------------------------

/// Requested shape of the poem.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum PoemForm {
    /// No preference; the implementation picks.
    #[default]
    Any,
    /// Three lines.
    Haiku,
    /// Two rhyming lines.
    Couplet,
}

/// Asks for a short poem.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TellMeAPoemRequest {
    /// Whether the response should carry a title.
    pub want_title: bool,
    /// Preferred form.
    pub form: PoemForm,
}

/// A poem, one entry per line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TellMeAPoemResponse {
    /// `None` when no title was requested or the poem has none.
    pub title: Option<String>,
    /// The poem text, without line terminators.
    pub lines: Vec<String>,
}

// ---------------------------------------------------------------------------
// Service interface
// ---------------------------------------------------------------------------

/// What the dummy service must provide. Consumed by every versioned adapter,
/// implemented elsewhere (see [`crate::service::DummyService`]).
///
/// Each operation receives the caller's [`CallContext`] untouched and the
/// [`Version`] of the adapter the call came through, so behaviour may branch
/// on the caller's API version. Failures are returned as opaque [`Status`]
/// values and reach the caller unchanged.
#[async_trait]
pub trait ServerInterface: Send + Sync {
    /// Doubles the request operand.
    async fn compute_double(
        &self,
        ctx: &CallContext,
        request: ComputeDoubleRequest,
        version: Version,
    ) -> Result<ComputeDoubleResponse, Status>;

    /// Returns a poem in the requested form.
    async fn tell_me_a_poem(
        &self,
        ctx: &CallContext,
        request: TellMeAPoemRequest,
        version: Version,
    ) -> Result<TellMeAPoemResponse, Status>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn operand_bounds_keep_doubling_in_range() {
        assert_eq!(Operand::new(Operand::MAX).unwrap().doubled(), i64::MAX - 1);
        assert_eq!(Operand::new(Operand::MIN).unwrap().doubled(), i64::MIN);
        assert!(Operand::new(Operand::MAX + 1).is_none());
        assert!(Operand::new(Operand::MIN - 1).is_none());
        assert!(Operand::new(i64::MAX).is_none());
    }

    #[test]
    fn every_i32_widens_into_an_operand() {
        for value in [i32::MIN, -1, 0, 1, i32::MAX] {
            assert_eq!(Operand::from(value), Operand::new(i64::from(value)).unwrap());
        }
    }
}
