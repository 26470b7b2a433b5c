//! Method paths: the `(service namespace, operation)` routing key.

use std::str::FromStr;

use apigroup::{OperationName, ServiceName};
use serde::{Serialize, Serializer};

use crate::errors::MethodPathError;

/// Routing key of one bound method, written `/<service>/<Operation>`
/// (e.g. `/dummy.v1.Dummy/ComputeDouble`).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MethodPath {
    service: ServiceName,
    operation: OperationName,
}

impl MethodPath {
    /// Joins a namespace and an operation into a path.
    pub fn new(service: ServiceName, operation: OperationName) -> Self {
        Self { service, operation }
    }

    /// The service namespace segment.
    pub fn service(&self) -> &ServiceName {
        &self.service
    }

    /// The operation segment.
    pub fn operation(&self) -> &OperationName {
        &self.operation
    }
}

impl FromStr for MethodPath {
    type Err = MethodPathError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let malformed = || MethodPathError(s.to_string());
        let (service, operation) = s
            .strip_prefix('/')
            .and_then(|rest| rest.split_once('/'))
            .ok_or_else(malformed)?;
        Ok(Self {
            service: ServiceName::new(service).ok_or_else(malformed)?,
            operation: OperationName::new(operation).ok_or_else(malformed)?,
        })
    }
}

impl std::fmt::Display for MethodPath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "/{}/{}", self.service, self.operation)
    }
}

impl Serialize for MethodPath {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_displays() {
        let path: MethodPath = "/dummy.v1.Dummy/ComputeDouble".parse().unwrap();
        assert_eq!(path.service().as_str(), "dummy.v1.Dummy");
        assert_eq!(path.operation().as_str(), "ComputeDouble");
        assert_eq!(path.to_string(), "/dummy.v1.Dummy/ComputeDouble");
    }

    #[test]
    fn rejects_malformed_paths() {
        for raw in [
            "",
            "/",
            "dummy.v1.Dummy/ComputeDouble",
            "/dummy.v1.Dummy",
            "/dummy.v1.Dummy/",
            "//ComputeDouble",
            "/dummy/v1/ComputeDouble",
        ] {
            assert!(raw.parse::<MethodPath>().is_err(), "{raw:?} should be rejected");
        }
    }
}
