//! Startup-time wiring errors.
//!
//! Per-call failures are [`apigroup::Status`] values; everything here happens
//! before the server starts serving and is fatal to the composition root.

use apigroup::{OperationName, ServiceName};
use thiserror::Error;

/// A service could not be bound into the method table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistrationError {
    /// The service namespace is already bound on this server.
    ///
    /// This is what registering the same versioned adapter twice produces.
    #[error("service '{service}' is already registered")]
    DuplicateService {
        /// The namespace that was already present.
        service: ServiceName,
    },

    /// One service declares the same operation name twice.
    #[error("operation '{operation}' is declared twice in service '{service}'")]
    DuplicateOperation {
        /// The service being built.
        service: ServiceName,
        /// The repeated operation name.
        operation: OperationName,
    },

    /// A service declares no operations at all.
    #[error("service '{service}' declares no operations")]
    EmptyService {
        /// The service being built.
        service: ServiceName,
    },

    #[error("invalid service name '{0}'")]
    InvalidServiceName(String),

    #[error("invalid operation name '{0}'")]
    InvalidOperationName(String),
}

/// A method path that is not of the form `/<service>/<Operation>`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed method path '{0}': expected '/<service>/<Operation>'")]
pub struct MethodPathError(pub String);
