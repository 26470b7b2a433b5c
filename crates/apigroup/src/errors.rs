//! Error and status types for versioned API groups.
//!
//! Three failure classes exist and they never mix:
//!
//! - [`VersionError`]: a malformed version literal. Raised at startup only; the
//!   process must not begin serving.
//! - [`ConversionError`]: a value cannot be represented in the destination
//!   schema. Raised per call and surfaced to the caller as a [`Status`].
//! - [`Status`]: the opaque per-call failure. Implementations return it,
//!   adapters forward it untouched, transports map it to their own wire form.

use serde::{Deserialize, Serialize};
use thiserror::Error;

// ---------------------------------------------------------------------------
// Version parsing
// ---------------------------------------------------------------------------

/// The specific grammar rule a version literal violated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum VersionErrorKind {
    /// Nothing to parse.
    #[error("literal is empty")]
    Empty,
    /// The leading `v` is absent.
    #[error("literal must start with 'v'")]
    MissingPrefix,
    /// A major or revision number is absent.
    #[error("expected a decimal number")]
    MissingNumber,
    /// Zero, or a number with a leading zero.
    #[error("numbers must be positive and carry no leading zeros")]
    InvalidNumber,
    /// A number larger than `u32::MAX`.
    #[error("number does not fit in 32 bits")]
    Overflow,
    /// Something other than `alpha` or `beta` follows the major number.
    #[error("qualifier must be 'alpha' or 'beta'")]
    UnknownQualifier,
    /// Input remains after a complete tag.
    #[error("unexpected characters after the revision")]
    TrailingCharacters,
}

/// A version literal that does not match the version grammar.
///
/// This is a configuration or programming error. It is only ever produced
/// while the process is starting up.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("malformed API version '{literal}': {kind}")]
pub struct VersionError {
    /// The literal that failed to parse.
    pub literal: String,
    /// Which grammar rule it violated.
    pub kind: VersionErrorKind,
}

// ---------------------------------------------------------------------------
// Conversion
// ---------------------------------------------------------------------------

/// A source value that cannot be represented in the destination schema.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ConversionError {
    /// A numeric value lies outside the destination's valid range.
    #[error("field '{field}' value {value} is outside the supported range {expected}")]
    OutOfRange {
        /// Destination field name.
        field: &'static str,
        /// The offending value, rendered as text.
        value: String,
        /// The accepted range, rendered as text.
        expected: String,
    },

    /// An enum discriminant the destination schema does not define.
    #[error("field '{field}' has unknown enum value {value}")]
    UnknownEnumValue {
        /// Destination field name.
        field: &'static str,
        /// The raw discriminant received.
        value: i32,
    },

    /// A mandatory field with no valid default is absent.
    ///
    /// Scalar wire fields always decode to their zero value, so the current
    /// versions never raise this. It is reserved for message-typed fields whose
    /// absence the internal model cannot express.
    #[error("required field '{field}' is missing")]
    MissingField {
        /// Destination field name.
        field: &'static str,
    },
}

impl ConversionError {
    /// Builds an [`ConversionError::OutOfRange`] from displayable parts.
    pub fn out_of_range(
        field: &'static str,
        value: impl std::fmt::Display,
        expected: impl std::fmt::Display,
    ) -> Self {
        Self::OutOfRange {
            field,
            value: value.to_string(),
            expected: expected.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Status
// ---------------------------------------------------------------------------

/// Canonical failure codes, modelled on the gRPC status space so that any RPC
/// transport can map them onto its own representation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Code {
    /// The caller or the server shut the call down.
    Cancelled,
    /// An error with no better code.
    Unknown,
    /// The request is malformed or not representable internally.
    InvalidArgument,
    /// The deadline passed before the call completed.
    DeadlineExceeded,
    /// A requested entity does not exist.
    NotFound,
    /// The system is not in a state that allows the call.
    FailedPrecondition,
    /// A value is past the valid range of an operation.
    OutOfRange,
    /// No method is bound at the requested path.
    Unimplemented,
    /// A server-side invariant broke, including unrepresentable responses.
    Internal,
    /// The service cannot currently handle the call.
    Unavailable,
}

impl Code {
    /// Returns the snake_case wire name of this code.
    pub fn as_str(self) -> &'static str {
        match self {
            Code::Cancelled => "cancelled",
            Code::Unknown => "unknown",
            Code::InvalidArgument => "invalid_argument",
            Code::DeadlineExceeded => "deadline_exceeded",
            Code::NotFound => "not_found",
            Code::FailedPrecondition => "failed_precondition",
            Code::OutOfRange => "out_of_range",
            Code::Unimplemented => "unimplemented",
            Code::Internal => "internal",
            Code::Unavailable => "unavailable",
        }
    }
}

impl std::fmt::Display for Code {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The opaque outcome of a failed call.
///
/// Internal implementations return it; versioned adapters pass it through
/// without inspecting, wrapping, or retrying; transports encode it.
#[derive(Debug, Clone, PartialEq, Eq, Error, Serialize, Deserialize)]
#[error("{code}: {message}")]
pub struct Status {
    code: Code,
    message: String,
}

impl Status {
    /// Creates a status with the given code and message.
    pub fn new(code: Code, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// [`Code::Cancelled`] with `message`.
    pub fn cancelled(message: impl Into<String>) -> Self {
        Self::new(Code::Cancelled, message)
    }

    /// [`Code::InvalidArgument`] with `message`.
    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::new(Code::InvalidArgument, message)
    }

    /// [`Code::DeadlineExceeded`] with `message`.
    pub fn deadline_exceeded(message: impl Into<String>) -> Self {
        Self::new(Code::DeadlineExceeded, message)
    }

    /// [`Code::Unimplemented`] with `message`.
    pub fn unimplemented(message: impl Into<String>) -> Self {
        Self::new(Code::Unimplemented, message)
    }

    /// [`Code::Internal`] with `message`.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(Code::Internal, message)
    }

    /// [`Code::Unavailable`] with `message`.
    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::new(Code::Unavailable, message)
    }

    /// Returns the failure code.
    pub fn code(&self) -> Code {
        self.code
    }

    /// Returns the human-readable message.
    pub fn message(&self) -> &str {
        &self.message
    }
}
