//! Wire shapes of `dummy.v1alpha1`.
//!
//! The first published revision: `ComputeDouble` only, with 32-bit fields.
//! Absent fields decode to zero.

use serde::{Deserialize, Serialize};

mod conversion;
mod server;

pub use server::VersionedServer;

/// `ComputeDouble` input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeDoubleRequest {
    /// The number to double.
    pub input32: i32,
}

/// `ComputeDouble` output. Fails to encode when the result exceeds 32 bits.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeDoubleResponse {
    /// The doubled number.
    pub response32: i32,
}
