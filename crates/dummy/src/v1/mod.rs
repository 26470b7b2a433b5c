//! Wire shapes of `dummy.v1`.
//!
//! Changes from `v1alpha1`:
//!
//! - `ComputeDouble` carries 64-bit values and renames its fields to `value`.
//! - `TellMeAPoem` is new.
//!
//! Absent fields decode to their zero value.

use serde::{Deserialize, Serialize};

mod conversion;
mod server;

pub use server::VersionedServer;

/// `ComputeDouble` input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeDoubleRequest {
    /// The number to double.
    pub value: i64,
}

/// `ComputeDouble` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComputeDoubleResponse {
    /// The doubled number.
    pub value: i64,
}

/// Wire enumeration for [`TellMeAPoemRequest::form`]. Carried as a raw `i32`
/// so that values from newer clients still decode and can be rejected by
/// conversion rather than by the decoder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum PoemForm {
    /// No preference.
    Unspecified = 0,
    /// Three lines.
    Haiku = 1,
    /// Two rhyming lines.
    Couplet = 2,
}

impl PoemForm {
    /// Returns the variant for a raw wire value, if one is defined.
    pub fn from_i32(value: i32) -> Option<Self> {
        match value {
            0 => Some(PoemForm::Unspecified),
            1 => Some(PoemForm::Haiku),
            2 => Some(PoemForm::Couplet),
            _ => None,
        }
    }
}

/// `TellMeAPoem` input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TellMeAPoemRequest {
    /// Whether the response should carry a title.
    pub i_want_a_title: bool,
    /// A [`PoemForm`] discriminant.
    pub form: i32,
}

/// `TellMeAPoem` output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TellMeAPoemResponse {
    /// Empty when the poem has no title.
    pub title: String,
    /// One entry per line.
    pub lines: Vec<String>,
}
