//! Core domain for versioned API groups.
//!
//! An *API group* is one internal service exposed through several independently
//! evolving wire versions. This crate holds every concept those versions share:
//! the parsed [`Version`] tag, the [`Convert`] contract between wire and internal
//! shapes, the per-call [`CallContext`], the opaque [`Status`] failure, and the
//! generic [`call_versioned`] composition that every versioned adapter runs.
//!
//! ## Architectural Layer
//!
//! **Domain + port definitions.** This crate has no I/O dependencies. It defines
//! *what* an adapter does; the `transport` crate defines *how* calls reach it.
//!
//! ## Module Layout
//!
//! | Module | Contents |
//! |--------|----------|
//! | [`identifiers`] | Newtype identifiers (`ServiceName`, `OperationName`, `CallId`) |
//! | [`version`] | The immutable [`Version`] tag and its grammar |
//! | [`convert`] | The [`Convert`] trait and narrowing helpers |
//! | [`context`] | [`CallContext`] and [`Cancellation`] |
//! | [`adapter`] | [`call_versioned`]: convert → invoke → convert |
//! | [`errors`] | [`VersionError`], [`ConversionError`], [`Status`] |

pub mod adapter;
pub mod context;
pub mod convert;
pub mod errors;
pub mod identifiers;
pub mod version;

// Re-export everything at the crate root for ergonomic usage by downstream crates.
pub use adapter::{call_versioned, ConversionStage};
pub use context::{CallContext, Cancellation};
pub use convert::{narrow, Convert};
pub use errors::{Code, ConversionError, Status, VersionError, VersionErrorKind};
pub use identifiers::{CallId, OperationName, ServiceName};
pub use version::{Stability, Version};
