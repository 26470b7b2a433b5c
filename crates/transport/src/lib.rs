//! In-process RPC transport for versioned API groups.
//!
//! Owns everything between decoded bytes and a versioned adapter:
//!
//! - [`Server`]: the method table, keyed by `/<service>/<Operation>`, and
//!   [`Server::dispatch`], which decodes the JSON payload, routes it, applies
//!   the caller's deadline and cancellation, and encodes the result.
//! - [`VersionedApi`]: the registration hook every versioned adapter
//!   implements. Registration happens once, at startup, on a `&mut Server`;
//!   serving only needs `&Server`, so nothing can be bound after traffic starts.
//! - [`versioned_api!`]: the template that stamps out one adapter per wire
//!   version from a list of operations.
//! - [`ndjson`]: a line-delimited JSON frame loop used by the CLI to drive a
//!   [`Server`] over stdin/stdout.
//!
//! ## Architectural Layer
//!
//! **Infrastructure.** Encoding, routing, deadlines. The `apigroup` crate sees
//! none of it; API group crates see only [`VersionedApi`] and the macro.

pub mod errors;
pub mod method;
pub mod ndjson;
pub mod registration;
pub mod server;

// The `versioned_api!` expansion names `apigroup` items through this path so
// API group crates do not need to import them.
pub use apigroup;

pub use errors::{MethodPathError, RegistrationError};
pub use method::MethodPath;
pub use registration::VersionedApi;
pub use server::{MethodHandler, MethodInfo, Server, Service, ServiceBuilder};
