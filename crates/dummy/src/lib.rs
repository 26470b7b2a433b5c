//! The `dummy` API group.
//!
//! One internal service ([`internal::ServerInterface`]) exposed through two wire
//! versions:
//!
//! | Version | Service namespace | Operations |
//! |---------|-------------------|------------|
//! | [`v1alpha1`] | `dummy.v1alpha1.Dummy` | `ComputeDouble` (32-bit) |
//! | [`v1`] | `dummy.v1.Dummy` | `ComputeDouble` (64-bit), `TellMeAPoem` |
//!
//! Each version module owns its wire shapes, its conversions to and from
//! [`internal`], and a `VersionedServer` adapter generated by
//! [`transport::versioned_api!`]. [`service::DummyService`] is the reference
//! implementation the CLI serves.

use std::sync::Arc;

use apigroup::Version;
use transport::VersionedApi;

pub mod internal;
pub mod service;
pub mod v1;
pub mod v1alpha1;

pub use internal::ServerInterface;
pub use service::DummyService;

/// Builds one adapter per supported version, all sharing `server`.
///
/// Nothing is registered here; the caller threads the adapters into
/// [`VersionedApi::register`] explicitly.
pub fn versioned_apis(server: Arc<dyn ServerInterface>) -> Vec<Arc<dyn VersionedApi>> {
    vec![
        Arc::new(v1alpha1::VersionedServer::new(Arc::clone(&server))),
        Arc::new(v1::VersionedServer::new(server)),
    ]
}

/// Every version this API group serves, oldest first.
pub fn supported_versions() -> [Version; 2] {
    [
        v1alpha1::VersionedServer::<dyn ServerInterface>::VERSION,
        v1::VersionedServer::<dyn ServerInterface>::VERSION,
    ]
}
