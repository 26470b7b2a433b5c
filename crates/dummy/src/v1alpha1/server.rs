use super::{ComputeDoubleRequest, ComputeDoubleResponse};
use crate::internal;

transport::versioned_api! {
    /// Serves `dummy.v1alpha1` on top of the shared [`internal::ServerInterface`].
    pub struct VersionedServer;
    version = "v1alpha1";
    service = "dummy.v1alpha1.Dummy";
    implementation = internal::ServerInterface;

    /// Doubles a 32-bit integer. Fails with `Internal` when the result does
    /// not fit in 32 bits.
    rpc ComputeDouble(ComputeDoubleRequest) -> ComputeDoubleResponse
        as compute_double(internal::ComputeDoubleRequest) -> internal::ComputeDoubleResponse;
}
