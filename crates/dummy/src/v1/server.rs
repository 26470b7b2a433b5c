use super::{ComputeDoubleRequest, ComputeDoubleResponse, TellMeAPoemRequest, TellMeAPoemResponse};
use crate::internal;

transport::versioned_api! {
    /// Serves `dummy.v1` on top of the shared [`internal::ServerInterface`].
    pub struct VersionedServer;
    version = "v1";
    service = "dummy.v1.Dummy";
    implementation = internal::ServerInterface;

    rpc ComputeDouble(ComputeDoubleRequest) -> ComputeDoubleResponse
        as compute_double(internal::ComputeDoubleRequest) -> internal::ComputeDoubleResponse;

    rpc TellMeAPoem(TellMeAPoemRequest) -> TellMeAPoemResponse
        as tell_me_a_poem(internal::TellMeAPoemRequest) -> internal::TellMeAPoemResponse;
}
