//! The generic body of every versioned operation.
//!
//! A versioned adapter method is always the same three steps, differing only in
//! types: convert the wire request, invoke the internal implementation tagged
//! with the adapter's version, convert the internal response. [`call_versioned`]
//! is that composition, written once. Adapters (hand-written or produced by
//! `transport::versioned_api!`) supply the types and the invocation closure.

use std::future::Future;

use crate::convert::Convert;
use crate::errors::{ConversionError, Status};

/// Which half of a call a conversion failure happened in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConversionStage {
    /// Wire request → internal request. The implementation was not invoked.
    Request,
    /// Internal response → wire response. The implementation ran, but its
    /// result is not representable in this version.
    Response,
}

impl ConversionStage {
    /// Maps a conversion failure onto the status returned to the caller.
    ///
    /// Request-side failures are the caller's fault (`InvalidArgument`);
    /// response-side failures are the server's (`Internal`).
    pub fn into_status(self, err: ConversionError) -> Status {
        match self {
            ConversionStage::Request => Status::invalid_argument(format!("invalid request: {err}")),
            ConversionStage::Response => Status::internal(format!(
                "response is not representable in this API version: {err}"
            )),
        }
    }
}

/// Runs one versioned call: `W → I`, `invoke(I) → O`, `O → R`.
///
/// - A request conversion failure returns immediately; `invoke` is never called.
/// - A failure returned by `invoke` is forwarded unchanged and no response
///   conversion is attempted.
/// - A response conversion failure discards the internal response; no partial
///   wire response is produced.
pub async fn call_versioned<W, I, O, R, F, Fut>(request: &W, invoke: F) -> Result<R, Status>
where
    W: Convert<I>,
    O: Convert<R>,
    F: FnOnce(I) -> Fut,
    Fut: Future<Output = Result<O, Status>>,
{
    let internal = <W as Convert<I>>::convert(request).map_err(|err| {
        tracing::debug!(error = %err, "rejecting request that does not convert");
        ConversionStage::Request.into_status(err)
    })?;

    let response = invoke(internal).await?;

    <O as Convert<R>>::convert(&response).map_err(|err| ConversionStage::Response.into_status(err))
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};

    use super::*;
    use crate::errors::Code;

    struct WireCount(i64);
    struct InternalCount(u8);
    struct WireTotal(i16);

    impl Convert<InternalCount> for WireCount {
        fn convert(&self) -> Result<InternalCount, ConversionError> {
            u8::try_from(self.0)
                .map(InternalCount)
                .map_err(|_| ConversionError::out_of_range("count", self.0, "[0, 255]"))
        }
    }

    impl Convert<WireTotal> for InternalCount {
        fn convert(&self) -> Result<WireTotal, ConversionError> {
            if self.0 > 100 {
                return Err(ConversionError::out_of_range("total", self.0, "[0, 100]"));
            }
            Ok(WireTotal(i16::from(self.0)))
        }
    }

    #[tokio::test]
    async fn converts_invokes_and_converts_back() {
        let calls = AtomicUsize::new(0);
        let result: Result<WireTotal, Status> =
            call_versioned(&WireCount(21), |req: InternalCount| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, Status>(InternalCount(req.0 * 2)) }
            })
            .await;

        assert_eq!(result.unwrap().0, 42);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn request_conversion_failure_skips_the_implementation() {
        let calls = AtomicUsize::new(0);
        let result: Result<WireTotal, Status> =
            call_versioned(&WireCount(-1), |req: InternalCount| {
                calls.fetch_add(1, Ordering::SeqCst);
                async move { Ok::<_, Status>(req) }
            })
            .await;

        let status = result.err().unwrap();
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("count"));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn implementation_failure_is_forwarded_unchanged() {
        let failure = Status::unavailable("unavailable");
        let expected = failure.clone();
        let result: Result<WireTotal, Status> =
            call_versioned(&WireCount(1), |_: InternalCount| async move {
                Err::<InternalCount, _>(failure)
            })
            .await;

        assert_eq!(result.err().unwrap(), expected);
    }

    #[tokio::test]
    async fn response_conversion_failure_is_internal() {
        let result: Result<WireTotal, Status> =
            call_versioned(&WireCount(200), |req: InternalCount| async move {
                Ok::<_, Status>(req)
            })
            .await;

        let status = result.err().unwrap();
        assert_eq!(status.code(), Code::Internal);
        assert!(status.message().contains("total"));
    }

    #[test]
    fn missing_request_field_is_the_callers_fault() {
        let status = ConversionStage::Request.into_status(ConversionError::MissingField { field: "poem" });
        assert_eq!(status.code(), Code::InvalidArgument);
        assert!(status.message().contains("'poem'"), "{status}");
    }
}
