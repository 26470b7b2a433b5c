//! The registration hook and the versioned adapter template.

use std::sync::Arc;

use apigroup::Version;

use crate::errors::RegistrationError;
use crate::server::Server;

/// One wire version of an API group, ready to be bound into a [`Server`].
///
/// Implemented by every adapter produced by [`versioned_api!`](crate::versioned_api).
/// The composition root builds each adapter explicitly and calls
/// [`VersionedApi::register`] once per adapter before serving starts.
pub trait VersionedApi: Send + Sync {
    /// The version tag every call through this adapter carries.
    fn version(&self) -> Version;

    /// The service namespace this adapter binds its operations under.
    fn service_name(&self) -> &'static str;

    /// Binds every operation of this adapter into `server`.
    ///
    /// Registering an adapter whose namespace is already bound (including the
    /// same adapter a second time) fails with
    /// [`RegistrationError::DuplicateService`] and binds nothing.
    fn register(self: Arc<Self>, server: &mut Server) -> Result<(), RegistrationError>;
}

/// Defines one versioned adapter.
///
/// ```ignore
/// transport::versioned_api! {
///     /// Adapter for `dummy.v1`.
///     pub struct VersionedServer;
///     version = "v1";
///     service = "dummy.v1.Dummy";
///     implementation = crate::internal::ServerInterface;
///
///     rpc ComputeDouble(ComputeDoubleRequest) -> ComputeDoubleResponse
///         as compute_double(internal::ComputeDoubleRequest) -> internal::ComputeDoubleResponse;
/// }
/// ```
///
/// expands to:
///
/// - `struct VersionedServer<S: ?Sized>` holding an `Arc<S>` to the shared
///   implementation, with `VERSION` parsed from the literal at compile time (a
///   malformed literal does not compile) and `SERVICE`;
/// - one `async fn compute_double(&self, &CallContext, &ComputeDoubleRequest)`
///   per `rpc` line, running [`apigroup::call_versioned`] against
///   `S::compute_double(ctx, request, VERSION)`;
/// - a [`VersionedApi`] impl binding every `rpc` under `service`.
///
/// Every conversion named by an `rpc` line must exist as an
/// [`apigroup::Convert`] impl.
#[macro_export]
macro_rules! versioned_api {
    (
        $(#[$attr:meta])*
        $vis:vis struct $name:ident;
        version = $version:literal;
        service = $service:literal;
        implementation = $server:path;
        $(
            $(#[$op_attr:meta])*
            rpc $op:ident($wire_req:ty) -> $wire_resp:ty
                as $method:ident($int_req:ty) -> $int_resp:ty;
        )+
    ) => {
        // Unnamed consts are always evaluated, so a bad literal fails the build
        // even if the adapter is never instantiated.
        const _: $crate::apigroup::Version = $crate::apigroup::Version::from_static($version);

        $(#[$attr])*
        $vis struct $name<S: ?Sized> {
            server: ::std::sync::Arc<S>,
        }

        impl<S: ?Sized> $name<S> {
            /// Version tag attached to every call through this adapter.
            pub const VERSION: $crate::apigroup::Version =
                $crate::apigroup::Version::from_static($version);

            /// Service namespace this adapter registers under.
            pub const SERVICE: &'static str = $service;

            /// Binds the adapter to the shared implementation.
            pub fn new(server: ::std::sync::Arc<S>) -> Self {
                Self { server }
            }
        }

        impl<S: ?Sized + $server + Send + Sync + 'static> $name<S> {
            $(
                $(#[$op_attr])*
                pub async fn $method(
                    &self,
                    ctx: &$crate::apigroup::CallContext,
                    request: &$wire_req,
                ) -> ::std::result::Result<$wire_resp, $crate::apigroup::Status> {
                    $crate::apigroup::call_versioned::<$wire_req, $int_req, $int_resp, $wire_resp, _, _>(
                        request,
                        |internal| self.server.$method(ctx, internal, Self::VERSION),
                    )
                    .await
                }
            )+
        }

        impl<S: ?Sized + $server + Send + Sync + 'static> $crate::VersionedApi for $name<S> {
            fn version(&self) -> $crate::apigroup::Version {
                Self::VERSION
            }

            fn service_name(&self) -> &'static str {
                Self::SERVICE
            }

            fn register(
                self: ::std::sync::Arc<Self>,
                server: &mut $crate::Server,
            ) -> ::std::result::Result<(), $crate::RegistrationError> {
                let builder = $crate::ServiceBuilder::new(Self::SERVICE, Self::VERSION);
                $(
                    let builder = {
                        let api = ::std::sync::Arc::clone(&self);
                        builder.unary(
                            stringify!($op),
                            move |ctx: $crate::apigroup::CallContext, request: $wire_req| {
                                let api = ::std::sync::Arc::clone(&api);
                                async move { api.$method(&ctx, &request).await }
                            },
                        )
                    };
                )+
                server.add_service(builder.build()?)
            }
        }
    };
}
