//! The method table and call dispatch.

use std::collections::BTreeMap;
use std::future::Future;
use std::marker::PhantomData;
use std::sync::Arc;
use std::time::Instant;

use apigroup::{CallContext, OperationName, ServiceName, Status, Version};
use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info};

use crate::errors::RegistrationError;
use crate::method::MethodPath;

/// One bound operation: decodes a JSON payload, runs the call, encodes the result.
#[async_trait]
pub trait MethodHandler: Send + Sync {
    /// Runs one call with a JSON `payload`, returning the JSON response.
    async fn call(&self, ctx: CallContext, payload: Value) -> Result<Value, Status>;
}

/// Adapts a typed async function into a [`MethodHandler`].
struct UnaryHandler<F, Req, Resp> {
    handler: F,
    _types: PhantomData<fn(Req) -> Resp>,
}

#[async_trait]
impl<F, Fut, Req, Resp> MethodHandler for UnaryHandler<F, Req, Resp>
where
    F: Fn(CallContext, Req) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Resp, Status>> + Send + 'static,
    Req: DeserializeOwned + Send + 'static,
    Resp: Serialize + Send + 'static,
{
    async fn call(&self, ctx: CallContext, payload: Value) -> Result<Value, Status> {
        let request: Req = serde_json::from_value(payload)
            .map_err(|err| Status::invalid_argument(format!("malformed request payload: {err}")))?;
        let response = (self.handler)(ctx, request).await?;
        serde_json::to_value(&response)
            .map_err(|err| Status::internal(format!("failed to encode response: {err}")))
    }
}

// ---------------------------------------------------------------------------
// Services
// ---------------------------------------------------------------------------

/// Accumulates the operations of one service namespace before it is bound.
pub struct ServiceBuilder {
    name: String,
    version: Version,
    methods: Vec<(String, Arc<dyn MethodHandler>)>,
}

impl ServiceBuilder {
    /// Starts a service named `name` that serves `version`.
    pub fn new(name: impl Into<String>, version: Version) -> Self {
        Self {
            name: name.into(),
            version,
            methods: Vec::new(),
        }
    }

    /// Adds a request/response operation.
    pub fn unary<Req, Resp, F, Fut>(mut self, operation: impl Into<String>, handler: F) -> Self
    where
        F: Fn(CallContext, Req) -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Resp, Status>> + Send + 'static,
        Req: DeserializeOwned + Send + 'static,
        Resp: Serialize + Send + 'static,
    {
        let handler = UnaryHandler {
            handler,
            _types: PhantomData,
        };
        self.methods.push((operation.into(), Arc::new(handler)));
        self
    }

    /// Validates names and produces a [`Service`] ready for [`Server::add_service`].
    pub fn build(self) -> Result<Service, RegistrationError> {
        let name = ServiceName::new(self.name.as_str())
            .ok_or_else(|| RegistrationError::InvalidServiceName(self.name.clone()))?;
        if self.methods.is_empty() {
            return Err(RegistrationError::EmptyService { service: name });
        }

        let mut methods = BTreeMap::new();
        for (operation, handler) in self.methods {
            let operation = OperationName::new(operation.as_str())
                .ok_or(RegistrationError::InvalidOperationName(operation))?;
            if methods.contains_key(&operation) {
                return Err(RegistrationError::DuplicateOperation {
                    service: name,
                    operation,
                });
            }
            methods.insert(operation, handler);
        }

        Ok(Service {
            name,
            version: self.version,
            methods,
        })
    }
}

/// A validated set of operations under one namespace, bound to one version.
pub struct Service {
    name: ServiceName,
    version: Version,
    methods: BTreeMap<OperationName, Arc<dyn MethodHandler>>,
}

impl Service {
    /// The namespace operations are bound under.
    pub fn name(&self) -> &ServiceName {
        &self.name
    }

    /// The API version every operation of this service serves.
    pub fn version(&self) -> Version {
        self.version
    }
}

/// One row of the method table, as reported by [`Server::methods`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MethodInfo {
    /// Where the method is bound.
    pub path: MethodPath,
    /// The API version it serves.
    pub version: Version,
}

// ---------------------------------------------------------------------------
// Server
// ---------------------------------------------------------------------------

/// The transport's method table.
///
/// Built mutably at startup through [`Server::add_service`], then shared
/// immutably (typically behind an `Arc`) while serving.
#[derive(Default)]
pub struct Server {
    services: BTreeMap<ServiceName, Service>,
}

impl Server {
    /// Creates an empty method table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds every operation of `service` under its namespace.
    ///
    /// All-or-nothing: a namespace that is already bound is rejected with
    /// [`RegistrationError::DuplicateService`] and the table is left as it was.
    pub fn add_service(&mut self, service: Service) -> Result<(), RegistrationError> {
        if self.services.contains_key(&service.name) {
            return Err(RegistrationError::DuplicateService {
                service: service.name,
            });
        }
        info!(
            service = %service.name,
            version = %service.version,
            operations = service.methods.len(),
            "registered service"
        );
        self.services.insert(service.name.clone(), service);
        Ok(())
    }

    /// Returns `true` if `name` is bound.
    pub fn has_service(&self, name: &str) -> bool {
        ServiceName::new(name).is_some_and(|name| self.services.contains_key(&name))
    }

    /// Lists every bound method, ordered by path.
    pub fn methods(&self) -> Vec<MethodInfo> {
        self.services
            .values()
            .flat_map(|service| {
                service.methods.keys().map(|operation| MethodInfo {
                    path: MethodPath::new(service.name.clone(), operation.clone()),
                    version: service.version,
                })
            })
            .collect()
    }

    fn lookup(&self, path: &MethodPath) -> Option<Arc<dyn MethodHandler>> {
        self.services
            .get(path.service())
            .and_then(|service| service.methods.get(path.operation()))
            .cloned()
    }

    /// Routes one call to the method bound at `method`.
    ///
    /// The caller's deadline and cancellation bound the whole call; whichever
    /// fires first ends it with `DeadlineExceeded` or `Cancelled`. Unknown
    /// methods yield `Unimplemented`; undecodable payloads `InvalidArgument`.
    #[tracing::instrument(
        name = "rpc.dispatch",
        skip(self, ctx, payload),
        fields(call_id = %ctx.call_id())
    )]
    pub async fn dispatch(
        &self,
        ctx: CallContext,
        method: &str,
        payload: Value,
    ) -> Result<Value, Status> {
        let handler = method
            .parse::<MethodPath>()
            .ok()
            .and_then(|path| self.lookup(&path))
            .ok_or_else(|| Status::unimplemented(format!("unknown method '{method}'")))?;

        let deadline = ctx.deadline();
        let cancellation = ctx.cancellation().clone();
        let call = with_deadline(deadline, handler.call(ctx, payload));

        let outcome = tokio::select! {
            result = call => result,
            () = cancellation.cancelled() => Err(Status::cancelled("call cancelled by the caller")),
        };

        match &outcome {
            Ok(_) => debug!("call completed"),
            Err(status) => debug!(code = %status.code(), message = status.message(), "call failed"),
        }
        outcome
    }
}

async fn with_deadline<F>(deadline: Option<Instant>, call: F) -> Result<Value, Status>
where
    F: Future<Output = Result<Value, Status>>,
{
    match deadline {
        Some(deadline) => tokio::time::timeout_at(tokio::time::Instant::from_std(deadline), call)
            .await
            .unwrap_or_else(|_| {
                Err(Status::deadline_exceeded(
                    "deadline elapsed before the call completed",
                ))
            }),
        None => call.await,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use apigroup::Code;
    use serde::Deserialize;
    use serde_json::json;

    use super::*;

    const V1: Version = Version::from_static("v1");

    #[derive(Deserialize)]
    struct Echo {
        text: String,
    }

    #[derive(Serialize)]
    struct Echoed {
        text: String,
    }

    fn echo_service(name: &str) -> Service {
        ServiceBuilder::new(name, V1)
            .unary("Echo", |_ctx, req: Echo| async move { Ok::<_, Status>(Echoed { text: req.text }) })
            .unary("Stall", |_ctx, _req: Echo| async move {
                tokio::time::sleep(Duration::from_secs(60)).await;
                Ok::<_, Status>(Echoed { text: String::new() })
            })
            .build()
            .unwrap()
    }

    #[tokio::test]
    async fn dispatches_to_the_bound_method() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        let out = server
            .dispatch(CallContext::new(), "/test.v1.Echo/Echo", json!({"text": "hi"}))
            .await
            .unwrap();
        assert_eq!(out, json!({"text": "hi"}));
    }

    #[tokio::test]
    async fn unknown_and_malformed_methods_are_unimplemented() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        for method in ["/test.v1.Echo/Nope", "/test.v2.Echo/Echo", "garbage"] {
            let status = server
                .dispatch(CallContext::new(), method, json!({}))
                .await
                .unwrap_err();
            assert_eq!(status.code(), Code::Unimplemented, "{method}");
        }
    }

    #[tokio::test]
    async fn undecodable_payload_is_invalid_argument() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        let status = server
            .dispatch(CallContext::new(), "/test.v1.Echo/Echo", json!({"text": 5}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::InvalidArgument);
    }

    #[tokio::test]
    async fn duplicate_service_is_rejected_and_table_unchanged() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        let err = server.add_service(echo_service("test.v1.Echo")).unwrap_err();
        assert!(matches!(err, RegistrationError::DuplicateService { .. }));
        assert_eq!(server.methods().len(), 2);
    }

    #[test]
    fn builder_validates_names() {
        let err = ServiceBuilder::new("", V1)
            .unary("Echo", |_ctx, req: Echo| async move { Ok::<_, Status>(Echoed { text: req.text }) })
            .build()
            .err()
            .unwrap();
        assert_eq!(err, RegistrationError::InvalidServiceName(String::new()));

        let err = ServiceBuilder::new("test.v1.Echo", V1).build().err().unwrap();
        assert!(matches!(err, RegistrationError::EmptyService { .. }));

        let err = ServiceBuilder::new("test.v1.Echo", V1)
            .unary("Echo", |_ctx, req: Echo| async move { Ok::<_, Status>(Echoed { text: req.text }) })
            .unary("Echo", |_ctx, req: Echo| async move { Ok::<_, Status>(Echoed { text: req.text }) })
            .build()
            .err()
            .unwrap();
        assert!(matches!(err, RegistrationError::DuplicateOperation { .. }));
    }

    #[tokio::test]
    async fn deadline_ends_a_stalled_call() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        let ctx = CallContext::new().with_timeout(Duration::from_millis(20));
        let status = server
            .dispatch(ctx, "/test.v1.Echo/Stall", json!({"text": ""}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::DeadlineExceeded);
    }

    #[tokio::test]
    async fn cancellation_ends_a_stalled_call() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();

        let ctx = CallContext::new();
        let cancellation = ctx.cancellation().clone();
        let canceller = tokio::spawn(async move {
            tokio::time::sleep(Duration::from_millis(20)).await;
            cancellation.cancel();
        });

        let status = server
            .dispatch(ctx, "/test.v1.Echo/Stall", json!({"text": ""}))
            .await
            .unwrap_err();
        assert_eq!(status.code(), Code::Cancelled);
        canceller.await.unwrap();
    }

    #[test]
    fn methods_lists_paths_with_versions() {
        let mut server = Server::new();
        server.add_service(echo_service("test.v1.Echo")).unwrap();
        assert!(server.has_service("test.v1.Echo"));
        assert!(!server.has_service("test.v2.Echo"));

        let paths: Vec<String> = server.methods().iter().map(|m| m.path.to_string()).collect();
        assert_eq!(paths, ["/test.v1.Echo/Echo", "/test.v1.Echo/Stall"]);
        assert!(server.methods().iter().all(|m| m.version == V1));
    }
}
