use std::sync::Arc;

use async_trait::async_trait;
use dashmap::DashMap;
use serde_json::Value;

use reqmeter_core::{Endpoint, Interceptor};

use crate::error::{ApiError, ApiResult};

/// A group of request handlers addressed as `/api/{path}/{handler}`.
#[async_trait]
pub trait Controller: Send + Sync {
    /// URL segment, e.g. `orders`.
    fn path(&self) -> &'static str;
    /// `controller` label value, e.g. `OrdersController`.
    fn name(&self) -> &'static str;
    /// Handler names accepted by `handle`; they become `handler` label values.
    fn handlers(&self) -> &'static [&'static str];
    async fn handle(&self, handler: &'static str, body: Value) -> ApiResult<Value>;
}

/// Registry of controllers. Every dispatched call runs inside the interceptor.
pub struct Dispatcher {
    controllers: DashMap<&'static str, Arc<dyn Controller>>,
    interceptor: Interceptor,
}

impl Dispatcher {
    pub fn new(interceptor: Interceptor) -> Self {
        Self {
            controllers: DashMap::new(),
            interceptor,
        }
    }

    pub fn register(&self, ctrl: Arc<dyn Controller>) {
        tracing::debug!(
            path = ctrl.path(),
            controller = ctrl.name(),
            handlers = ?ctrl.handlers(),
            "controller registered"
        );
        self.controllers.insert(ctrl.path(), ctrl);
    }

    pub fn interceptor(&self) -> &Interceptor {
        &self.interceptor
    }

    /// Resolve route metadata. Only registered (controller, handler) pairs
    /// ever reach the metrics, which keeps label cardinality bounded.
    pub fn resolve(&self, path: &str, handler: &str) -> Option<(Endpoint, Arc<dyn Controller>)> {
        let ctrl = self.controllers.get(path)?.value().clone();
        let handler = ctrl.handlers().iter().copied().find(|h| *h == handler)?;
        Some((Endpoint::new(ctrl.name(), handler), ctrl))
    }

    /// Run one handler. Unknown routes are rejected before interception.
    pub async fn dispatch(&self, path: &str, handler: &str, body: Value) -> ApiResult<Value> {
        let (endpoint, ctrl) = self
            .resolve(path, handler)
            .ok_or_else(|| ApiError::NotFound(format!("no route {path}/{handler}")))?;
        self.interceptor
            .intercept(&endpoint, ctrl.handle(endpoint.handler, body))
            .await
    }

    /// Like `dispatch`, but the raw request body is decoded inside the
    /// interceptor so malformed payloads count as handler failures.
    pub async fn dispatch_raw(&self, path: &str, handler: &str, raw: &[u8]) -> ApiResult<Value> {
        let (endpoint, ctrl) = self
            .resolve(path, handler)
            .ok_or_else(|| ApiError::NotFound(format!("no route {path}/{handler}")))?;
        self.interceptor
            .intercept(&endpoint, async {
                let body = decode_body(raw)?;
                ctrl.handle(endpoint.handler, body).await
            })
            .await
    }
}

fn decode_body(raw: &[u8]) -> ApiResult<Value> {
    if raw.iter().all(u8::is_ascii_whitespace) {
        return Ok(Value::Null);
    }
    serde_json::from_slice(raw).map_err(|e| ApiError::Validation(format!("invalid json body: {e}")))
}
