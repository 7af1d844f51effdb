use async_trait::async_trait;
use serde_json::Value;

use crate::dispatch::Controller;
use crate::error::{ApiError, ApiResult};

/// Echoes the request body. Useful to prove routing and instrumentation.
#[derive(Default)]
pub struct EchoController;

impl EchoController {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Controller for EchoController {
    fn path(&self) -> &'static str {
        "echo"
    }

    fn name(&self) -> &'static str {
        "EchoController"
    }

    fn handlers(&self) -> &'static [&'static str] {
        &["echo"]
    }

    async fn handle(&self, handler: &'static str, body: Value) -> ApiResult<Value> {
        match handler {
            "echo" if body.is_null() => Err(ApiError::Validation("echo requires a body".into())),
            "echo" => Ok(body),
            other => Err(ApiError::NotFound(format!("echo.{other}"))),
        }
    }
}
