//! Shared application state for the reqmeter gateway.
//!
//! Startup order: register the service identity (which also creates the
//! request instruments), then build the dispatcher and its controllers.
//! Registration conflicts are returned to `main` and abort startup.

use std::sync::Arc;

use prometheus::Registry;

use reqmeter_core::{register_service_info, Result};

use crate::config::GatewayConfig;
use crate::controllers::{EchoController, OrdersController};
use crate::dispatch::Dispatcher;

#[derive(Clone)]
pub struct AppState {
    registry: Registry,
    dispatcher: Arc<Dispatcher>,
}

impl AppState {
    /// Build state on the process-wide default registry.
    /// Call once per process.
    pub fn new(cfg: GatewayConfig) -> Result<Self> {
        Self::with_registry(cfg, prometheus::default_registry().clone())
    }

    /// Build state on a caller-owned registry.
    pub fn with_registry(cfg: GatewayConfig, registry: Registry) -> Result<Self> {
        let interceptor = register_service_info(&registry, &cfg.service, &cfg.metrics)?;

        let dispatcher = Dispatcher::new(interceptor);
        dispatcher.register(Arc::new(OrdersController::new()));
        dispatcher.register(Arc::new(EchoController::new()));

        Ok(Self {
            registry,
            dispatcher: Arc::new(dispatcher),
        })
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn dispatcher(&self) -> Arc<Dispatcher> {
        Arc::clone(&self.dispatcher)
    }
}
