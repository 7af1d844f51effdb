use std::net::SocketAddr;

use serde::Deserialize;

use reqmeter_core::{InterceptorOptions, ReqMeterError, Result, ServiceInfo};

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewayConfig {
    pub version: u32,

    pub service: ServiceInfo,

    #[serde(default)]
    pub gateway: GatewaySection,

    #[serde(default)]
    pub metrics: InterceptorOptions,
}

impl GatewayConfig {
    pub fn validate(&self) -> Result<()> {
        if self.version != 1 {
            return Err(ReqMeterError::Config(format!(
                "unsupported config version {}",
                self.version
            )));
        }

        self.service.validate()?;
        self.gateway.validate()?;
        self.metrics.validate()?;

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct GatewaySection {
    #[serde(default = "default_listen")]
    pub listen: String,
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            listen: default_listen(),
        }
    }
}

impl GatewaySection {
    pub fn validate(&self) -> Result<()> {
        self.listen_addr().map(|_| ())
    }

    pub fn listen_addr(&self) -> Result<SocketAddr> {
        self.listen.parse().map_err(|e| {
            ReqMeterError::Config(format!("gateway.listen must be a valid SocketAddr: {e}"))
        })
    }
}

fn default_listen() -> String {
    "0.0.0.0:8080".into()
}
