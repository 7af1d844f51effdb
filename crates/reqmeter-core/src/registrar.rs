//! Service-identity registrar.
//!
//! Runs once at startup, before traffic is accepted. It publishes the
//! service identity as a constant gauge and hands back a ready interceptor.
//! Calling it a second time against the same registry fails with
//! `RegistrationConflict`; keeping it to one call per process is the
//! caller's responsibility.

use prometheus::Registry;
use serde::Deserialize;

use crate::error::{ReqMeterError, Result};
use crate::instruments::{self, InterceptorOptions, RegistrationBatch};
use crate::interceptor::Interceptor;

/// Static identity of the running service.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ServiceInfo {
    pub domain: String,
    pub name: String,
    pub version: String,
}

impl ServiceInfo {
    pub fn new(
        domain: impl Into<String>,
        name: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            domain: domain.into(),
            name: name.into(),
            version: version.into(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        let fields = [
            ("domain", &self.domain),
            ("name", &self.name),
            ("version", &self.version),
        ];
        for (field, value) in fields {
            if value.trim().is_empty() {
                return Err(ReqMeterError::InvalidServiceInfo(format!(
                    "{field} must not be empty"
                )));
            }
        }
        Ok(())
    }

    /// `<domain>.<name>`, the value of the gauge's `name` label.
    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.domain, self.name)
    }
}

/// Publish `info` as `service_info{domain, name, version} 1` and build the
/// request interceptor on the same registry.
///
/// Either all three instruments end up registered or none do.
pub fn register_service_info(
    registry: &Registry,
    info: &ServiceInfo,
    opts: &InterceptorOptions,
) -> Result<Interceptor> {
    info.validate()?;
    opts.validate()?;

    let gauge = instruments::info_gauge()?;
    let qualified = info.qualified_name();
    gauge
        .get_metric_with_label_values(&[
            info.domain.as_str(),
            qualified.as_str(),
            info.version.as_str(),
        ])?
        .set(1);
    let interceptor = Interceptor::unregistered(opts)?;

    let mut batch = RegistrationBatch::new(registry);
    batch.register(instruments::SERVICE_INFO_METRIC, &gauge)?;
    interceptor.register_into(&mut batch)?;
    batch.commit();

    tracing::info!(
        domain = %info.domain,
        name = %qualified,
        version = %info.version,
        "service info registered"
    );
    Ok(interceptor)
}
