//! Shared error type across reqmeter crates.

use std::borrow::Cow;

use thiserror::Error;

use crate::kind::ErrorKind;

/// Shared result type.
pub type Result<T> = std::result::Result<T, ReqMeterError>;

/// Unified error type used by core and gateway.
#[derive(Debug, Error)]
pub enum ReqMeterError {
    /// A metric with the same name already lives in the registry.
    #[error("registration conflict on {metric}: {reason}")]
    RegistrationConflict { metric: String, reason: String },
    #[error("invalid service info: {0}")]
    InvalidServiceInfo(String),
    #[error("invalid histogram buckets: {0}")]
    InvalidBuckets(String),
    /// The registry refused an observation or a metric definition.
    #[error("metrics backend: {0}")]
    MetricsBackend(String),
    #[error("config: {0}")]
    Config(String),
}

impl ReqMeterError {
    /// Wrap a registry error raised while registering `metric`.
    pub(crate) fn conflict(metric: &str, err: prometheus::Error) -> Self {
        ReqMeterError::RegistrationConflict {
            metric: metric.to_string(),
            reason: err.to_string(),
        }
    }
}

impl From<prometheus::Error> for ReqMeterError {
    fn from(err: prometheus::Error) -> Self {
        match err {
            prometheus::Error::AlreadyReg => ReqMeterError::RegistrationConflict {
                metric: String::from("<unknown>"),
                reason: err.to_string(),
            },
            other => ReqMeterError::MetricsBackend(other.to_string()),
        }
    }
}

impl ErrorKind for ReqMeterError {
    fn kind(&self) -> Cow<'static, str> {
        Cow::Borrowed(match self {
            ReqMeterError::RegistrationConflict { .. } => "RegistrationConflict",
            ReqMeterError::InvalidServiceInfo(_) => "InvalidServiceInfo",
            ReqMeterError::InvalidBuckets(_) => "InvalidBuckets",
            ReqMeterError::MetricsBackend(_) => "MetricsBackendFailure",
            ReqMeterError::Config(_) => "ConfigError",
        })
    }
}
