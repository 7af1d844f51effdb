//! Metric instruments owned by the interceptor and the registrar.
//!
//! Names and label schemas are fixed; only the histogram buckets and the
//! error-label derivation are configurable.

use prometheus::core::Collector;
use prometheus::{HistogramOpts, HistogramVec, IntCounterVec, IntGaugeVec, Opts, Registry};
use serde::Deserialize;

use crate::error::{ReqMeterError, Result};
use crate::kind::ErrorLabel;

pub const LATENCY_METRIC: &str = "request_duration_seconds";
pub const LATENCY_HELP: &str = "Request handling duration in seconds";
pub const LATENCY_LABELS: [&str; 2] = ["handler", "controller"];

pub const FAILURE_METRIC: &str = "requests_failed_total";
pub const FAILURE_HELP: &str = "Requests whose handler returned a failure";
pub const FAILURE_LABELS: [&str; 3] = ["handler", "controller", "error"];

pub const SERVICE_INFO_METRIC: &str = "service_info";
pub const SERVICE_INFO_HELP: &str = "Static service identity, always 1";
pub const SERVICE_INFO_LABELS: [&str; 3] = ["domain", "name", "version"];

/// Histogram bucket boundaries in seconds, 100us to 10s.
pub const DEFAULT_BUCKETS: [f64; 10] = [0.0001, 0.001, 0.01, 0.1, 0.25, 0.5, 1.0, 2.5, 5.0, 10.0];

/// Construction options for the interceptor instruments.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct InterceptorOptions {
    #[serde(default = "default_buckets")]
    pub buckets: Vec<f64>,

    #[serde(default)]
    pub error_label: ErrorLabel,
}

impl Default for InterceptorOptions {
    fn default() -> Self {
        Self {
            buckets: default_buckets(),
            error_label: ErrorLabel::default(),
        }
    }
}

impl InterceptorOptions {
    pub fn validate(&self) -> Result<()> {
        validate_buckets(&self.buckets)
    }
}

fn default_buckets() -> Vec<f64> {
    DEFAULT_BUCKETS.to_vec()
}

/// Buckets must be non-empty, finite, non-negative and strictly increasing.
pub fn validate_buckets(buckets: &[f64]) -> Result<()> {
    if buckets.is_empty() {
        return Err(ReqMeterError::InvalidBuckets("must not be empty".into()));
    }
    for b in buckets {
        if !b.is_finite() || *b < 0.0 {
            return Err(ReqMeterError::InvalidBuckets(format!(
                "boundary {b} must be a finite non-negative number"
            )));
        }
    }
    if let Some(w) = buckets.windows(2).find(|w| w[0] >= w[1]) {
        return Err(ReqMeterError::InvalidBuckets(format!(
            "boundaries must be strictly increasing ({} >= {})",
            w[0], w[1]
        )));
    }
    Ok(())
}

/// Build the latency histogram. Not registered yet.
pub(crate) fn latency(buckets: &[f64]) -> Result<HistogramVec> {
    validate_buckets(buckets)?;
    let hist = HistogramVec::new(
        HistogramOpts::new(LATENCY_METRIC, LATENCY_HELP).buckets(buckets.to_vec()),
        &LATENCY_LABELS,
    )?;
    Ok(hist)
}

/// Build the failure counter. Not registered yet.
pub(crate) fn failures() -> Result<IntCounterVec> {
    let counter = IntCounterVec::new(Opts::new(FAILURE_METRIC, FAILURE_HELP), &FAILURE_LABELS)?;
    Ok(counter)
}

/// Build the service identity gauge. Not registered yet.
pub(crate) fn info_gauge() -> Result<IntGaugeVec> {
    let gauge = IntGaugeVec::new(
        Opts::new(SERVICE_INFO_METRIC, SERVICE_INFO_HELP),
        &SERVICE_INFO_LABELS,
    )?;
    Ok(gauge)
}

/// All-or-nothing registration.
///
/// Collectors registered through the batch are unregistered again when the
/// batch is dropped without `commit`, so a failed startup leaves the
/// registry as it found it.
pub(crate) struct RegistrationBatch<'r> {
    registry: &'r Registry,
    registered: Vec<(&'static str, Box<dyn Collector>)>,
}

impl<'r> RegistrationBatch<'r> {
    pub(crate) fn new(registry: &'r Registry) -> Self {
        Self {
            registry,
            registered: Vec::new(),
        }
    }

    pub(crate) fn register<C>(&mut self, metric: &'static str, collector: &C) -> Result<()>
    where
        C: Collector + Clone + 'static,
    {
        self.registry
            .register(Box::new(collector.clone()))
            .map_err(|e| ReqMeterError::conflict(metric, e))?;
        self.registered.push((metric, Box::new(collector.clone())));
        Ok(())
    }

    pub(crate) fn commit(mut self) {
        self.registered.clear();
    }
}

impl Drop for RegistrationBatch<'_> {
    fn drop(&mut self) {
        while let Some((metric, collector)) = self.registered.pop() {
            match self.registry.unregister(collector) {
                Ok(()) => tracing::debug!(metric, "registration rolled back"),
                Err(e) => tracing::warn!(metric, error = %e, "registration rollback failed"),
            }
        }
    }
}
