//! Per-request instrumentation wrapper.
//!
//! Flow for every request:
//! - derive `RequestLabels` from the dispatch target (once)
//! - start the latency timer for those labels
//! - run the downstream handler
//! - stop the timer exactly once
//! - on failure, bump the failure counter and hand back the same error value
//!
//! Registry lookups use the non-panicking `get_metric_with_label_values`; a
//! lookup failure is logged and skipped so it can never replace the
//! handler's own outcome.

use std::fmt;
use std::future::Future;
use std::sync::Arc;

use prometheus::{HistogramVec, IntCounterVec, Registry};

use crate::error::Result;
use crate::instruments::{self, InterceptorOptions, RegistrationBatch};
use crate::kind::{ErrorKind, ErrorLabel};
use crate::labels::{DispatchTarget, RequestLabels};
use crate::timer::StopTimer;

#[derive(Clone)]
pub struct Interceptor {
    inner: Arc<InterceptorInner>,
}

struct InterceptorInner {
    latency: HistogramVec,
    failures: IntCounterVec,
    error_label: ErrorLabel,
}

impl Interceptor {
    /// Create the histogram and failure counter and register them.
    pub fn new(registry: &Registry, opts: &InterceptorOptions) -> Result<Self> {
        let interceptor = Self::unregistered(opts)?;
        let mut batch = RegistrationBatch::new(registry);
        interceptor.register_into(&mut batch)?;
        batch.commit();
        Ok(interceptor)
    }

    pub(crate) fn unregistered(opts: &InterceptorOptions) -> Result<Self> {
        let latency = instruments::latency(&opts.buckets)?;
        let failures = instruments::failures()?;
        tracing::debug!(
            buckets = opts.buckets.len(),
            error_label = ?opts.error_label,
            "interceptor instruments created"
        );
        Ok(Self {
            inner: Arc::new(InterceptorInner {
                latency,
                failures,
                error_label: opts.error_label,
            }),
        })
    }

    pub(crate) fn register_into(&self, batch: &mut RegistrationBatch<'_>) -> Result<()> {
        batch.register(instruments::LATENCY_METRIC, &self.inner.latency)?;
        batch.register(instruments::FAILURE_METRIC, &self.inner.failures)
    }

    pub fn latency(&self) -> &HistogramVec {
        &self.inner.latency
    }

    pub fn failures(&self) -> &IntCounterVec {
        &self.inner.failures
    }

    /// Start the timer for one request.
    pub fn start(&self, labels: &RequestLabels) -> StopTimer {
        let series = match self
            .inner
            .latency
            .get_metric_with_label_values(&labels.latency_values())
        {
            Ok(h) => Some(h),
            Err(e) => {
                tracing::warn!(
                    controller = labels.controller(),
                    handler = labels.handler(),
                    error = %e,
                    "latency series unavailable; request will not be timed"
                );
                None
            }
        };
        StopTimer::start(series)
    }

    /// Record one failure for `labels`.
    pub fn record_failure<E>(&self, labels: &RequestLabels, err: &E)
    where
        E: ErrorKind + fmt::Display + ?Sized,
    {
        let error = self.inner.error_label.value(err);
        match self
            .inner
            .failures
            .get_metric_with_label_values(&labels.failure_values(&error))
        {
            Ok(c) => c.inc(),
            Err(e) => tracing::warn!(
                controller = labels.controller(),
                handler = labels.handler(),
                error_kind = %error,
                backend_error = %e,
                "failure counter unavailable; failure not counted"
            ),
        }
    }

    /// Wrap an async handler invocation.
    ///
    /// The future is awaited in place; nothing is held in thread-local state
    /// across the await, so the task may resume on any worker.
    pub async fn intercept<D, T, E, F>(
        &self,
        target: &D,
        proceed: F,
    ) -> std::result::Result<T, E>
    where
        D: DispatchTarget + ?Sized,
        F: Future<Output = std::result::Result<T, E>>,
        E: ErrorKind + fmt::Display,
    {
        let labels = RequestLabels::from_target(target);
        let timer = self.start(&labels);
        let outcome = proceed.await;
        self.finish(&labels, timer, outcome)
    }

    /// Wrap a blocking handler invocation on the current thread.
    pub fn intercept_blocking<D, T, E, F>(
        &self,
        target: &D,
        proceed: F,
    ) -> std::result::Result<T, E>
    where
        D: DispatchTarget + ?Sized,
        F: FnOnce() -> std::result::Result<T, E>,
        E: ErrorKind + fmt::Display,
    {
        let labels = RequestLabels::from_target(target);
        let timer = self.start(&labels);
        let outcome = proceed();
        self.finish(&labels, timer, outcome)
    }

    fn finish<T, E>(
        &self,
        labels: &RequestLabels,
        timer: StopTimer,
        outcome: std::result::Result<T, E>,
    ) -> std::result::Result<T, E>
    where
        E: ErrorKind + fmt::Display,
    {
        let elapsed = timer.stop();
        match outcome {
            Ok(v) => {
                tracing::trace!(
                    controller = labels.controller(),
                    handler = labels.handler(),
                    elapsed,
                    "request completed"
                );
                Ok(v)
            }
            Err(err) => {
                self.record_failure(labels, &err);
                tracing::debug!(
                    controller = labels.controller(),
                    handler = labels.handler(),
                    elapsed,
                    error = %err,
                    "request failed"
                );
                Err(err)
            }
        }
    }
}

impl fmt::Debug for Interceptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Interceptor")
            .field("error_label", &self.inner.error_label)
            .finish_non_exhaustive()
    }
}
