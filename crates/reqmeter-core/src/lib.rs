//! reqmeter core: request instrumentation primitives, error types, and the
//! service-identity registrar.
//!
//! This crate wraps the handling of a single request with a latency histogram
//! and a failure counter. It carries no HTTP or runtime dependencies so any
//! framework integration can supply its own dispatch metadata and drive the
//! interceptor from either an async task or a blocking worker.
//!
//! # Defensive guarantees
//! Panics, `unwrap`, and `expect` are compile-denied here. All fallible paths
//! surface as `ReqMeterError`/`Result`, and metrics bookkeeping never replaces
//! the outcome of the wrapped handler.

#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]

pub mod error;
pub mod instruments;
pub mod interceptor;
pub mod kind;
pub mod labels;
pub mod registrar;
pub mod timer;

pub use error::{ReqMeterError, Result};
pub use instruments::{InterceptorOptions, DEFAULT_BUCKETS};
pub use interceptor::Interceptor;
pub use kind::{short_type_name, ErrorKind, ErrorLabel};
pub use labels::{DispatchTarget, Endpoint, RequestLabels};
pub use registrar::{register_service_info, ServiceInfo};
pub use timer::StopTimer;
