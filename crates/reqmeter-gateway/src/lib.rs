//! reqmeter gateway library entry.
//!
//! This crate wires strict config loading, the service-identity registrar,
//! controller dispatch with per-request instrumentation, and the operational
//! endpoints into an axum application. It is consumed by the binary
//! (`main.rs`) and by integration tests.

pub mod app_state;
pub mod config;
pub mod controllers;
pub mod dispatch;
pub mod error;
pub mod ops;
pub mod router;
pub mod transport;
