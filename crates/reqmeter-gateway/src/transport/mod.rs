//! HTTP transport into the dispatcher.

pub mod http;
