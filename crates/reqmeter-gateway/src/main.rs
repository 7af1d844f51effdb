//! reqmeter gateway binary.
//!
//! - Strict YAML config (`reqmeter.yaml`, override with `REQMETER_CONFIG`)
//! - Service identity + request instruments registered before binding
//! - `/api/:controller/:handler`, `/healthz`, `/metrics`

use tracing_subscriber::{fmt, EnvFilter};

use reqmeter_gateway::{app_state, config, router};

#[tokio::main]
async fn main() {
    fmt().with_env_filter(EnvFilter::from_default_env()).init();

    let path = std::env::var("REQMETER_CONFIG").unwrap_or_else(|_| "reqmeter.yaml".to_string());
    let cfg = config::load_from_file(&path).expect("config load failed");
    let listen = cfg.gateway.listen_addr().expect("gateway.listen validated at load");

    let state = app_state::AppState::new(cfg).expect("service registration failed");
    let app = router::build_router(state);

    tracing::info!(%listen, "reqmeter-gateway starting");
    let listener = tokio::net::TcpListener::bind(listen).await.expect("failed to bind");

    axum::serve(listener, app).await.expect("server failed");
}
