//! Shared utilities for integration tests.

use std::net::SocketAddr;
use std::sync::Arc;

use spa_router::config::AppConfig;
use spa_router::{app, HttpServer, Shutdown};

/// Start the application server on an ephemeral port under `base`.
pub async fn start_app(base: &str) -> (SocketAddr, Shutdown) {
    let mut config = AppConfig::default();
    config.base_url = base.to_string();
    config.server.bind_address = "127.0.0.1:0".to_string();

    let router = app::build_router(&config.base_url).unwrap();
    let listener = tokio::net::TcpListener::bind(&config.server.bind_address)
        .await
        .unwrap();
    let addr = listener.local_addr().unwrap();

    let shutdown = Shutdown::new();
    let server = HttpServer::new(config, Arc::new(router));
    let server_shutdown = shutdown.subscribe();
    tokio::spawn(async move {
        let _ = server.run(listener, server_shutdown).await;
    });

    (addr, shutdown)
}

/// Client that never reuses connections or goes through a proxy.
pub fn client() -> reqwest::Client {
    reqwest::Client::builder()
        .pool_max_idle_per_host(0)
        .no_proxy()
        .build()
        .unwrap()
}
