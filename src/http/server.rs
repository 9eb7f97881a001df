//! HTTP server setup.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (tracing, timeout)
//! - Serve every application path in history mode: the route table decides
//!   which view renders, unknown paths get a not-found page
//! - Expose the route table as JSON
//! - Stop on the shutdown broadcast

use std::sync::Arc;
use std::time::Duration;

use axum::{
    extract::State,
    http::{StatusCode, Uri},
    response::{Html, IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Serialize;
use tokio::net::TcpListener;
use tokio::sync::broadcast;
use tower::ServiceBuilder;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

use crate::config::AppConfig;
use crate::http::response;
use crate::routing::history::strip_base;
use crate::routing::{Router as PageRouter, RouterError};

/// Path of the route manifest, outside any base.
pub const ROUTES_PATH: &str = "/_routes";

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub router: Arc<PageRouter>,
}

/// Entry of the route manifest.
#[derive(Debug, Serialize)]
pub struct RouteSummary {
    pub name: String,
    pub path: String,
    pub component: &'static str,
    pub href: Option<String>,
}

/// HTTP server for the application.
pub struct HttpServer {
    router: Router,
    config: AppConfig,
}

impl HttpServer {
    pub fn new(config: AppConfig, pages: Arc<PageRouter>) -> Self {
        let state = AppState { router: pages };
        let router = Self::build_router(&config, state);
        Self { router, config }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &AppConfig, state: AppState) -> Router {
        Router::new()
            .route(ROUTES_PATH, get(routes_handler))
            .route("/", get(page_handler))
            .route("/{*path}", get(page_handler))
            .with_state(state)
            .layer(
                ServiceBuilder::new()
                    .layer(TraceLayer::new_for_http())
                    .layer(TimeoutLayer::new(Duration::from_secs(
                        config.server.request_timeout_secs,
                    ))),
            )
    }

    /// Run the server until `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        mut shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(async move {
                let _ = shutdown.recv().await;
            })
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

/// Render the view for the requested location.
async fn page_handler(State(state): State<AppState>, uri: Uri) -> Response {
    let base = state.router.base();
    let requested = uri.path_and_query().map(|pq| pq.as_str()).unwrap_or("/");

    let Some(location) = strip_base(base, requested) else {
        tracing::debug!(path = %requested, base = %base, "Request outside base");
        return (StatusCode::NOT_FOUND, Html(response::not_found(base, requested))).into_response();
    };

    match state.router.resolve(&location) {
        Ok(route) => {
            tracing::debug!(location = %location, name = %route.name, "Rendering view");
            (StatusCode::OK, Html(response::page(base, &route))).into_response()
        }
        Err(RouterError::NoMatch { .. }) => {
            tracing::warn!(location = %location, "No route matched");
            (StatusCode::NOT_FOUND, Html(response::not_found(base, &location))).into_response()
        }
        Err(e) => {
            tracing::warn!(location = %location, error = %e, "Bad location");
            (StatusCode::BAD_REQUEST, e.to_string()).into_response()
        }
    }
}

/// The route table with hrefs under the base.
async fn routes_handler(State(state): State<AppState>) -> Json<Vec<RouteSummary>> {
    let summaries = state
        .router
        .routes()
        .iter()
        .map(|record| RouteSummary {
            name: record.name.clone(),
            path: record.path.clone(),
            component: record.component.name(),
            href: state.router.resolve(&record.path).ok().map(|r| r.href),
        })
        .collect();
    Json(summaries)
}
