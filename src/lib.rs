//! Client-side routing for a single-page application.
//!
//! The route table lives in [`app`]; [`routing`] resolves locations against it
//! and drives session history; [`http`] serves the pages in history mode.

pub mod app;
pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod views;

pub use app::{build_router, router, routes};
pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{create_router, ResolvedRoute, RouteRecord, Router, RouterError, RouterOptions};
