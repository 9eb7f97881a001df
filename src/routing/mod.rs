//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Raw location ("/login?redirect=%2F")
//!     → location.rs (split path, query, hash)
//!     → router.rs (ranked lookup)
//!     → matcher.rs (segment-by-segment match)
//!     → Return: ResolvedRoute or NoMatch
//!
//! Route Compilation (at startup):
//!     RouteRecord[]
//!     → Validate (unique names, unique paths, well-formed params)
//!     → Compile patterns and sort by specificity
//!     → Freeze as immutable Router
//!
//! Navigation:
//!     push/replace/go → history.rs (session stack, hrefs under base)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in the match path
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by specificity, then declaration)

pub mod error;
pub mod history;
pub mod location;
pub mod matcher;
pub mod route;
pub mod router;

pub use error::{RouteError, RouterError};
pub use history::{History, MemoryHistory, WebHashHistory, WebHistory};
pub use location::Location;
pub use route::{Component, ResolvedRoute, RouteRecord};
pub use router::{create_router, NavigationTarget, Router, RouterOptions};
