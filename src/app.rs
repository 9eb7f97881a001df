//! Application route table and the router built from it.

use std::sync::OnceLock;

use crate::config::loader::base_url_from_env;
use crate::routing::{
    create_router, Component, RouteRecord, Router, RouterError, RouterOptions, WebHistory,
};
use crate::views::{HomeView, LoginView};

static ROUTER: OnceLock<Router> = OnceLock::new();

/// The navigable pages of the application.
pub fn routes() -> Vec<RouteRecord> {
    vec![
        RouteRecord::new("/", "HomeView", Component::new(HomeView)),
        RouteRecord::new("/login", "LoginView", Component::new(LoginView)),
    ]
}

/// Router over [`routes`] with HTML5 history under `base`.
pub fn build_router(base: &str) -> Result<Router, RouterError> {
    create_router(RouterOptions::new(WebHistory::new(base), routes()))
}

/// Process-wide router, built on first use from `BASE_URL`.
pub fn router() -> Result<&'static Router, RouterError> {
    if let Some(router) = ROUTER.get() {
        return Ok(router);
    }
    let built = build_router(&base_url_from_env())?;
    Ok(ROUTER.get_or_init(|| built))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_root_resolves_to_home() {
        let router = build_router("/").unwrap();
        let route = router.resolve("/").unwrap();
        assert_eq!(route.name, "HomeView");
        assert_eq!(route.component, Component::new(HomeView));
    }

    #[test]
    fn test_login_resolves_to_login() {
        let router = build_router("/").unwrap();
        let route = router.resolve("/login").unwrap();
        assert_eq!(route.name, "LoginView");
        assert_eq!(route.component, Component::new(LoginView));
    }

    #[test]
    fn test_paths_and_names_are_unique() {
        let table = routes();
        let paths: HashSet<&str> = table.iter().map(|r| r.path.as_str()).collect();
        let names: HashSet<&str> = table.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(paths.len(), table.len());
        assert_eq!(names.len(), table.len());
    }

    #[test]
    fn test_any_base_builds() {
        for base in ["", "/", "/app", "/app/", "app", "https://cdn.example.com/spa/", "  "] {
            assert!(build_router(base).is_ok(), "base {base:?} failed");
        }
    }

    #[test]
    fn test_singleton_is_shared() {
        let first = router().unwrap();
        let second = router().unwrap();
        assert!(std::ptr::eq(first, second));
        assert!(first.has_route("HomeView"));
        assert!(first.has_route("LoginView"));
    }
}
