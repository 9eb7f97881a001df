//! Route lookup and navigation.
//!
//! # Responsibilities
//! - Validate and compile the route table
//! - Resolve locations (by path or by name) to routes
//! - Drive the history on navigation
//!
//! # Design Decisions
//! - Route table is immutable after construction
//! - Every table problem is reported at once
//! - Explicit NoMatch rather than silent default
//! - First match wins, patterns ordered by specificity

use std::collections::{BTreeMap, HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::routing::error::{RouteError, RouterError};
use crate::routing::history::History;
use crate::routing::location::Location;
use crate::routing::matcher::PathPattern;
use crate::routing::route::{ResolvedRoute, RouteRecord};

/// Options accepted by [`create_router`].
#[derive(Debug)]
pub struct RouterOptions {
    pub history: Box<dyn History>,
    pub routes: Vec<RouteRecord>,
}

impl RouterOptions {
    pub fn new(history: impl History + 'static, routes: Vec<RouteRecord>) -> Self {
        Self {
            history: Box::new(history),
            routes,
        }
    }
}

/// Where to navigate: a raw location or a named route with parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NavigationTarget {
    Path(String),
    Named {
        name: String,
        params: BTreeMap<String, String>,
    },
}

impl NavigationTarget {
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named {
            name: name.into(),
            params: BTreeMap::new(),
        }
    }
}

impl From<&str> for NavigationTarget {
    fn from(path: &str) -> Self {
        Self::Path(path.to_string())
    }
}

impl From<String> for NavigationTarget {
    fn from(path: String) -> Self {
        Self::Path(path)
    }
}

#[derive(Debug)]
struct CompiledRoute {
    record: RouteRecord,
    pattern: PathPattern,
}

/// Resolves locations against an immutable route table and owns the history.
#[derive(Debug)]
pub struct Router {
    /// Declaration order.
    records: Vec<RouteRecord>,
    /// Match order.
    ranked: Vec<CompiledRoute>,
    by_name: HashMap<String, usize>,
    base: String,
    /// Prepended to a full path to form an href; fixed by the history flavour.
    href_prefix: String,
    history: Mutex<Box<dyn History>>,
}

/// Build a router from a history and a route table.
pub fn create_router(options: RouterOptions) -> Result<Router, RouterError> {
    Router::new(options)
}

impl Router {
    /// Validate, compile and rank the route table.
    pub fn new(options: RouterOptions) -> Result<Self, RouterError> {
        let RouterOptions { history, routes } = options;
        let mut errors: Vec<RouteError> = Vec::new();
        let mut compiled: Vec<CompiledRoute> = Vec::with_capacity(routes.len());
        let mut names: HashSet<&str> = HashSet::new();
        let mut shapes: HashMap<String, String> = HashMap::new();

        for record in &routes {
            if record.name.trim().is_empty() {
                errors.push(RouteError::EmptyName {
                    path: record.path.clone(),
                });
            } else if !names.insert(&record.name) {
                let duplicate = RouteError::DuplicateName(record.name.clone());
                if !errors.contains(&duplicate) {
                    errors.push(duplicate);
                }
            }

            let pattern = match PathPattern::parse(&record.name, &record.path) {
                Ok(pattern) => pattern,
                Err(mut path_errors) => {
                    errors.append(&mut path_errors);
                    continue;
                }
            };

            let key = pattern.conflict_key();
            if let Some(existing) = shapes.get(&key) {
                errors.push(RouteError::DuplicatePath {
                    name: record.name.clone(),
                    path: record.path.clone(),
                    existing: existing.clone(),
                });
            } else {
                shapes.insert(key, record.name.clone());
            }

            compiled.push(CompiledRoute {
                record: record.clone(),
                pattern,
            });
        }

        if !errors.is_empty() {
            tracing::error!(problems = errors.len(), "Route table rejected");
            return Err(RouterError::InvalidRoutes(errors));
        }

        // Stable: equal scores keep declaration order.
        compiled.sort_by(|a, b| b.pattern.score().cmp(&a.pattern.score()));
        let by_name = compiled
            .iter()
            .enumerate()
            .map(|(i, route)| (route.record.name.clone(), i))
            .collect();

        let base = history.base().to_string();
        let href_prefix = history.create_href("");
        for route in &compiled {
            tracing::debug!(
                name = %route.record.name,
                path = %route.record.path,
                component = route.record.component.name(),
                "Route registered"
            );
        }
        tracing::info!(routes = compiled.len(), base = %base, "Router created");

        Ok(Self {
            records: routes,
            ranked: compiled,
            by_name,
            base,
            href_prefix,
            history: Mutex::new(history),
        })
    }

    /// Route records in declaration order.
    pub fn routes(&self) -> &[RouteRecord] {
        &self.records
    }

    pub fn has_route(&self, name: &str) -> bool {
        self.by_name.contains_key(name)
    }

    /// Normalized base of the history.
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Resolve a raw location such as `/login?redirect=%2F`.
    pub fn resolve(&self, raw: &str) -> Result<ResolvedRoute, RouterError> {
        let location = Location::parse(raw)?;
        self.resolve_location(location, raw)
    }

    /// Resolve a named route, building its path from `params`.
    pub fn resolve_named(
        &self,
        name: &str,
        params: &BTreeMap<String, String>,
    ) -> Result<ResolvedRoute, RouterError> {
        let index = *self
            .by_name
            .get(name)
            .ok_or_else(|| RouterError::UnknownRouteName(name.to_string()))?;
        let route = &self.ranked[index];
        let path = route.pattern.build(&route.record.name, params)?;
        let location = Location::new(path, Vec::new(), None);
        // Round-trip through the pattern so params come back decoded.
        let params = route
            .pattern
            .matches(&location.path)
            .ok_or_else(|| RouterError::NoMatch {
                location: location.full_path(),
            })?;
        Ok(self.finish(route, params, location))
    }

    /// Resolve either kind of target.
    pub fn resolve_target(&self, target: &NavigationTarget) -> Result<ResolvedRoute, RouterError> {
        match target {
            NavigationTarget::Path(path) => self.resolve(path),
            NavigationTarget::Named { name, params } => self.resolve_named(name, params),
        }
    }

    /// Route for the current history entry.
    pub fn current_route(&self) -> Result<ResolvedRoute, RouterError> {
        let raw = self.history().location().to_string();
        let location = Location::parse(&raw)?;
        self.resolve_location(location, &raw)
    }

    /// Navigate to `target`, adding a history entry.
    pub fn push(&self, target: impl Into<NavigationTarget>) -> Result<ResolvedRoute, RouterError> {
        self.navigate(target.into(), false)
    }

    /// Navigate to `target`, replacing the current history entry.
    pub fn replace(
        &self,
        target: impl Into<NavigationTarget>,
    ) -> Result<ResolvedRoute, RouterError> {
        self.navigate(target.into(), true)
    }

    pub fn back(&self) -> Result<ResolvedRoute, RouterError> {
        self.go(-1)
    }

    pub fn forward(&self) -> Result<ResolvedRoute, RouterError> {
        self.go(1)
    }

    /// Move `delta` entries through the history and return the route now current.
    pub fn go(&self, delta: isize) -> Result<ResolvedRoute, RouterError> {
        let moved = self.history().go(delta);
        if !moved {
            tracing::debug!(delta, "History did not move");
        }
        self.current_route()
    }

    fn navigate(&self, target: NavigationTarget, replace: bool) -> Result<ResolvedRoute, RouterError> {
        let resolved = match self.resolve_target(&target) {
            Ok(resolved) => resolved,
            Err(e) => {
                tracing::warn!(destination = ?target, error = %e, "Navigation rejected");
                return Err(e);
            }
        };

        let mut history = self.history();
        let current = Location::parse(history.location())
            .and_then(|location| self.resolve_location(location, ""));
        if matches!(&current, Ok(current) if same_destination(current, &resolved)) {
            return Err(RouterError::NavigationDuplicated {
                location: resolved.full_path,
            });
        }

        let from = history.location().to_string();
        if replace {
            history.replace(&resolved.full_path);
        } else {
            history.push(&resolved.full_path);
        }
        tracing::debug!(
            from = %from,
            to = %resolved.full_path,
            name = %resolved.name,
            replace,
            "Navigated"
        );
        Ok(resolved)
    }

    fn resolve_location(&self, location: Location, raw: &str) -> Result<ResolvedRoute, RouterError> {
        let (route, params) = self
            .ranked
            .iter()
            .find_map(|route| route.pattern.matches(&location.path).map(|p| (route, p)))
            .ok_or_else(|| RouterError::NoMatch {
                location: raw.to_string(),
            })?;
        Ok(self.finish(route, params, location))
    }

    fn finish(
        &self,
        route: &CompiledRoute,
        params: BTreeMap<String, String>,
        location: Location,
    ) -> ResolvedRoute {
        let full_path = location.full_path();
        ResolvedRoute {
            name: route.record.name.clone(),
            pattern: route.record.path.clone(),
            path: decoded_path(&location.path),
            href: format!("{}{}", self.href_prefix, full_path),
            full_path,
            params,
            query: location.query,
            hash: location.hash,
            component: route.record.component.clone(),
        }
    }

    fn history(&self) -> MutexGuard<'_, Box<dyn History>> {
        // The stack is always left consistent, so a poisoned lock is still usable.
        self.history.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Same record, params, query and hash: spelling of the path does not matter.
fn same_destination(a: &ResolvedRoute, b: &ResolvedRoute) -> bool {
    a.name == b.name && a.params == b.params && a.query == b.query && a.hash == b.hash
}

fn decoded_path(path: &str) -> String {
    urlencoding::decode(path)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::history::{MemoryHistory, WebHistory};
    use crate::routing::route::Component;
    use crate::views::{HomeView, LoginView};

    fn table() -> Vec<RouteRecord> {
        vec![
            RouteRecord::new("/", "HomeView", Component::new(HomeView)),
            RouteRecord::new("/login", "LoginView", Component::new(LoginView)),
            RouteRecord::new("/users/:id", "User", Component::new(HomeView)),
        ]
    }

    fn router(base: &str) -> Router {
        create_router(RouterOptions::new(WebHistory::new(base), table())).unwrap()
    }

    #[test]
    fn test_resolve_by_path() {
        let router = router("/");
        let home = router.resolve("/").unwrap();
        assert_eq!(home.name, "HomeView");
        assert_eq!(home.component.name(), "HomeView");

        let login = router.resolve("/login?redirect=%2Fusers%2F7").unwrap();
        assert_eq!(login.name, "LoginView");
        assert_eq!(login.query_value("redirect"), Some("/users/7"));

        let user = router.resolve("/users/7").unwrap();
        assert_eq!(user.params["id"], "7");
    }

    #[test]
    fn test_valueless_query_survives_resolution() {
        let router = router("/app");
        let route = router.resolve("/login?debug").unwrap();
        assert_eq!(route.full_path, "/login?debug");
        assert_eq!(route.href, "/app/login?debug");
        assert_eq!(router.push("/login?debug").unwrap().full_path, "/login?debug");
        assert_eq!(router.current_route().unwrap().full_path, "/login?debug");
    }

    #[test]
    fn test_resolve_unknown_path() {
        let router = router("/");
        assert_eq!(
            router.resolve("/missing"),
            Err(RouterError::NoMatch {
                location: "/missing".into()
            })
        );
    }

    #[test]
    fn test_href_includes_base() {
        let router = router("/app/");
        assert_eq!(router.base(), "/app");
        assert_eq!(router.resolve("/login").unwrap().href, "/app/login");
        assert_eq!(router.resolve("/").unwrap().href, "/app/");
    }

    #[test]
    fn test_resolve_named() {
        let router = router("");
        let mut params = BTreeMap::new();
        params.insert("id".to_string(), "42".to_string());
        let user = router.resolve_named("User", &params).unwrap();
        assert_eq!(user.full_path, "/users/42");

        assert_eq!(
            router.resolve_named("Nope", &params),
            Err(RouterError::UnknownRouteName("Nope".into()))
        );
        assert!(matches!(
            router.resolve_named("User", &BTreeMap::new()),
            Err(RouterError::MissingParam { .. })
        ));
    }

    #[test]
    fn test_rejects_duplicates_and_reports_all() {
        let routes = vec![
            RouteRecord::new("/", "HomeView", Component::new(HomeView)),
            RouteRecord::new("/Login/", "LoginView", Component::new(LoginView)),
            RouteRecord::new("/login", "HomeView", Component::new(LoginView)),
            RouteRecord::new("nested", "", Component::new(HomeView)),
        ];
        let err = create_router(RouterOptions::new(MemoryHistory::new("/"), routes)).unwrap_err();
        let RouterError::InvalidRoutes(problems) = err else {
            panic!("expected InvalidRoutes");
        };
        assert!(problems.contains(&RouteError::DuplicateName("HomeView".into())));
        assert!(problems.contains(&RouteError::DuplicatePath {
            name: "HomeView".into(),
            path: "/login".into(),
            existing: "LoginView".into(),
        }));
        assert!(problems.contains(&RouteError::EmptyName {
            path: "nested".into()
        }));
        assert!(problems.contains(&RouteError::MissingLeadingSlash {
            name: "".into(),
            path: "nested".into(),
        }));
    }

    #[test]
    fn test_push_back_forward() {
        let router = router("/");
        assert_eq!(router.current_route().unwrap().name, "HomeView");

        assert_eq!(router.push("/login").unwrap().name, "LoginView");
        assert_eq!(router.push(NavigationTarget::named("HomeView")).unwrap().name, "HomeView");
        assert_eq!(router.back().unwrap().name, "LoginView");
        assert_eq!(router.back().unwrap().name, "HomeView");
        assert_eq!(router.back().unwrap().name, "HomeView");
        assert_eq!(router.forward().unwrap().name, "LoginView");
    }

    #[test]
    fn test_duplicated_and_unmatched_navigation_keep_history() {
        let router = router("/");
        router.push("/login").unwrap();
        assert_eq!(
            router.push("/login"),
            Err(RouterError::NavigationDuplicated {
                location: "/login".into()
            })
        );
        assert!(matches!(router.push("/nowhere"), Err(RouterError::NoMatch { .. })));
        assert_eq!(router.current_route().unwrap().name, "LoginView");
        assert_eq!(router.back().unwrap().name, "HomeView");
    }

    #[test]
    fn test_duplicated_ignores_case_and_trailing_slash() {
        let router = router("/");
        router.push("/login").unwrap();
        assert!(matches!(
            router.push("/LOGIN/"),
            Err(RouterError::NavigationDuplicated { .. })
        ));
        assert_eq!(router.back().unwrap().name, "HomeView");
    }

    #[test]
    fn test_different_query_is_not_duplicated() {
        let router = router("/");
        router.push("/login").unwrap();
        let next = router.push("/login?redirect=%2Fusers%2F7").unwrap();
        assert_eq!(next.query_value("redirect"), Some("/users/7"));
        assert_eq!(router.back().unwrap().full_path, "/login");
    }

    #[test]
    fn test_resolve_does_not_wait_on_history() {
        let router = router("/app");
        let _guard = router.history();
        assert_eq!(router.resolve("/login").unwrap().href, "/app/login");
    }

    #[test]
    fn test_replace_does_not_add_entry() {
        let router = router("/");
        router.replace("/login").unwrap();
        assert_eq!(router.back().unwrap().name, "LoginView");
    }
}
