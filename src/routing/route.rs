//! Route records and the resolved form handed to views.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use crate::views::View;

/// Shared, opaque handle to the view that renders a route.
///
/// Two components are equal when they render the same view (by name).
#[derive(Clone)]
pub struct Component(Arc<dyn View>);

impl Component {
    pub fn new(view: impl View + 'static) -> Self {
        Self(Arc::new(view))
    }

    /// Name of the underlying view.
    pub fn name(&self) -> &'static str {
        self.0.name()
    }

    pub fn view(&self) -> &dyn View {
        self.0.as_ref()
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Component").field(&self.name()).finish()
    }
}

impl PartialEq for Component {
    fn eq(&self, other: &Self) -> bool {
        self.name() == other.name()
    }
}

impl Eq for Component {}

impl Serialize for Component {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// A route descriptor: path pattern, unique name and the component it renders.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RouteRecord {
    /// Path pattern (e.g. `/`, `/login`, `/users/:id`).
    pub path: String,

    /// Unique route name.
    pub name: String,

    /// View rendered when the route matches.
    pub component: Component,
}

impl RouteRecord {
    pub fn new(path: impl Into<String>, name: impl Into<String>, component: Component) -> Self {
        Self {
            path: path.into(),
            name: name.into(),
            component,
        }
    }
}

/// Outcome of resolving a location against the route table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedRoute {
    /// Name of the matched record.
    pub name: String,

    /// Pattern of the matched record.
    pub pattern: String,

    /// Decoded path that was matched.
    pub path: String,

    /// Path plus query string and hash.
    pub full_path: String,

    /// Decoded parameter values, keyed by parameter name.
    pub params: BTreeMap<String, String>,

    /// Query pairs in order of appearance.
    pub query: Vec<(String, String)>,

    /// Fragment without the leading `#`.
    pub hash: Option<String>,

    /// Full path prefixed with the history base.
    pub href: String,

    pub component: Component,
}

impl ResolvedRoute {
    /// First value for a query key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }
}
