//! Session history implementations.
//!
//! # Responsibilities
//! - Keep the stack of visited locations and the current position
//! - Turn application locations into hrefs under the base path
//! - Strip the base from incoming request paths
//!
//! # Design Decisions
//! - Locations stored are application-relative (`/login`), never prefixed
//! - Base is normalized once: leading `/`, no trailing `/`, root is empty
//! - Pushing drops every entry after the current one

use std::fmt;

use url::Url;

/// Browser-style session history.
pub trait History: Send + fmt::Debug {
    /// Normalized base path (empty when served from the root).
    fn base(&self) -> &str;

    /// Current application location (path, query and hash).
    fn location(&self) -> &str;

    /// Add a new entry after the current one.
    fn push(&mut self, location: &str);

    /// Replace the current entry.
    fn replace(&mut self, location: &str);

    /// Move through the stack. Returns false if the position did not change.
    fn go(&mut self, delta: isize) -> bool;

    /// Href for an application location.
    fn create_href(&self, location: &str) -> String;

    /// Number of entries.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Normalize a base path.
///
/// Absolute URLs are reduced to their path; `/`, `` and `/app/` become
/// `` , `` and `/app`.
pub fn normalize_base(base: &str) -> String {
    let base = base.trim();
    let path = match Url::parse(base) {
        Ok(url) if url.has_host() => url.path().to_string(),
        _ => base.to_string(),
    };
    let path = path.split(['?', '#']).next().unwrap_or_default();
    let trimmed = path.trim_matches('/');
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("/{}", trimmed)
    }
}

/// Remove `base` from the front of `path`.
///
/// Returns `None` when `path` is outside the base. The remainder always
/// starts with `/`.
pub fn strip_base(base: &str, path: &str) -> Option<String> {
    if base.is_empty() {
        return Some(ensure_leading_slash(path));
    }
    let folded_base = base.to_lowercase();
    let head = path.get(..base.len())?;
    if head.to_lowercase() != folded_base {
        return None;
    }
    let rest = &path[base.len()..];
    match rest.chars().next() {
        None => Some("/".to_string()),
        Some('/') | Some('?') | Some('#') => Some(ensure_leading_slash(rest)),
        Some(_) => None,
    }
}

fn ensure_leading_slash(path: &str) -> String {
    if path.starts_with('/') {
        path.to_string()
    } else {
        format!("/{}", path)
    }
}

/// Stack of entries shared by every history flavour.
#[derive(Debug, Clone)]
struct Stack {
    entries: Vec<String>,
    position: usize,
}

impl Stack {
    fn new(initial: String) -> Self {
        Self {
            entries: vec![initial],
            position: 0,
        }
    }

    fn current(&self) -> &str {
        &self.entries[self.position]
    }

    fn push(&mut self, location: &str) {
        self.entries.truncate(self.position + 1);
        self.entries.push(location.to_string());
        self.position = self.entries.len() - 1;
    }

    fn replace(&mut self, location: &str) {
        self.entries[self.position] = location.to_string();
    }

    /// Move only if the target stays inside the stack.
    fn go_within(&mut self, delta: isize) -> bool {
        let Some(target) = self.position.checked_add_signed(delta) else {
            return false;
        };
        if delta == 0 || target >= self.entries.len() {
            return false;
        }
        self.position = target;
        true
    }

    /// Move, clamping to the first and last entries.
    fn go_clamped(&mut self, delta: isize) -> bool {
        let last = self.entries.len() - 1;
        let target = self
            .position
            .checked_add_signed(delta)
            .unwrap_or(0)
            .min(last);
        let moved = target != self.position;
        self.position = target;
        moved
    }
}

/// HTML5 history mode: hrefs are `base + location`.
#[derive(Debug, Clone)]
pub struct WebHistory {
    base: String,
    stack: Stack,
}

impl WebHistory {
    /// Start at the application root.
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
            stack: Stack::new("/".to_string()),
        }
    }

    /// Start at the location addressed by a request path (base included).
    ///
    /// A path outside the base starts at the application root.
    pub fn with_initial_url(base: &str, url_path: &str) -> Self {
        let mut history = Self::new(base);
        if let Some(location) = strip_base(&history.base, url_path) {
            history.stack.replace(&location);
        }
        history
    }
}

impl History for WebHistory {
    fn base(&self) -> &str {
        &self.base
    }

    fn location(&self) -> &str {
        self.stack.current()
    }

    fn push(&mut self, location: &str) {
        self.stack.push(location);
    }

    fn replace(&mut self, location: &str) {
        self.stack.replace(location);
    }

    fn go(&mut self, delta: isize) -> bool {
        self.stack.go_within(delta)
    }

    fn create_href(&self, location: &str) -> String {
        format!("{}{}", self.base, location)
    }

    fn len(&self) -> usize {
        self.stack.entries.len()
    }
}

/// Hash mode: the location lives after `#`, hrefs are `base/#location`.
#[derive(Debug, Clone)]
pub struct WebHashHistory {
    base: String,
    stack: Stack,
}

impl WebHashHistory {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
            stack: Stack::new("/".to_string()),
        }
    }
}

impl History for WebHashHistory {
    fn base(&self) -> &str {
        &self.base
    }

    fn location(&self) -> &str {
        self.stack.current()
    }

    fn push(&mut self, location: &str) {
        self.stack.push(location);
    }

    fn replace(&mut self, location: &str) {
        self.stack.replace(location);
    }

    fn go(&mut self, delta: isize) -> bool {
        self.stack.go_within(delta)
    }

    fn create_href(&self, location: &str) -> String {
        format!("{}/#{}", self.base, location)
    }

    fn len(&self) -> usize {
        self.stack.entries.len()
    }
}

/// In-process history with no browser behind it; `go` clamps to the stack.
#[derive(Debug, Clone)]
pub struct MemoryHistory {
    base: String,
    stack: Stack,
}

impl MemoryHistory {
    pub fn new(base: &str) -> Self {
        Self {
            base: normalize_base(base),
            stack: Stack::new("/".to_string()),
        }
    }
}

impl History for MemoryHistory {
    fn base(&self) -> &str {
        &self.base
    }

    fn location(&self) -> &str {
        self.stack.current()
    }

    fn push(&mut self, location: &str) {
        self.stack.push(location);
    }

    fn replace(&mut self, location: &str) {
        self.stack.replace(location);
    }

    fn go(&mut self, delta: isize) -> bool {
        self.stack.go_clamped(delta)
    }

    fn create_href(&self, location: &str) -> String {
        format!("{}{}", self.base, location)
    }

    fn len(&self) -> usize {
        self.stack.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_base() {
        assert_eq!(normalize_base(""), "");
        assert_eq!(normalize_base("/"), "");
        assert_eq!(normalize_base("/app/"), "/app");
        assert_eq!(normalize_base("app"), "/app");
        assert_eq!(normalize_base("/nested/app//"), "/nested/app");
        assert_eq!(normalize_base("https://cdn.example.com/static/app/"), "/static/app");
    }

    #[test]
    fn test_strip_base() {
        assert_eq!(strip_base("", "/login").as_deref(), Some("/login"));
        assert_eq!(strip_base("/app", "/app").as_deref(), Some("/"));
        assert_eq!(strip_base("/app", "/app/login").as_deref(), Some("/login"));
        assert_eq!(strip_base("/app", "/APP/login").as_deref(), Some("/login"));
        assert_eq!(strip_base("/app", "/app?x=1").as_deref(), Some("/?x=1"));
        assert_eq!(strip_base("/app", "/application"), None);
        assert_eq!(strip_base("/app", "/other"), None);
        assert_eq!(strip_base("/app", "/a"), None);
    }

    #[test]
    fn test_web_history_push_truncates_forward_entries() {
        let mut history = WebHistory::new("/app/");
        history.push("/login");
        history.push("/a");
        assert!(history.go(-2));
        assert_eq!(history.location(), "/");
        history.push("/b");
        assert_eq!(history.len(), 2);
        assert!(!history.go(1));
        assert_eq!(history.location(), "/b");
        assert_eq!(history.create_href("/login"), "/app/login");
    }

    #[test]
    fn test_web_history_out_of_bounds_is_noop() {
        let mut history = WebHistory::new("/");
        history.push("/login");
        assert!(!history.go(-5));
        assert_eq!(history.location(), "/login");
    }

    #[test]
    fn test_web_history_initial_url() {
        let history = WebHistory::with_initial_url("/app", "/app/login?x=1");
        assert_eq!(history.location(), "/login?x=1");
        let outside = WebHistory::with_initial_url("/app", "/elsewhere");
        assert_eq!(outside.location(), "/");
    }

    #[test]
    fn test_hash_history_href() {
        assert_eq!(WebHashHistory::new("/").create_href("/login"), "/#/login");
        assert_eq!(WebHashHistory::new("/app").create_href("/"), "/app/#/");
    }

    #[test]
    fn test_memory_history_clamps() {
        let mut history = MemoryHistory::new("");
        history.push("/login");
        assert!(history.go(-10));
        assert_eq!(history.location(), "/");
        assert!(history.go(10));
        assert_eq!(history.location(), "/login");
        assert!(!history.go(1));
    }
}
