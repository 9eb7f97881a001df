//! Page-level views.
//!
//! A view turns a resolved route into an HTML fragment. The HTTP layer wraps
//! the fragment in the document shell.

pub mod home;
pub mod login;

pub use home::HomeView;
pub use login::LoginView;

use crate::routing::ResolvedRoute;

/// A renderable page.
pub trait View: Send + Sync {
    /// Stable view name, also used when serializing routes.
    fn name(&self) -> &'static str;

    /// Document title.
    fn title(&self) -> &'static str;

    /// Render the page body for `route`.
    fn render(&self, route: &ResolvedRoute) -> String;
}

/// Escape text for HTML content and attribute values.
pub fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
