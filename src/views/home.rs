//! Landing page.

use crate::routing::ResolvedRoute;
use crate::views::{escape_html, View};

#[derive(Debug, Clone, Copy, Default)]
pub struct HomeView;

impl View for HomeView {
    fn name(&self) -> &'static str {
        "HomeView"
    }

    fn title(&self) -> &'static str {
        "Home"
    }

    fn render(&self, route: &ResolvedRoute) -> String {
        // The login link is relative to the document's <base>.
        format!(
            concat!(
                "<main class=\"home\">",
                "<h1>Home</h1>",
                "<p>You are at <code>{path}</code>.</p>",
                "<nav><a href=\"login\">Sign in</a></nav>",
                "</main>"
            ),
            path = escape_html(&route.full_path),
        )
    }
}
