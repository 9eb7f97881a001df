//! Sign-in page.

use crate::routing::ResolvedRoute;
use crate::views::{escape_html, View};

/// Where to go after signing in when no `redirect` is given.
const DEFAULT_REDIRECT: &str = "/";

#[derive(Debug, Clone, Copy, Default)]
pub struct LoginView;

impl LoginView {
    /// Post-login destination. Only application paths are honoured.
    pub fn redirect_target(route: &ResolvedRoute) -> &str {
        match route.query_value("redirect") {
            Some(target) if target.starts_with('/') && !target.starts_with("//") => target,
            _ => DEFAULT_REDIRECT,
        }
    }
}

impl View for LoginView {
    fn name(&self) -> &'static str {
        "LoginView"
    }

    fn title(&self) -> &'static str {
        "Sign in"
    }

    fn render(&self, route: &ResolvedRoute) -> String {
        format!(
            concat!(
                "<main class=\"login\">",
                "<h1>Sign in</h1>",
                "<form method=\"post\" action=\"{action}\">",
                "<label>Email <input type=\"email\" name=\"email\" required></label>",
                "<label>Password <input type=\"password\" name=\"password\" required></label>",
                "<input type=\"hidden\" name=\"redirect\" value=\"{redirect}\">",
                "<button type=\"submit\">Sign in</button>",
                "</form>",
                "</main>"
            ),
            action = escape_html(&route.href),
            redirect = escape_html(Self::redirect_target(route)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::routing::{create_router, Component, RouteRecord, RouterOptions, WebHistory};

    fn resolve(location: &str) -> ResolvedRoute {
        let routes = vec![RouteRecord::new("/login", "LoginView", Component::new(LoginView))];
        let router = create_router(RouterOptions::new(WebHistory::new("/app"), routes)).unwrap();
        router.resolve(location).unwrap()
    }

    #[test]
    fn test_redirect_target() {
        assert_eq!(LoginView::redirect_target(&resolve("/login")), "/");
        assert_eq!(
            LoginView::redirect_target(&resolve("/login?redirect=%2Faccount")),
            "/account"
        );
        assert_eq!(
            LoginView::redirect_target(&resolve("/login?redirect=https%3A%2F%2Fevil.example")),
            "/"
        );
        assert_eq!(
            LoginView::redirect_target(&resolve("/login?redirect=%2F%2Fevil.example")),
            "/"
        );
    }

    #[test]
    fn test_render_posts_back_under_base() {
        let html = LoginView.render(&resolve("/login?redirect=%2Faccount"));
        assert!(html.contains("action=\"/app/login?redirect=%2Faccount\""));
        assert!(html.contains("name=\"redirect\" value=\"/account\""));
    }
}
