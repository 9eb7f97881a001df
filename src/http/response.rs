//! HTML document shell around rendered views.

use crate::routing::ResolvedRoute;
use crate::views::escape_html;

/// `<base href>` for a normalized router base; always ends with `/`.
pub fn base_href(base: &str) -> String {
    format!("{}/", base)
}

/// Full document for a matched route.
pub fn page(base: &str, route: &ResolvedRoute) -> String {
    let view = route.component.view();
    document(
        base,
        view.title(),
        &route.name,
        &view.render(route),
    )
}

/// Full document for a path no route matches.
pub fn not_found(base: &str, location: &str) -> String {
    let body = format!(
        "<main class=\"not-found\"><h1>Not found</h1><p>Nothing lives at <code>{}</code>.</p>\
         <nav><a href=\"./\">Home</a></nav></main>",
        escape_html(location)
    );
    document(base, "Not found", "", &body)
}

fn document(base: &str, title: &str, route_name: &str, body: &str) -> String {
    format!(
        concat!(
            "<!DOCTYPE html>\n",
            "<html lang=\"en\">\n",
            "<head>\n",
            "<meta charset=\"utf-8\">\n",
            "<base href=\"{base}\">\n",
            "<title>{title}</title>\n",
            "</head>\n",
            "<body>\n",
            "<div id=\"app\" data-route=\"{route}\">{body}</div>\n",
            "</body>\n",
            "</html>\n"
        ),
        base = escape_html(&base_href(base)),
        title = escape_html(title),
        route = escape_html(route_name),
        body = body,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base_href() {
        assert_eq!(base_href(""), "/");
        assert_eq!(base_href("/app"), "/app/");
    }

    #[test]
    fn test_not_found_escapes_location() {
        let html = not_found("/app", "/<script>");
        assert!(html.contains("<base href=\"/app/\">"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }
}
