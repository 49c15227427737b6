//! Server-rendered HTML pages
//!
//! Pages are plain strings built with `format!`; every interpolated value
//! must go through [`escape`]. [`Page`] wraps a body in the shared layout.

use crate::error::FrameworkError;
use crate::http::{HttpResponse, Response};

/// Escape text for use in HTML content and double-quoted attributes
pub fn escape(raw: &str) -> String {
    let mut escaped = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#x27;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// An HTML page inside the shared layout
///
/// # Example
///
/// ```rust,ignore
/// Page::new("Phones")
///     .body(format!("<h1>{}</h1>", escape(category)))
///     .into_response()
/// ```
pub struct Page {
    title: String,
    body: String,
    status: u16,
}

impl Page {
    /// `title` is escaped when rendered
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            body: String::new(),
            status: 200,
        }
    }

    /// Error page for a failed lookup, with the error's status code
    pub fn error(err: &FrameworkError) -> Self {
        let status = err.status_code();
        Self::new(format!("Error {}", status))
            .body(format!(
                "<h1>Error {}</h1>\n<p class=\"error\">{}</p>\n<p><a href=\"/products\">Back to products</a></p>",
                status,
                escape(&err.to_string())
            ))
            .status(status)
    }

    /// Pre-escaped HTML for the page content
    pub fn body(mut self, html: impl Into<String>) -> Self {
        self.body = html.into();
        self
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn render(&self) -> String {
        format!(
            r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{}</title>
</head>
<body>
    <nav><a href="/products">Products</a> | <a href="/new">New product</a></nav>
    <main>
{}
    </main>
</body>
</html>"#,
            escape(&self.title),
            self.body
        )
    }

    pub fn into_response(self) -> Response {
        let html = self.render();
        Ok(HttpResponse::html(html).status(self.status))
    }
}
