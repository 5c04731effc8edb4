//! Server-side HTML rendering
//!
//! Pages are assembled with `format!` around a shared layout. Values from
//! the database or a request are escaped with `html_escape`: `encode_text`
//! for element content, `encode_double_quoted_attribute` inside `"..."`.

pub mod admin;
pub mod chart;
pub mod pages;

use html_escape::encode_text;

/// Submitted form value, empty when the field was absent
pub(crate) fn submitted(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("")
}

/// Wrap page content in the site layout
pub fn layout(title: &str, body: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
    <meta charset="UTF-8">
    <meta name="viewport" content="width=device-width, initial-scale=1.0">
    <title>{title}</title>
    <link rel="stylesheet" href="/static/site.css">
</head>
<body>
    <header>
        <a class="brand" href="/">Controversies</a>
        <nav><a href="/admin/">Admin</a></nav>
    </header>
    <main>
{body}
    </main>
</body>
</html>
"#,
        title = encode_text(title),
        body = body,
    )
}

/// Inline error message for a form field, or nothing
pub(crate) fn field_error(message: Option<&str>) -> String {
    match message {
        Some(message) => format!(r#"<p class="field-error">{}</p>"#, encode_text(message)),
        None => String::new(),
    }
}
