//! Listing page for ambiguous and album requests / 候选列表页面

use axum::{
    http::header,
    response::{IntoResponse, Response},
};

use crate::storage::{Mount, ObjectEntry};
use crate::utils::{escape_html, format_size};

/// Render candidates as a minimal HTML document / 生成候选列表HTML
pub fn render_listing(mount: &Mount, requested: &str, entries: &[ObjectEntry]) -> String {
    let title = escape_html(requested);
    let mut html = String::with_capacity(256 + entries.len() * 96);

    html.push_str("<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n");
    html.push_str(&format!("<title>{}</title>\n", title));
    html.push_str("</head>\n<body>\n");
    html.push_str(&format!("<h1>{}</h1>\n<ul>\n", title));

    for entry in entries {
        let name = entry.key.strip_prefix(mount.key_prefix.as_str()).unwrap_or(&entry.key);
        html.push_str(&format!(
            "<li><a href=\"{}\">{}</a> ({})</li>\n",
            escape_html(&mount.public_path(&entry.key)),
            escape_html(name),
            format_size(entry.size),
        ));
    }

    html.push_str("</ul>\n</body>\n</html>\n");
    html
}

pub fn listing_response(mount: &Mount, requested: &str, entries: &[ObjectEntry]) -> Response {
    let html = render_listing(mount, requested, entries);
    ([(header::CONTENT_TYPE, "text/html;charset=UTF-8")], html).into_response()
}
