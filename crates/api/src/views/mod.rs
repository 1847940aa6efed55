//! HTML pages.
//!
//! Pages are plain strings assembled with `write!`. Every value that comes
//! from a request or the database goes through [`escape`] first.

use std::fmt::Write;

use dci_core::encoding::encode_path_component;

pub mod compound;
pub mod error;
pub mod home;
pub mod inchi;
pub mod search;

const SITE_NAME: &str = "DCI Gateway";

/// Escape text for use in element content and quoted attribute values.
pub fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            c => out.push(c),
        }
    }
    out
}

/// Site-relative URL of the cross-reference page for `inchi`.
pub fn inchi_href(inchi: &str) -> String {
    format!("/inchi/{}", encode_path_component(inchi))
}

/// Wrap `body` in the shared page chrome. `title` is escaped here.
pub fn layout(title: &str, body: &str) -> String {
    let mut page = String::new();
    let _ = write!(
        page,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>{title} | {SITE_NAME}</title>
<link rel="stylesheet" href="/static/css/gateway.css">
</head>
<body>
<header>
<a class="brand" href="/">{SITE_NAME}</a>
<form class="search" action="/search" method="get">
<input id="search" name="term" type="search" placeholder="Name, identifier or PubChem CID" autocomplete="off">
<ul id="search-suggestions" hidden></ul>
</form>
</header>
<main>
{body}
</main>
<script src="/static/js/search.js"></script>
</body>
</html>
"#,
        title = escape(title),
    );
    page
}
