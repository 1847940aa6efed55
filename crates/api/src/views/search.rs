use std::fmt::Write;

use dci_db::models::search::SearchHit;

use super::{escape, layout};

/// Full search results for `term`.
pub fn results_page(term: &str, hits: &[SearchHit]) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Results for &ldquo;{}&rdquo;</h1>", escape(term));

    if hits.is_empty() {
        body.push_str("<p>No matching entries.</p>\n");
        return layout(term, &body);
    }

    let _ = writeln!(body, "<p>{} matching entries.</p>", hits.len());
    body.push_str(
        "<table class=\"results\">\n<thead><tr><th>Database</th><th>Entry</th>\
         <th>Field</th><th>Value</th></tr></thead>\n<tbody>\n",
    );
    for hit in hits {
        let _ = writeln!(
            body,
            r#"<tr><td>{db}</td><td><a href="/{link}">{entry}</a></td><td>{termname}</td><td>{term}</td></tr>"#,
            db = escape(&hit.database),
            link = escape(&hit.data_path),
            entry = escape(&hit.id),
            termname = escape(&hit.termname),
            term = escape(&hit.term),
        );
    }
    body.push_str("</tbody>\n</table>\n");

    layout(term, &body)
}

/// Results page shown when no term was given.
pub fn empty_page() -> String {
    layout(
        "Search",
        "<h1>Search</h1>\n<p>Enter a compound name, identifier or PubChem CID.</p>\n",
    )
}
