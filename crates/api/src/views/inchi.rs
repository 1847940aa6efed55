//! Cross-reference page for one identifier.

use std::fmt::Write;

use dci_core::search::{pubchem_path, PUBCHEM_DATABASE};
use dci_db::models::links::{DbLinks, LinkLookup, MatchKind};

use super::{escape, inchi_href, layout};

pub fn page(lookup: &LinkLookup) -> String {
    let mut body = String::new();
    let _ = writeln!(body, "<h1>Structure</h1>\n<p class=\"inchi\">{}</p>", escape(&lookup.inchi));

    match lookup.match_kind {
        MatchKind::Exact => {}
        MatchKind::StereoExpanded => {
            let _ = writeln!(
                body,
                "<p class=\"note\">The structure has undefined stereocentres. Showing entries \
                 for {} of {} stereo variants.</p>",
                lookup.matches.len(),
                lookup.variants_searched,
            );
        }
        MatchKind::None => {
            body.push_str("<p>No database has an entry for this structure.</p>\n");
        }
    }

    for links in &lookup.matches {
        write_links(&mut body, links, lookup.match_kind == MatchKind::StereoExpanded);
    }

    layout("Structure", &body)
}

fn write_links(body: &mut String, links: &DbLinks, show_inchi: bool) {
    body.push_str("<section class=\"links\">\n");
    if show_inchi {
        let _ = writeln!(
            body,
            r#"<h2><a href="{}">{}</a></h2>"#,
            escape(&inchi_href(&links.inchi)),
            escape(&links.inchi),
        );
    }
    if links.is_empty() {
        body.push_str("<p>Indexed, but no database entries remain.</p>\n");
    }
    body.push_str("<dl>\n");
    write_ids(body, "ALATIS", &links.alatis_ids, |_| None);
    write_ids(body, "BMRB (GISSMO)", &links.gissmo_ids, |_| None);
    write_ids(body, "CAMP", &links.camp_ids, |_| None);
    write_ids(body, "BMOD", &links.bmod_ids, |_| None);
    write_ids(body, PUBCHEM_DATABASE, &links.pubchem_ids, |id| {
        id.parse().ok().map(|cid| format!("/{}", pubchem_path(cid)))
    });
    body.push_str("</dl>\n</section>\n");
}

fn write_ids(body: &mut String, label: &str, ids: &[String], href: impl Fn(&str) -> Option<String>) {
    if ids.is_empty() {
        return;
    }
    let _ = write!(body, "<dt>{label}</dt><dd>");
    for (i, id) in ids.iter().enumerate() {
        if i > 0 {
            body.push_str(", ");
        }
        match href(id) {
            Some(url) => {
                let _ = write!(body, r#"<a href="{}">{}</a>"#, escape(&url), escape(id));
            }
            None => body.push_str(&escape(id)),
        }
    }
    body.push_str("</dd>\n");
}
