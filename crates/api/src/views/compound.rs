use std::fmt::Write;

use dci_db::models::compound::{Compound, CompoundName};
use dci_db::models::links::DbLinks;

use super::{escape, inchi_href, layout};

/// PubChem compound summary: metadata, synonyms, and the identifier link.
pub fn page(compound: &Compound, names: &[CompoundName], links: Option<&DbLinks>) -> String {
    let title = names
        .first()
        .map(|n| n.name.as_str())
        .unwrap_or(dci_core::search::UNKNOWN_NAME);

    let mut body = String::new();
    let _ = writeln!(body, "<h1>{}</h1>\n<dl>", escape(title));
    let _ = writeln!(
        body,
        r#"<dt>PubChem CID</dt><dd><a href="https://pubchem.ncbi.nlm.nih.gov/compound/{id}">{id}</a></dd>"#,
        id = compound.id,
    );
    if let Some(formula) = &compound.formula {
        let _ = writeln!(body, "<dt>Formula</dt><dd>{}</dd>", escape(formula));
    }
    if let Some(weight) = compound.molecular_weight {
        let _ = writeln!(body, "<dt>Molecular weight</dt><dd>{weight:.3}</dd>");
    }
    if let Some(inchi) = &compound.inchi {
        let _ = writeln!(
            body,
            r#"<dt>InChI</dt><dd><a href="{}">{}</a></dd>"#,
            escape(&inchi_href(inchi)),
            escape(inchi),
        );
    }
    body.push_str("</dl>\n");

    if let Some(links) = links {
        let others = links.alatis_ids.len()
            + links.gissmo_ids.len()
            + links.camp_ids.len()
            + links.bmod_ids.len();
        if others > 0 {
            let _ = writeln!(body, "<p>Referenced by {others} other database entries.</p>");
        }
    }

    if names.len() > 1 {
        body.push_str("<h2>Synonyms</h2>\n<ul class=\"names\">\n");
        for name in &names[1..] {
            let _ = writeln!(body, "<li>{}</li>", escape(&name.name));
        }
        body.push_str("</ul>\n");
    }

    layout(title, &body)
}
