use std::fmt::Write;

use dci_core::conversion::InputFormat;

use super::{escape, layout};

/// Upload form for a structure file or pasted structure text.
pub fn page() -> String {
    let mut options = String::new();
    for format in InputFormat::ALL {
        let selected = if format == InputFormat::default() {
            " selected"
        } else {
            ""
        };
        let _ = writeln!(
            options,
            r#"<option value="{}"{selected}>{}</option>"#,
            format.as_str(),
            escape(format.label()),
        );
    }

    let body = format!(
        r#"<h1>Find a compound by structure</h1>
<form class="upload" action="/upload" method="post" enctype="multipart/form-data">
<label>Structure file <input type="file" name="infile"></label>
<label>or paste the structure <textarea name="inputtext" rows="12" cols="72"></textarea></label>
<label>Format <select name="FORMAT">
{options}</select></label>
<label><input type="checkbox" name="proj2to3"> Project 2D coordinates to 3D</label>
<label><input type="checkbox" name="addHydr"> Add hydrogens</label>
<button type="submit">Look up</button>
</form>
"#
    );

    layout("Home", &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn form_offers_every_format_with_mol_selected() {
        let page = page();
        for format in InputFormat::ALL {
            assert!(page.contains(&format!(r#"value="{}""#, format.as_str())));
        }
        assert!(page.contains(r#"<option value="mol" selected>MOL</option>"#));
        assert!(page.contains(r#"name="proj2to3""#));
        assert!(page.contains(r#"name="addHydr""#));
    }
}
