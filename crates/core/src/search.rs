//! Search constants and term helpers.
//!
//! Lives in `core` so the repository layer and the HTTP layer agree on
//! limits and on how user input is turned into SQL patterns.

use crate::types::CompoundId;

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Result cap for the JSON autocomplete endpoint.
pub const QUERY_RESULT_LIMIT: i64 = 75;

/// Cap on PubChem synonym matches merged into one search.
pub const PUBCHEM_NAME_LIMIT: i64 = 50;

/// Shortest term, in characters, that reaches the database.
pub const MIN_TERM_LENGTH: usize = 1;

/// Database label used for PubChem rows in merged results.
pub const PUBCHEM_DATABASE: &str = "PubChem";

/// Site-relative prefix of PubChem compound pages.
pub const PUBCHEM_PATH_PREFIX: &str = "pubchem/";

/// Fallback display name for a compound with no synonyms.
pub const UNKNOWN_NAME: &str = "Unknown Name";

// ---------------------------------------------------------------------------
// Term helpers
// ---------------------------------------------------------------------------

/// Trim a raw `term` parameter; blank or too-short input yields `None`.
pub fn normalize_term(term: Option<&str>) -> Option<&str> {
    term.map(str::trim)
        .filter(|t| t.chars().count() >= MIN_TERM_LENGTH)
}

/// Build a case-insensitive `LIKE` prefix pattern.
///
/// `\`, `%` and `_` in the term are escaped so they match literally under
/// PostgreSQL's default `LIKE` escape character.
///
/// ```
/// use dci_core::search::like_prefix_pattern;
/// assert_eq!(like_prefix_pattern("glu"), "glu%");
/// assert_eq!(like_prefix_pattern("50%_a"), "50\\%\\_a%");
/// ```
pub fn like_prefix_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 1);
    for c in term.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// Interpret a term as a PubChem compound id when it is a positive integer.
pub fn pubchem_id(term: &str) -> Option<CompoundId> {
    term.trim()
        .parse::<CompoundId>()
        .ok()
        .filter(|id| *id > 0)
}

/// Site-relative link for a PubChem compound page.
pub fn pubchem_path(id: CompoundId) -> String {
    format!("{PUBCHEM_PATH_PREFIX}{id}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_term_trims_and_drops_blank() {
        assert_eq!(normalize_term(Some("  alanine ")), Some("alanine"));
        assert_eq!(normalize_term(Some("   ")), None);
        assert_eq!(normalize_term(None), None);
    }

    #[test]
    fn like_pattern_appends_wildcard() {
        assert_eq!(like_prefix_pattern("ala"), "ala%");
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_prefix_pattern(r"a\b"), r"a\\b%");
        assert_eq!(like_prefix_pattern("100%"), r"100\%%");
        assert_eq!(like_prefix_pattern("n_1"), r"n\_1%");
    }

    #[test]
    fn pubchem_id_accepts_positive_integers() {
        assert_eq!(pubchem_id("5950"), Some(5950));
        assert_eq!(pubchem_id(" 702 "), Some(702));
    }

    #[test]
    fn pubchem_id_rejects_other_terms() {
        assert_eq!(pubchem_id("alanine"), None);
        assert_eq!(pubchem_id("0"), None);
        assert_eq!(pubchem_id("-4"), None);
        assert_eq!(pubchem_id("99999999999"), None);
    }

    #[test]
    fn pubchem_path_format() {
        assert_eq!(pubchem_path(5950), "pubchem/5950");
    }
}
