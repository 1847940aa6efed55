//! InChI identifiers and undefined-stereo expansion.
//!
//! An InChI is a `/`-separated string: the `InChI=<version>` prefix, the
//! formula, then prefixed layers (`c`, `h`, `b`, `t`, `m`, `s`, ...). The
//! tetrahedral stereo layer (`/t`) lists one parity per stereocentre, where
//! `-` and `+` are concrete and `?` means the centre is undefined.
//!
//! Lookups against the cross-reference tables are exact string matches, so
//! an identifier with undefined centres only matches rows stored with the
//! same `?` markers. [`expand_undefined_stereo`] produces every concrete
//! assignment so the lookup can be broadened.

use std::fmt;
use std::ops::Range;
use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::error::CoreError;

/// Prefix every standard and non-standard InChI starts with.
pub const INCHI_PREFIX: &str = "InChI=";

/// Marker for an undefined stereocentre in the `/t` layer.
pub const UNDEFINED_STEREO: char = '?';

/// Concrete parities substituted for [`UNDEFINED_STEREO`], in output order.
pub const STEREO_PARITIES: [char; 2] = ['-', '+'];

/// Upper bound on expanded variants (10 undefined centres).
pub const MAX_STEREO_VARIANTS: usize = 1024;

static INCHI_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^InChI=\d+S?/\S+$").expect("valid regex"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InchiError {
    #[error("identifier is empty")]
    Empty,

    #[error("not a valid InChI: {0}")]
    Malformed(String),

    #[error("{markers} undefined stereocentres expand to more than {max} variants")]
    TooManyVariants { markers: u32, max: usize },
}

impl From<InchiError> for CoreError {
    fn from(err: InchiError) -> Self {
        CoreError::Validation(err.to_string())
    }
}

/// A syntactically valid InChI string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Inchi(String);

impl Inchi {
    /// Validate and wrap an identifier. Surrounding whitespace is ignored.
    pub fn parse(raw: &str) -> Result<Self, InchiError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(InchiError::Empty);
        }
        if !INCHI_RE.is_match(trimmed) {
            return Err(InchiError::Malformed(trimmed.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// The version segment, e.g. `1S` for standard InChI.
    pub fn version(&self) -> &str {
        self.0[INCHI_PREFIX.len()..]
            .split('/')
            .next()
            .unwrap_or_default()
    }

    /// The molecular formula layer.
    pub fn formula(&self) -> &str {
        self.0.split('/').nth(1).unwrap_or_default()
    }

    /// The first tetrahedral stereo layer, including its `t` prefix.
    pub fn stereo_layer(&self) -> Option<&str> {
        self.stereo_layer_span().map(|span| &self.0[span])
    }

    /// Whether the stereo layer contains at least one undefined centre.
    pub fn has_undefined_stereo(&self) -> bool {
        self.stereo_layer()
            .is_some_and(|layer| layer.contains(UNDEFINED_STEREO))
    }

    /// Byte range of the first `/t` layer (without the leading slash).
    ///
    /// Segment 0 is `InChI=<version>` and segment 1 is the formula, so layer
    /// prefixes are only checked from segment 2 on.
    fn stereo_layer_span(&self) -> Option<Range<usize>> {
        let mut offset = 0;
        for (index, segment) in self.0.split('/').enumerate() {
            if index >= 2 && segment.starts_with('t') {
                return Some(offset..offset + segment.len());
            }
            offset += segment.len() + 1;
        }
        None
    }
}

impl fmt::Display for Inchi {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Inchi {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Enumerate every concrete stereo assignment of `inchi`.
///
/// Each `?` in the `/t` layer is replaced by each of [`STEREO_PARITIES`],
/// giving `2^n` variants for `n` markers. Variants are ordered so that
/// earlier markers vary slowest and `-` precedes `+`. An identifier with no
/// undefined centres expands to itself.
pub fn expand_undefined_stereo(inchi: &Inchi, max: usize) -> Result<Vec<Inchi>, InchiError> {
    let Some(span) = inchi.stereo_layer_span() else {
        return Ok(vec![inchi.clone()]);
    };

    let (head, rest) = inchi.0.split_at(span.start);
    let (layer, tail) = rest.split_at(span.len());

    let markers = layer.matches(UNDEFINED_STEREO).count() as u32;
    if markers == 0 {
        return Ok(vec![inchi.clone()]);
    }
    if markers >= usize::BITS || (1usize << markers) > max {
        return Err(InchiError::TooManyVariants { markers, max });
    }

    let mut variants = Vec::with_capacity(1usize << markers);
    let mut resolved = String::with_capacity(layer.len());
    expand_layer(layer, &mut resolved, &mut |layer: &str| {
        variants.push(Inchi(format!("{head}{layer}{tail}")));
    });

    Ok(variants)
}

/// Resolve the first marker in `remaining` both ways and recurse on the rest.
fn expand_layer(remaining: &str, resolved: &mut String, emit: &mut dyn FnMut(&str)) {
    let mark = resolved.len();
    match remaining.find(UNDEFINED_STEREO) {
        None => {
            resolved.push_str(remaining);
            emit(resolved);
        }
        Some(pos) => {
            resolved.push_str(&remaining[..pos]);
            let after = &remaining[pos + UNDEFINED_STEREO.len_utf8()..];
            for parity in STEREO_PARITIES {
                resolved.push(parity);
                expand_layer(after, resolved, emit);
                resolved.pop();
            }
        }
    }
    resolved.truncate(mark);
}
