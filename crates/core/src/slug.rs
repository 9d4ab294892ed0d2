//! Slug generation and lookup normalization.
//!
//! Cabin slugs are derived from the cabin name. Nordic and other
//! accented letters are folded to ASCII before the usual strip/hyphenate
//! pass, so "Hytte Øst" becomes `hytte-ost`. The same fold backs the
//! fallback lookup path: a request for a slug that misses verbatim is
//! retried against its folded form.

/// Fold accented characters to their ASCII spelling. Covers the letters
/// that actually occur in the data set (Norwegian plus common European
/// accents); anything else passes through untouched.
pub fn fold_diacritics(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            'æ' | 'Æ' => out.push_str("ae"),
            'ø' | 'Ø' => out.push('o'),
            'å' | 'Å' => out.push('a'),
            'ä' | 'Ä' => out.push('a'),
            'ö' | 'Ö' => out.push('o'),
            'ü' | 'Ü' => out.push('u'),
            'é' | 'è' | 'ê' | 'ë' | 'É' | 'È' | 'Ê' | 'Ë' => out.push('e'),
            'á' | 'à' | 'â' | 'Á' | 'À' | 'Â' => out.push('a'),
            'í' | 'ì' | 'î' | 'ï' | 'Í' | 'Ì' | 'Î' | 'Ï' => out.push('i'),
            'ó' | 'ò' | 'ô' | 'Ó' | 'Ò' | 'Ô' => out.push('o'),
            'ú' | 'ù' | 'û' | 'Ú' | 'Ù' | 'Û' => out.push('u'),
            'ñ' | 'Ñ' => out.push('n'),
            'ß' => out.push_str("ss"),
            other => out.push(other),
        }
    }
    out
}

/// Generate a slug: fold, lowercase, drop everything but `[a-z0-9 -]`,
/// hyphenate whitespace runs, collapse hyphen runs, trim hyphens.
pub fn slugify(text: &str) -> String {
    let folded = fold_diacritics(text.trim()).to_lowercase();
    let mut out = String::with_capacity(folded.len());
    let mut pending_sep = false;
    for c in folded.chars() {
        match c {
            'a'..='z' | '0'..='9' => {
                if pending_sep && !out.is_empty() {
                    out.push('-');
                }
                pending_sep = false;
                out.push(c);
            }
            ' ' | '\t' | '\n' | '-' | '_' => pending_sep = true,
            _ => {}
        }
    }
    out
}

/// `base-2`, `base-3`, ... for uniqueness retries.
pub fn with_suffix(base: &str, n: u32) -> String {
    format!("{base}-{n}")
}
