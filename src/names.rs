//! Name normalization shared by unit grouping, classification and catalog lookups

/// Normalize a free-text name: ASCII lowercase, runs of anything outside
/// `[a-z0-9]` become a single `_`, leading/trailing `_` removed.
///
/// `"Body Shop"` and `"body-shop "` both normalize to `"body_shop"`.
pub fn normalize_name(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut pending_sep = false;

    for ch in raw.chars() {
        if ch.is_ascii_alphanumeric() {
            if pending_sep && !out.is_empty() {
                out.push('_');
            }
            pending_sep = false;
            out.push(ch.to_ascii_lowercase());
        } else {
            pending_sep = true;
        }
    }

    out
}
