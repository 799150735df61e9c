//! Category slug derivation
//!
//! A slug is the URL-safe identifier derived from a category name:
//! lowercase, non-alphanumeric runs collapsed to single hyphens,
//! leading/trailing hyphens trimmed. The result may be empty (e.g. a name
//! of only punctuation); the caller substitutes a time-based placeholder.

/// Derive a URL-safe slug from a category name.
pub fn slugify(name: &str) -> String {
    let mut slug = String::with_capacity(name.len());
    let mut pending_hyphen = false;

    for c in name.trim().chars() {
        if c.is_ascii_alphanumeric() {
            if pending_hyphen && !slug.is_empty() {
                slug.push('-');
            }
            pending_hyphen = false;
            slug.push(c.to_ascii_lowercase());
        } else {
            pending_hyphen = true;
        }
    }

    slug
}
