//! Slug validation and derivation
//!
//! Slugs identify controversies in public URLs (`/<slug>/`), so they are
//! restricted to ASCII letters, digits, hyphens and underscores.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::{Error, Result};

/// Maximum slug length
pub const MAX_SLUG_LEN: usize = 50;

/// Path segments used by the application's own routes
pub const RESERVED_SLUGS: &[&str] = &["admin", "api", "static", "health"];

static SLUG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[-a-zA-Z0-9_]+$").expect("valid regex"));
static NON_WORD_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static SEPARATOR_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Check that `slug` can be used as a controversy identifier
pub fn validate_slug(slug: &str) -> Result<()> {
    if slug.is_empty() {
        return Err(Error::InvalidInput("Slug must not be empty".to_string()));
    }
    if slug.len() > MAX_SLUG_LEN {
        return Err(Error::InvalidInput(format!(
            "Slug must be at most {} characters",
            MAX_SLUG_LEN
        )));
    }
    if !SLUG_RE.is_match(slug) {
        return Err(Error::InvalidInput(
            "Slug may only contain letters, numbers, underscores or hyphens".to_string(),
        ));
    }
    if RESERVED_SLUGS.contains(&slug) {
        return Err(Error::InvalidInput(format!("Slug '{}' is reserved", slug)));
    }
    Ok(())
}

/// Derive a slug from a display name
///
/// The name is decomposed (NFKD) and combining marks and other non-ASCII
/// characters are dropped, so accented letters fold to their base letter.
/// The result is lowercased, punctuation is removed, runs of whitespace and
/// hyphens become a single `-`, and leading or trailing `-`/`_` are trimmed. Output is truncated to [`MAX_SLUG_LEN`].
pub fn slugify(name: &str) -> String {
    let folded: String = name.nfkd().filter(char::is_ascii).collect();
    let lowered = folded.to_lowercase();
    let cleaned = NON_WORD_RE.replace_all(&lowered, "");
    let joined = SEPARATOR_RE.replace_all(cleaned.trim(), "-");
    let trimmed = joined.trim_matches(|c| c == '-' || c == '_');

    let mut slug: String = trimmed.chars().take(MAX_SLUG_LEN).collect();
    while slug.ends_with('-') || slug.ends_with('_') {
        slug.pop();
    }
    slug
}
