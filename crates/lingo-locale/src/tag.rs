//! BCP-47 tag helpers.
//!
//! # Invariants
//!
//! 1. [`normalize_locale_tag`] returns `Some` only for strings that parse
//!    as a valid [`LanguageIdentifier`] after cleanup.
//! 2. [`base_language`] never fails: every valid tag has a language
//!    subtag, and reduction only drops information.

use unic_langid::LanguageIdentifier;

/// Default tag adopted for the `C`/`POSIX` pseudo-locales.
pub const POSIX_FALLBACK: &str = "en-US";

/// Normalize a raw locale string into a BCP-47 language tag.
///
/// Strips encoding suffixes (`.UTF-8`), modifier sections (`@euro`),
/// replaces underscores with hyphens, and maps the `C`/`POSIX`
/// pseudo-locales to `en-US`. Returns `None` when the cleaned string
/// still does not parse as a language identifier.
///
/// # Examples
///
/// ```
/// use lingo_locale::normalize_locale_tag;
///
/// let tag = normalize_locale_tag("de_DE.UTF-8@euro").unwrap();
/// assert_eq!(tag.to_string(), "de-DE");
///
/// let posix = normalize_locale_tag("POSIX").unwrap();
/// assert_eq!(posix.to_string(), "en-US");
///
/// assert!(normalize_locale_tag("not a locale").is_none());
/// ```
#[must_use]
pub fn normalize_locale_tag(raw: &str) -> Option<LanguageIdentifier> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return None;
    }
    let stripped = trimmed.split(['.', '@']).next().unwrap_or_default().trim();
    if stripped.is_empty() {
        return None;
    }
    if stripped == "C" || stripped == "POSIX" {
        return POSIX_FALLBACK.parse().ok();
    }
    stripped.replace('_', "-").parse().ok()
}

/// Reduce a tag to its bare language subtag (`de-CH` → `de`).
#[must_use]
pub fn base_language(tag: &LanguageIdentifier) -> LanguageIdentifier {
    LanguageIdentifier::from_parts(tag.language, None, None, &[])
}

/// Whether `tag` carries nothing beyond its language subtag.
#[must_use]
pub fn is_base_language(tag: &LanguageIdentifier) -> bool {
    tag.script.is_none() && tag.region.is_none() && tag.variants().count() == 0
}
