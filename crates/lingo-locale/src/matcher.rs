//! Closest-language negotiation over an owned set of available tags.
//!
//! # Invariants
//!
//! 1. [`LanguageMatcher::closest`] only returns tags from the available
//!    set — never synthetic or rewritten tags.
//! 2. A `closest` hit is always a real linguistic match; falling back to
//!    the matcher's designated fallback tag is reported separately by
//!    [`LanguageMatcher::resolve`], so callers can distinguish the two.

use fluent_langneg::{NegotiationStrategy, negotiate_languages};
use unic_langid::LanguageIdentifier;

/// Negotiates a requested language against the set of stored languages.
///
/// Rebuilt by the translation store whenever a language is added; cheap to
/// construct (it owns a clone of the tag list and nothing else).
#[derive(Debug, Clone)]
pub struct LanguageMatcher {
    available: Vec<LanguageIdentifier>,
    fallback: LanguageIdentifier,
}

impl LanguageMatcher {
    /// Build a matcher over `available`, with `fallback` used by
    /// [`resolve`](Self::resolve) when negotiation fails.
    #[must_use]
    pub fn new(available: Vec<LanguageIdentifier>, fallback: LanguageIdentifier) -> Self {
        Self {
            available,
            fallback,
        }
    }

    /// The tags this matcher negotiates against.
    #[must_use]
    pub fn available(&self) -> &[LanguageIdentifier] {
        &self.available
    }

    /// The last-resort tag returned by [`resolve`](Self::resolve).
    #[must_use]
    pub fn fallback(&self) -> &LanguageIdentifier {
        &self.fallback
    }

    /// Whether `tag` is stored exactly (string-equal canonical form).
    #[must_use]
    pub fn has_exact(&self, tag: &LanguageIdentifier) -> bool {
        self.available.contains(tag)
    }

    /// Find the closest available language for `requested`, or `None`
    /// when no available tag is linguistically compatible.
    ///
    /// `de-AT` against an available `de` matches; `ja` against
    /// `[en, fr]` does not.
    #[must_use]
    pub fn closest(&self, requested: &LanguageIdentifier) -> Option<LanguageIdentifier> {
        let matches = negotiate_languages(
            std::slice::from_ref(requested),
            &self.available,
            None,
            NegotiationStrategy::Filtering,
        );
        matches.first().map(|found| (*found).clone())
    }

    /// [`closest`](Self::closest), falling back to the designated
    /// fallback tag when negotiation fails.
    #[must_use]
    pub fn resolve(&self, requested: &LanguageIdentifier) -> LanguageIdentifier {
        self.closest(requested)
            .unwrap_or_else(|| self.fallback.clone())
    }
}
