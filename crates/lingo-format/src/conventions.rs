//! Per-locale numeric conventions.
//!
//! A deliberately small, explicit table: each entry states the grouping
//! separator, the decimal mark, and what (if anything) sits between a
//! number and the percent sign. Unlisted locales get the English entry.

use unic_langid::LanguageIdentifier;

/// No-break space, used for French-style grouping and pre-`%` gaps.
pub const NBSP: &str = "\u{a0}";

/// How a locale writes numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericConventions {
    /// Thousands separator inserted every three integer digits.
    pub group: &'static str,
    /// Decimal mark between integer and fractional digits.
    pub decimal: &'static str,
    /// Separator between a number and the `%` sign.
    pub percent_gap: &'static str,
}

const ENGLISH: NumericConventions = NumericConventions {
    group: ",",
    decimal: ".",
    percent_gap: "",
};

const GERMAN: NumericConventions = NumericConventions {
    group: ".",
    decimal: ",",
    percent_gap: NBSP,
};

const SWISS_GERMAN: NumericConventions = NumericConventions {
    group: "'",
    decimal: ".",
    percent_gap: NBSP,
};

const FRENCH: NumericConventions = NumericConventions {
    group: NBSP,
    decimal: ",",
    percent_gap: NBSP,
};

const SWISS_FRENCH: NumericConventions = NumericConventions {
    group: "'",
    decimal: ",",
    percent_gap: NBSP,
};

const SOUTHERN_EUROPEAN: NumericConventions = NumericConventions {
    group: ".",
    decimal: ",",
    percent_gap: NBSP,
};

const JAPANESE: NumericConventions = NumericConventions {
    group: ",",
    decimal: ".",
    percent_gap: "",
};

/// Conventions for `tag`, consulting the full tag first (Swiss variants
/// differ from their base languages), then the base language, then the
/// English default.
#[must_use]
pub fn conventions_for(tag: &LanguageIdentifier) -> &'static NumericConventions {
    let region = tag.region.map(|r| r.as_str().to_ascii_uppercase());
    match (tag.language.as_str(), region.as_deref()) {
        ("de", Some("CH")) | ("de", Some("LI")) => &SWISS_GERMAN,
        ("fr", Some("CH")) => &SWISS_FRENCH,
        ("de", _) => &GERMAN,
        ("fr", _) => &FRENCH,
        ("it", _) | ("es", _) | ("pt", _) => &SOUTHERN_EUROPEAN,
        ("ja", _) | ("zh", _) | ("ko", _) => &JAPANESE,
        _ => &ENGLISH,
    }
}
