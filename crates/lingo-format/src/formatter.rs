//! Locale-aware rendering of numbers, ordinals, dates, and ranges.
//!
//! # Invariants
//!
//! 1. A `Formatter` is immutable after construction; it is safe to share
//!    behind an `Arc` and cache per language.
//! 2. Formatting never fails: unrecognized locales degrade to plain or
//!    English-convention output, never to an error.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use unic_langid::LanguageIdentifier;

use crate::args::FormatArg;
use crate::conventions::{NumericConventions, conventions_for};

/// En-dash used between range endpoints when no separator phrase is
/// available.
pub const RANGE_DASH: &str = "\u{2013}";

/// Renders values with one locale's conventions.
#[derive(Debug, Clone)]
pub struct Formatter {
    language: LanguageIdentifier,
    conv: &'static NumericConventions,
}

impl Formatter {
    /// Build a formatter for `language`.
    #[must_use]
    pub fn new(language: LanguageIdentifier) -> Self {
        let conv = conventions_for(&language);
        Self { language, conv }
    }

    /// The language this formatter renders for.
    #[must_use]
    pub fn language(&self) -> &LanguageIdentifier {
        &self.language
    }

    /// The numeric conventions in effect.
    #[must_use]
    pub fn conventions(&self) -> &'static NumericConventions {
        self.conv
    }

    /// Grouped integer, e.g. `1234567` → `1 234 567` for French.
    #[must_use]
    pub fn format_int(&self, n: i64) -> String {
        self.localize_number(&n.to_string())
    }

    /// Grouped unsigned integer.
    #[must_use]
    pub fn format_uint(&self, n: u64) -> String {
        self.localize_number(&n.to_string())
    }

    /// Grouped float with the locale's decimal mark. `precision` fixes
    /// the fractional digit count; `None` keeps the shortest form.
    #[must_use]
    pub fn format_float(&self, v: f64, precision: Option<usize>) -> String {
        if !v.is_finite() {
            return v.to_string();
        }
        let plain = match precision {
            Some(p) => format!("{v:.p$}"),
            None => v.to_string(),
        };
        self.localize_number(&plain)
    }

    /// Percentage from a fraction of one: `0.125` with precision 1 →
    /// `12.5%` (with the locale's gap before the sign, if any).
    #[must_use]
    pub fn format_percent(&self, fraction: f64, precision: usize) -> String {
        let number = self.format_float(fraction * 100.0, Some(precision));
        format!("{number}{}%", self.conv.percent_gap)
    }

    /// Ordinal number with locale-specific suffix rules.
    ///
    /// English: `1st`, `2nd`, `3rd`, `4th`, with the 11–13 exception
    /// band (`11th`, `112th`). French: `1er`, then `2e`, `3e`, …
    /// Spanish: `2°`. Other locales fall back to the plain integer.
    #[must_use]
    pub fn format_ordinal(&self, n: i64) -> String {
        match self.language.language.as_str() {
            "en" => {
                let tail = (n % 100).abs();
                let suffix = if (11..=13).contains(&tail) {
                    "th"
                } else {
                    match (n % 10).abs() {
                        1 => "st",
                        2 => "nd",
                        3 => "rd",
                        _ => "th",
                    }
                };
                format!("{n}{suffix}")
            }
            "fr" => {
                if n == 1 {
                    "1er".to_string()
                } else {
                    format!("{n}e")
                }
            }
            "es" => format!("{n}\u{b0}"),
            _ => n.to_string(),
        }
    }

    /// Date per the explicit locale table; unmatched locales use
    /// ISO 8601.
    #[must_use]
    pub fn format_date(&self, date: NaiveDate) -> String {
        date.format(self.date_pattern()).to_string()
    }

    /// Time of day; 12-hour clock for US English, 24-hour elsewhere.
    #[must_use]
    pub fn format_time(&self, time: NaiveTime) -> String {
        time.format(self.time_pattern()).to_string()
    }

    /// Date and time joined by a single space.
    #[must_use]
    pub fn format_datetime(&self, dt: NaiveDateTime) -> String {
        format!(
            "{} {}",
            self.format_date(dt.date()),
            self.format_time(dt.time())
        )
    }

    /// Range of two values. A separator *word* is wrapped in single
    /// spaces; a bare dash (or no separator, which means en-dash) is
    /// joined tightly.
    #[must_use]
    pub fn format_range(
        &self,
        min: &FormatArg,
        max: &FormatArg,
        separator: Option<&str>,
    ) -> String {
        let lo = min.localized(self);
        let hi = max.localized(self);
        match separator {
            Some(word) if !is_dash(word) => format!("{lo} {word} {hi}"),
            Some(dash) => format!("{lo}{dash}{hi}"),
            None => format!("{lo}{RANGE_DASH}{hi}"),
        }
    }

    fn date_pattern(&self) -> &'static str {
        let region = self.language.region.map(|r| r.as_str().to_ascii_uppercase());
        match (self.language.language.as_str(), region.as_deref()) {
            ("en", Some("US")) => "%m/%d/%Y",
            ("en", Some("GB")) => "%d/%m/%Y",
            ("de", _) => "%d.%m.%Y",
            ("fr", _) => "%d/%m/%Y",
            ("ja", _) => "%Y/%m/%d",
            _ => "%Y-%m-%d",
        }
    }

    fn time_pattern(&self) -> &'static str {
        let region = self.language.region.map(|r| r.as_str().to_ascii_uppercase());
        match (self.language.language.as_str(), region.as_deref()) {
            ("en", Some("US")) => "%I:%M:%S %p",
            _ => "%H:%M:%S",
        }
    }

    /// Re-render a plain ASCII number (optional sign, optional single
    /// `.`) with this locale's grouping and decimal mark.
    fn localize_number(&self, plain: &str) -> String {
        let (sign, unsigned) = match plain.strip_prefix('-') {
            Some(rest) => ("-", rest),
            None => ("", plain),
        };
        let (int_part, frac_part) = match unsigned.split_once('.') {
            Some((i, f)) => (i, Some(f)),
            None => (unsigned, None),
        };
        let mut out = String::with_capacity(plain.len() + 4);
        out.push_str(sign);
        out.push_str(&group_digits(int_part, self.conv.group));
        if let Some(frac) = frac_part {
            out.push_str(self.conv.decimal);
            out.push_str(frac);
        }
        out
    }
}

fn is_dash(s: &str) -> bool {
    !s.is_empty() && s.chars().all(|c| matches!(c, '-' | '\u{2013}' | '\u{2014}'))
}

fn group_digits(digits: &str, sep: &str) -> String {
    if sep.is_empty() || digits.len() <= 3 || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return digits.to_string();
    }
    let mut out = String::with_capacity(digits.len() + sep.len() * (digits.len() / 3));
    let lead = digits.len() % 3;
    let (head, tail) = digits.split_at(lead);
    out.push_str(head);
    for (i, chunk) in tail.as_bytes().chunks(3).enumerate() {
        if i > 0 || !head.is_empty() {
            out.push_str(sep);
        }
        out.push_str(std::str::from_utf8(chunk).unwrap_or(""));
    }
    out
}
