//! Errors from translation-store construction and mutation.
//!
//! Lookup never errors: a missing key or unknown language degrades to
//! fallback or key echo. Errors here are raised only when building or
//! mutating a store — and a rejected mutation always leaves the store in
//! its last-known-good state.

use std::fmt;
use std::path::PathBuf;

use lingo_format::FormatParseError;
use unic_langid::LanguageIdentifier;

/// One key-set discrepancy found while validating a language against the
/// reference key set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyProblem {
    /// The reference set has this key; the validated language does not.
    Missing { key: String },
    /// The validated language has this key; the reference set does not.
    Extra { key: String },
}

impl fmt::Display for KeyProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Missing { key } => write!(f, "missing key {key:?}"),
            Self::Extra { key } => write!(f, "extra key {key:?}"),
        }
    }
}

/// Errors from i18n store operations.
#[derive(Debug, Clone, PartialEq)]
pub enum I18nError {
    /// A locale string or filename did not parse as a language tag.
    InvalidLanguage { value: String },
    /// Construction did not supply translations for the default
    /// language.
    DefaultLanguageMissing { language: LanguageIdentifier },
    /// A language's key set diverged from the reference key set.
    InvalidTranslations {
        language: LanguageIdentifier,
        problems: Vec<KeyProblem>,
    },
    /// An added translation set carried no entries.
    EmptyTranslations { language: LanguageIdentifier },
    /// A translation document was empty, malformed, or held non-string
    /// values.
    MalformedDocument { language: String, reason: String },
    /// A message template failed format-specifier analysis.
    TemplateRejected {
        language: LanguageIdentifier,
        key: String,
        reason: FormatParseError,
    },
    /// The bundle is immutable; mutation was rejected without side
    /// effects.
    BundleImmutable,
    /// Reading a translation file failed.
    Io { path: PathBuf, reason: String },
    /// Aggregated per-file failures from a directory load.
    LoadFailed { files: Vec<(PathBuf, I18nError)> },
}

impl fmt::Display for I18nError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidLanguage { value } => {
                write!(f, "invalid language tag {value:?}")
            }
            Self::DefaultLanguageMissing { language } => {
                write!(f, "translations for default language '{language}' are missing")
            }
            Self::InvalidTranslations { language, problems } => {
                write!(f, "invalid translations for '{language}': ")?;
                for (i, problem) in problems.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{problem}")?;
                }
                Ok(())
            }
            Self::EmptyTranslations { language } => {
                write!(f, "empty translations for '{language}'")
            }
            Self::MalformedDocument { language, reason } => {
                write!(f, "malformed translation document for '{language}': {reason}")
            }
            Self::TemplateRejected {
                language,
                key,
                reason,
            } => {
                write!(f, "template {key:?} rejected for '{language}': {reason}")
            }
            Self::BundleImmutable => f.write_str("bundle is immutable"),
            Self::Io { path, reason } => {
                write!(f, "error reading '{}': {reason}", path.display())
            }
            Self::LoadFailed { files } => {
                write!(f, "failed to load {} translation file(s): ", files.len())?;
                for (i, (path, error)) in files.iter().enumerate() {
                    if i > 0 {
                        f.write_str("; ")?;
                    }
                    write!(f, "{}: {error}", path.display())?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for I18nError {}

impl I18nError {
    /// The key-set problems carried by an `InvalidTranslations` error.
    #[must_use]
    pub fn key_problems(&self) -> &[KeyProblem] {
        match self {
            Self::InvalidTranslations { problems, .. } => problems,
            _ => &[],
        }
    }
}
