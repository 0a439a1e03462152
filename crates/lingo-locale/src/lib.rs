#![forbid(unsafe_code)]

//! Locale plumbing for Lingo: BCP-47 tag helpers, locale-string
//! normalization, language matching, and host-locale detection.
//!
//! # Role in Lingo
//! `lingo-locale` is the leaf crate every other member builds on. It owns
//! the mapping from messy real-world locale strings (`en_US.UTF-8`,
//! `de_DE@euro`, `C`) to validated [`unic_langid::LanguageIdentifier`]
//! values, and the negotiation logic that picks the closest stored
//! language for a requested one.
//!
//! # Primary responsibilities
//! - **Normalization**: [`normalize_locale_tag`] turns POSIX-flavoured
//!   locale strings into BCP-47 tags.
//! - **Reduction**: [`base_language`] strips script/region/variants.
//! - **Matching**: [`LanguageMatcher`] negotiates a requested tag against
//!   an owned set of available tags.
//! - **Detection**: [`LocaleDetector`] is the capability boundary for
//!   host-locale sniffing; the engine itself never branches on platform.

pub mod detect;
pub mod matcher;
pub mod tag;

pub use detect::{EnvLocaleDetector, EnvProvider, LocaleDetector, SystemEnv, SystemLocaleDetector};
pub use matcher::LanguageMatcher;
pub use tag::{base_language, normalize_locale_tag};

pub use unic_langid::LanguageIdentifier;
