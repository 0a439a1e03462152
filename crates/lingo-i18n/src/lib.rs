#![forbid(unsafe_code)]

//! Layered runtime internationalization for command-line tools.
//!
//! # Role in Lingo
//! `lingo-i18n` is the resolution engine: it stores per-language
//! translation sets, validates their consistency, matches a requested
//! language to the closest stored one, and renders arguments with the
//! locale conventions from `lingo-format`.
//!
//! # Primary responsibilities
//! - **[`Bundle`]**: a validated translation store. Every language added
//!   after the first must carry exactly the reference key set; violating
//!   merges roll back whole.
//! - **[`LayeredMessageProvider`]**: user > system > default override
//!   precedence across three bundles, plus the current language and its
//!   formatter, kept in lockstep.
//! - **Loading**: one flat JSON object per language, filename stem as
//!   the tag, per-file error aggregation.
//! - **[`TranslatableError`]**: errors that carry a key and arguments
//!   and render late, in whatever language the provider speaks when the
//!   message is finally needed.
//!
//! # How it fits in the system
//! A CLI layer asks the provider (or a bundle directly) for message
//! text; completion generators and help renderers consume the resolved
//! strings. Lookup is total: a missing translation echoes its key
//! rather than failing an invocation.
//!
//! ```
//! use std::sync::Arc;
//! use lingo_i18n::{Bundle, LayeredMessageProvider, msg_args};
//!
//! let bundle = Bundle::from_translations(
//!     "en".parse().unwrap(),
//!     [("greet".to_string(), "Hello, %s!".to_string())],
//! )
//! .unwrap();
//! let provider = LayeredMessageProvider::new().with_system_bundle(Arc::new(bundle));
//! assert_eq!(provider.translate("greet", &msg_args!["World"]), "Hello, World!");
//! ```

pub mod bundle;
pub mod error;
pub mod load;
pub mod provider;
pub mod translatable;

pub use bundle::{Bundle, TranslationSet};
pub use error::{I18nError, KeyProblem};
pub use load::{TranslationSource, builtin_bundle, load_dir, parse_document};
pub use provider::{LayeredMessageProvider, RANGE_SEPARATOR_KEY};
pub use translatable::{ErrorArg, TranslatableError, default_provider, set_default_provider};

pub use lingo_format::{FormatArg, Formatter};
pub use lingo_format::msg_args;
pub use unic_langid::LanguageIdentifier;
