#![forbid(unsafe_code)]

//! Locale-aware value formatting for Lingo.
//!
//! # Role in Lingo
//! `lingo-format` renders the *values* inside translated messages. The
//! translation store resolves a template; this crate decides how the
//! arguments substituted into it should look for a given locale, and
//! performs the printf-style substitution itself.
//!
//! # Primary responsibilities
//! - **[`Formatter`]**: integers, floats, percentages, ordinals, dates,
//!   and ranges rendered with per-locale conventions from an explicit
//!   table (no CLDR engine).
//! - **Template analysis**: [`parse_format_specifiers`] scans a
//!   printf-style template and classifies every verb as raw or
//!   localizable; `%d`-family verbs carry technical values (ports, byte
//!   counts) and must never gain locale grouping, while `%s`/`%v` carry
//!   user-facing values that should.
//! - **[`render_template`]**: the substitution pass applying that
//!   asymmetry.
//! - **[`FormatArg`]**: the closed variant type for message arguments.

pub mod args;
pub mod conventions;
pub mod formatter;
pub mod render;
pub mod specifier;

pub use args::FormatArg;
pub use conventions::NumericConventions;
pub use formatter::Formatter;
pub use render::render_template;
pub use specifier::{
    Flags, FormatParseError, FormatSpec, VerbClass, classify_verb, parse_format_specifiers,
    verbs_by_argument,
};
