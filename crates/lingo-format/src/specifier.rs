//! Printf-style format specifier analysis.
//!
//! Templates carry `%`-verbs in the classic form
//! `%[index][flags][width][.precision]verb`. The scanner walks a template
//! once, left to right, and produces the ordered specifier list the
//! rendering and classification passes consume.
//!
//! # Invariants
//!
//! 1. Escaped `%%` never produces a specifier.
//! 2. Specifier argument indices are assigned in template order, except
//!    where an explicit `%[n]` marker re-anchors the sequence (Go-style
//!    one-based indices).
//! 3. The verb *choice* encodes intent: `%d`-family verbs are raw
//!    technical values, `%s`/`%v` are user-facing and localizable.

use std::fmt;

/// Specifier flags (`-`, `+`, `0`, `#`, space).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Flags {
    pub left_align: bool,
    pub plus: bool,
    pub zero_pad: bool,
    pub alternate: bool,
    pub space: bool,
}

/// One parsed `%`-site in a template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatSpec {
    /// Zero-based index of the argument this site consumes.
    pub arg_index: usize,
    /// Whether the index came from an explicit `%[n]` marker.
    pub explicit_index: bool,
    pub flags: Flags,
    pub width: Option<usize>,
    pub precision: Option<usize>,
    /// Terminal verb letter (`d`, `s`, `f`, …).
    pub verb: char,
    /// Byte range of the whole site within the template.
    pub start: usize,
    pub end: usize,
}

/// How a verb treats its argument.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VerbClass {
    /// Technical value: substituted exactly as carried (ports, byte
    /// counts, hex dumps). Never locale-formatted.
    Raw,
    /// User-facing value: numeric arguments are pre-rendered with the
    /// locale's conventions before substitution.
    Localized,
}

/// Classify a verb letter. Only `s` and `v` are localizable; every other
/// verb (`d`, `t`, `x`, `o`, `b`, `c`, `q`, …) stays raw in all locales.
#[must_use]
pub fn classify_verb(verb: char) -> VerbClass {
    match verb {
        's' | 'v' => VerbClass::Localized,
        _ => VerbClass::Raw,
    }
}

/// A malformed specifier site.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormatParseError {
    /// The template ended inside a specifier.
    UnterminatedSpecifier { offset: usize },
    /// A `%[n]` marker held something other than a one-based integer.
    BadPositionalIndex { offset: usize },
    /// The terminal character was not a verb letter.
    InvalidVerb { offset: usize, found: char },
}

impl fmt::Display for FormatParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::UnterminatedSpecifier { offset } => {
                write!(f, "unterminated format specifier at byte {offset}")
            }
            Self::BadPositionalIndex { offset } => {
                write!(f, "bad positional index at byte {offset}")
            }
            Self::InvalidVerb { offset, found } => {
                write!(f, "invalid format verb {found:?} at byte {offset}")
            }
        }
    }
}

impl std::error::Error for FormatParseError {}

/// One region of a scanned template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Site {
    /// Verbatim text, byte range.
    Literal { start: usize, end: usize },
    /// An escaped `%%`, rendered as a single `%`.
    Escape,
    Spec(FormatSpec),
}

/// Scan a template into literal runs, escapes, and specifiers.
pub(crate) fn scan_sites(template: &str) -> Result<Vec<Site>, FormatParseError> {
    let bytes = template.as_bytes();
    let mut sites = Vec::new();
    let mut i = 0;
    let mut lit_start = 0;
    let mut next_arg = 0usize;

    while i < bytes.len() {
        if bytes[i] != b'%' {
            i += 1;
            continue;
        }
        if lit_start < i {
            sites.push(Site::Literal {
                start: lit_start,
                end: i,
            });
        }
        let start = i;
        i += 1;
        if i >= bytes.len() {
            return Err(FormatParseError::UnterminatedSpecifier { offset: start });
        }
        if bytes[i] == b'%' {
            i += 1;
            lit_start = i;
            sites.push(Site::Escape);
            continue;
        }

        let mut explicit_index = false;
        let mut arg_index = next_arg;
        if bytes[i] == b'[' {
            let close = bytes[i + 1..]
                .iter()
                .position(|&b| b == b']')
                .map(|p| i + 1 + p)
                .ok_or(FormatParseError::UnterminatedSpecifier { offset: start })?;
            let digits = &template[i + 1..close];
            let index: usize = digits
                .parse()
                .ok()
                .filter(|&n| n >= 1)
                .ok_or(FormatParseError::BadPositionalIndex { offset: i })?;
            arg_index = index - 1;
            explicit_index = true;
            i = close + 1;
        }

        let mut flags = Flags::default();
        loop {
            if i >= bytes.len() {
                return Err(FormatParseError::UnterminatedSpecifier { offset: start });
            }
            match bytes[i] {
                b'-' => flags.left_align = true,
                b'+' => flags.plus = true,
                b'0' => flags.zero_pad = true,
                b'#' => flags.alternate = true,
                b' ' => flags.space = true,
                _ => break,
            }
            i += 1;
        }

        let width = take_digits(bytes, &mut i);
        let mut precision = None;
        if i < bytes.len() && bytes[i] == b'.' {
            i += 1;
            precision = Some(take_digits(bytes, &mut i).unwrap_or(0));
        }
        if i >= bytes.len() {
            return Err(FormatParseError::UnterminatedSpecifier { offset: start });
        }

        let verb = template[i..]
            .chars()
            .next()
            .unwrap_or('\u{fffd}');
        if !verb.is_ascii_alphabetic() {
            return Err(FormatParseError::InvalidVerb {
                offset: i,
                found: verb,
            });
        }
        i += 1;
        sites.push(Site::Spec(FormatSpec {
            arg_index,
            explicit_index,
            flags,
            width,
            precision,
            verb,
            start,
            end: i,
        }));
        next_arg = arg_index + 1;
        lit_start = i;
    }

    if lit_start < bytes.len() {
        sites.push(Site::Literal {
            start: lit_start,
            end: bytes.len(),
        });
    }
    Ok(sites)
}

fn take_digits(bytes: &[u8], i: &mut usize) -> Option<usize> {
    let mut value: usize = 0;
    let mut seen = false;
    while *i < bytes.len() && bytes[*i].is_ascii_digit() {
        seen = true;
        value = value
            .saturating_mul(10)
            .saturating_add(usize::from(bytes[*i] - b'0'));
        *i += 1;
    }
    seen.then_some(value)
}

/// Parse a template into its ordered specifier list.
///
/// ```
/// use lingo_format::{parse_format_specifiers, classify_verb, VerbClass};
///
/// let specs = parse_format_specifiers("port %d, total %s").unwrap();
/// assert_eq!(specs.len(), 2);
/// assert_eq!(specs[0].verb, 'd');
/// assert_eq!(classify_verb(specs[0].verb), VerbClass::Raw);
/// assert_eq!(classify_verb(specs[1].verb), VerbClass::Localized);
/// ```
pub fn parse_format_specifiers(template: &str) -> Result<Vec<FormatSpec>, FormatParseError> {
    Ok(scan_sites(template)?
        .into_iter()
        .filter_map(|site| match site {
            Site::Spec(spec) => Some(spec),
            _ => None,
        })
        .collect())
}

/// Map argument index → verb letter. Where two sites consume the same
/// argument (explicit indices), the first occurrence wins.
#[must_use]
pub fn verbs_by_argument(specs: &[FormatSpec]) -> Vec<Option<char>> {
    let len = specs.iter().map(|s| s.arg_index + 1).max().unwrap_or(0);
    let mut verbs = vec![None; len];
    for spec in specs {
        if verbs[spec.arg_index].is_none() {
            verbs[spec.arg_index] = Some(spec.verb);
        }
    }
    verbs
}
