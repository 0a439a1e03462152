//! Host-locale detection behind an injectable capability.
//!
//! The engine consumes a single BCP-47 tag from whatever detector the
//! caller wires in; OS specifics stay on this side of the boundary.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | No host locale | headless/CI environment | `detect()` returns `None` |
//! | Unparsable locale | exotic `LANG` value | normalized, then `None` |
//! | `C`/`POSIX` locale | minimal environments | maps to `en-US` |

use unic_langid::LanguageIdentifier;

use crate::tag::normalize_locale_tag;

/// Read-only environment access, injectable for tests.
pub trait EnvProvider {
    /// Fetch the environment variable value for `key`.
    fn var(&self, key: &str) -> Option<String>;
}

/// Environment provider backed by the process environment.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemEnv;

impl EnvProvider for SystemEnv {
    fn var(&self, key: &str) -> Option<String> {
        std::env::var(key).ok()
    }
}

/// Capability for obtaining the host locale as a validated tag.
pub trait LocaleDetector {
    /// The host locale, normalized, or `None` when undetectable.
    fn detect(&self) -> Option<LanguageIdentifier>;
}

/// Detector backed by the `sys-locale` crate.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemLocaleDetector;

impl LocaleDetector for SystemLocaleDetector {
    fn detect(&self) -> Option<LanguageIdentifier> {
        sys_locale::get_locale().and_then(|raw| normalize_locale_tag(&raw))
    }
}

/// Detector reading POSIX locale variables in precedence order
/// (`LC_ALL`, then `LC_MESSAGES`, then `LANG`).
#[derive(Debug, Default, Clone, Copy)]
pub struct EnvLocaleDetector<E = SystemEnv> {
    env: E,
}

impl<E: EnvProvider> EnvLocaleDetector<E> {
    /// Build a detector over the given environment provider.
    #[must_use]
    pub fn new(env: E) -> Self {
        Self { env }
    }
}

impl<E: EnvProvider> LocaleDetector for EnvLocaleDetector<E> {
    fn detect(&self) -> Option<LanguageIdentifier> {
        ["LC_ALL", "LC_MESSAGES", "LANG"]
            .iter()
            .filter_map(|key| self.env.var(key))
            .find_map(|raw| normalize_locale_tag(&raw))
    }
}
