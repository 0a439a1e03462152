//! Layered lookup across user, system, and default bundles.
//!
//! # Invariants
//!
//! 1. **Precedence**: the user bundle always shadows the system bundle,
//!    which always shadows the default bundle — per key, per language.
//! 2. **Lockstep**: the current language and its formatter are updated
//!    together; a reader never observes a formatter for a different
//!    language than the one it read.
//! 3. **Totality**: lookup always produces a string (translation,
//!    English fallback, or the echoed key), never an error.
//!
//! Layering and per-bundle key-set validation are independent: a user
//! bundle may override a handful of system keys and still satisfy its
//! own reference set.

use std::sync::{Arc, OnceLock, RwLock};

use lingo_format::{FormatArg, Formatter, render_template};
use lingo_locale::base_language;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::bundle::Bundle;

/// Message key for the translated range-separator phrase.
pub const RANGE_SEPARATOR_KEY: &str = "app.msg.range_to";

fn english() -> &'static LanguageIdentifier {
    static ENGLISH: OnceLock<LanguageIdentifier> = OnceLock::new();
    ENGLISH.get_or_init(|| "en".parse().expect("literal tag is valid"))
}

struct ProviderState {
    language: LanguageIdentifier,
    formatter: Arc<Formatter>,
}

/// Composes up to three bundles (user > system > default) into one
/// lookup, and owns the process's notion of "current language".
pub struct LayeredMessageProvider {
    user: Option<Arc<Bundle>>,
    system: Option<Arc<Bundle>>,
    default_bundle: Option<Arc<Bundle>>,
    state: RwLock<ProviderState>,
}

impl Default for LayeredMessageProvider {
    fn default() -> Self {
        Self::new()
    }
}

impl LayeredMessageProvider {
    /// An empty provider with English as the current language.
    #[must_use]
    pub fn new() -> Self {
        let language = english().clone();
        let formatter = Arc::new(Formatter::new(language.clone()));
        Self {
            user: None,
            system: None,
            default_bundle: None,
            state: RwLock::new(ProviderState {
                language,
                formatter,
            }),
        }
    }

    /// Attach the highest-precedence bundle (end-user overrides).
    #[must_use]
    pub fn with_user_bundle(mut self, bundle: Arc<Bundle>) -> Self {
        self.user = Some(bundle);
        self
    }

    /// Attach the middle-precedence bundle (application messages).
    #[must_use]
    pub fn with_system_bundle(mut self, bundle: Arc<Bundle>) -> Self {
        self.system = Some(bundle);
        self
    }

    /// Attach the lowest-precedence bundle (built-in defaults).
    #[must_use]
    pub fn with_default_bundle(mut self, bundle: Arc<Bundle>) -> Self {
        self.default_bundle = Some(bundle);
        self
    }

    fn tiers(&self) -> impl Iterator<Item = &Arc<Bundle>> {
        self.user
            .iter()
            .chain(self.system.iter())
            .chain(self.default_bundle.iter())
    }

    /// The provider-level current language.
    #[must_use]
    pub fn current_language(&self) -> LanguageIdentifier {
        self.read_state().language.clone()
    }

    /// The formatter matching the current language.
    #[must_use]
    pub fn formatter(&self) -> Arc<Formatter> {
        self.read_state().formatter.clone()
    }

    /// Translate `key` in the current language.
    #[must_use]
    pub fn translate(&self, key: &str, args: &[FormatArg]) -> String {
        let language = self.current_language();
        self.translate_in(&language, key, args)
    }

    /// Translate `key` for `language`: each tier is checked for an exact
    /// hit under `language`, then the whole scan repeats for English,
    /// then the key itself becomes the message. Whatever wins is put
    /// through the same formatting pass, so even a missing-key message
    /// with arguments gets sensible `%`-verb substitution.
    #[must_use]
    pub fn translate_in(
        &self,
        language: &LanguageIdentifier,
        key: &str,
        args: &[FormatArg],
    ) -> String {
        let template = match self.raw_template(language, key) {
            Some(template) => template,
            None => {
                warn!(key, language = %language, "no tier provides key, echoing");
                key.to_string()
            }
        };
        if args.is_empty() {
            return template;
        }
        let formatter = self.formatter_for(language);
        render_template(&template, args, &formatter)
    }

    /// The highest-precedence raw template for `language`/`key`,
    /// falling back to an English scan.
    #[must_use]
    pub fn raw_template(&self, language: &LanguageIdentifier, key: &str) -> Option<String> {
        for tier in self.tiers() {
            if let Some(template) = tier.raw_template(language, key) {
                return Some(template);
            }
        }
        if language != english() {
            for tier in self.tiers() {
                if let Some(template) = tier.raw_template(english(), key) {
                    return Some(template);
                }
            }
        }
        None
    }

    /// Whether any tier defines `key` under exactly `language`.
    #[must_use]
    pub fn has_key(&self, language: &LanguageIdentifier, key: &str) -> bool {
        self.tiers().any(|tier| tier.has_key(language, key))
    }

    /// Adopt a new current language, updating language and formatter
    /// together.
    ///
    /// Resolution favors more specific, more customized sources: a user
    /// override must never be shadowed by a generic system match.
    ///
    /// 1. The user bundle stores `language` exactly → adopt it.
    /// 2. The user bundle's matcher finds a real match → adopt it,
    ///    normalized to a tag some bundle actually stores.
    /// 3. The system, then default, bundle stores `language` exactly →
    ///    adopt it.
    /// 4. The system, then default, bundle's matcher finds a real match
    ///    → adopt it, normalized.
    /// 5. Otherwise adopt `language` verbatim; lookups will fall through
    ///    to English or key echo at read time.
    pub fn set_default_language(&self, language: LanguageIdentifier) {
        let adopted = self.resolve_language_choice(&language);
        debug!(requested = %language, adopted = %adopted, "current language set");
        let mut state = self.write_state();
        state.formatter = Arc::new(Formatter::new(adopted.clone()));
        state.language = adopted;
    }

    fn resolve_language_choice(&self, requested: &LanguageIdentifier) -> LanguageIdentifier {
        if let Some(user) = &self.user {
            if user.has_language(requested) {
                return requested.clone();
            }
            if let Some(matched) = user.closest(requested) {
                return self.normalize_stored_tag(matched);
            }
        }
        let lower_tiers = [&self.system, &self.default_bundle];
        for tier in lower_tiers.iter().filter_map(|tier| tier.as_ref()) {
            if tier.has_language(requested) {
                return requested.clone();
            }
        }
        for tier in lower_tiers.iter().filter_map(|tier| tier.as_ref()) {
            if let Some(matched) = tier.closest(requested) {
                return self.normalize_stored_tag(matched);
            }
        }
        requested.clone()
    }

    /// Re-derive a tag some bundle actually stores: keep `tag` when a
    /// tier has it exactly, otherwise try its base language, otherwise
    /// keep it unmodified. Guards against remembering a language string
    /// no bundle can serve.
    #[must_use]
    pub fn normalize_stored_tag(&self, tag: LanguageIdentifier) -> LanguageIdentifier {
        if self.tiers().any(|tier| tier.has_language(&tag)) {
            return tag;
        }
        let base = base_language(&tag);
        if self.tiers().any(|tier| tier.has_language(&base)) {
            return base;
        }
        tag
    }

    /// Render a range with the translated separator phrase (key
    /// [`RANGE_SEPARATOR_KEY`]) when any tier provides one, and an
    /// en-dash otherwise.
    #[must_use]
    pub fn format_range(&self, min: &FormatArg, max: &FormatArg) -> String {
        let language = self.current_language();
        let separator = self.raw_template(&language, RANGE_SEPARATOR_KEY);
        self.formatter()
            .format_range(min, max, separator.as_deref())
    }

    /// Formatter for an explicit language: the provider's own when it
    /// matches the current language, a tier's memoized formatter when
    /// one stores the language, a fresh one otherwise.
    #[must_use]
    pub fn formatter_for(&self, language: &LanguageIdentifier) -> Arc<Formatter> {
        {
            let state = self.read_state();
            if state.language == *language {
                return state.formatter.clone();
            }
        }
        for tier in self.tiers() {
            if tier.has_language(language) {
                return tier.formatter(language);
            }
        }
        Arc::new(Formatter::new(language.clone()))
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, ProviderState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, ProviderState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl std::fmt::Debug for LayeredMessageProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LayeredMessageProvider")
            .field("user", &self.user.is_some())
            .field("system", &self.system.is_some())
            .field("default", &self.default_bundle.is_some())
            .field("language", &self.current_language().to_string())
            .finish()
    }
}
