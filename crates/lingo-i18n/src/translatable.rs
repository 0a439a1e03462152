//! Deferred, re-translatable error values.
//!
//! A `TranslatableError` carries a message key and arguments instead of
//! a rendered string, so the final text is produced in whatever language
//! the consuming provider speaks at display time — and re-produced in
//! another language later if asked.
//!
//! # Invariants
//!
//! 1. Sentinel identity survives [`with_args`](TranslatableError::with_args)
//!    and [`wrap`](TranslatableError::wrap): derived values still
//!    [`is`](TranslatableError::is) their originating sentinel.
//! 2. All "mutators" are pure; an existing value is never modified.
//! 3. A chain of wrapped translatable errors renders end-to-end in one
//!    language, never a mix.

use std::sync::{Arc, OnceLock, RwLock};

use lingo_format::FormatArg;

use crate::load::builtin_bundle;
use crate::provider::LayeredMessageProvider;

/// One argument to a translatable error, resolved at construction time.
///
/// A closed variant type: a value is either plain data or a reference to
/// another message key, translated with the same provider at render
/// time. There is no runtime capability probing.
#[derive(Debug, Clone, PartialEq)]
pub enum ErrorArg {
    Plain(FormatArg),
    /// Rendered by translating the named key (no arguments) at format
    /// time.
    Translatable(String),
}

impl From<FormatArg> for ErrorArg {
    fn from(value: FormatArg) -> Self {
        Self::Plain(value)
    }
}

impl ErrorArg {
    /// An argument that is itself a message key.
    #[must_use]
    pub fn translatable(key: impl Into<String>) -> Self {
        Self::Translatable(key.into())
    }
}

/// An error identified by a translation key, rendered late.
#[derive(Debug, Clone)]
pub struct TranslatableError {
    key: String,
    sentinel: Arc<()>,
    args: Vec<ErrorArg>,
    source: Option<Arc<dyn std::error::Error + Send + Sync + 'static>>,
}

impl TranslatableError {
    /// Create a sentinel error for `key`. The sentinel's identity — not
    /// its message content — is what [`is`](Self::is) compares.
    #[must_use]
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sentinel: Arc::new(()),
            args: Vec::new(),
            source: None,
        }
    }

    /// The translation key.
    #[must_use]
    pub fn key(&self) -> &str {
        &self.key
    }

    /// A copy of this error carrying plain arguments. Pure: `self` is
    /// untouched and the sentinel is shared.
    #[must_use]
    pub fn with_args(&self, args: impl IntoIterator<Item = FormatArg>) -> Self {
        let mut derived = self.clone();
        derived.args = args.into_iter().map(ErrorArg::Plain).collect();
        derived
    }

    /// A copy carrying explicitly-variant arguments (plain and
    /// translatable mixed).
    #[must_use]
    pub fn with_error_args(&self, args: impl IntoIterator<Item = ErrorArg>) -> Self {
        let mut derived = self.clone();
        derived.args = args.into_iter().collect();
        derived
    }

    /// A copy wrapping `source`. Pure; the sentinel is shared.
    #[must_use]
    pub fn wrap<E>(&self, source: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let mut derived = self.clone();
        derived.source = Some(Arc::new(source));
        derived
    }

    /// Whether `other` derives from the same sentinel as `self`.
    #[must_use]
    pub fn is(&self, other: &TranslatableError) -> bool {
        Arc::ptr_eq(&self.sentinel, &other.sentinel)
    }

    /// Render the message through `provider`, in the provider's current
    /// language. Wrapped errors are appended after `": "`; nested
    /// translatable errors render through the same provider, so the
    /// whole chain speaks one language.
    #[must_use]
    pub fn format(&self, provider: &LayeredMessageProvider) -> String {
        let mut message = if self.args.is_empty() {
            provider.translate(&self.key, &[])
        } else {
            let resolved: Vec<FormatArg> = self
                .args
                .iter()
                .map(|arg| match arg {
                    ErrorArg::Plain(value) => value.clone(),
                    ErrorArg::Translatable(key) => {
                        FormatArg::Str(provider.translate(key, &[]))
                    }
                })
                .collect();
            provider.translate(&self.key, &resolved)
        };
        if let Some(source) = &self.source {
            message.push_str(": ");
            match source.as_ref().downcast_ref::<TranslatableError>() {
                Some(nested) => message.push_str(&nested.format(provider)),
                None => message.push_str(&source.to_string()),
            }
        }
        message
    }
}

impl std::fmt::Display for TranslatableError {
    /// Convenience rendering against the process-wide default provider.
    /// Explicit [`format`](Self::format) is preferred wherever a
    /// provider is in scope.
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.format(&default_provider()))
    }
}

impl std::error::Error for TranslatableError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|source| source.as_ref() as &(dyn std::error::Error + 'static))
    }
}

// ---------------------------------------------------------------------------
// Process-wide default provider
// ---------------------------------------------------------------------------

static PROCESS_PROVIDER: RwLock<Option<Arc<LayeredMessageProvider>>> = RwLock::new(None);

/// Replace the process-wide default provider used by `Display`.
pub fn set_default_provider(provider: Arc<LayeredMessageProvider>) {
    let mut slot = PROCESS_PROVIDER
        .write()
        .unwrap_or_else(std::sync::PoisonError::into_inner);
    *slot = Some(provider);
}

/// The process-wide default provider: whatever
/// [`set_default_provider`] installed, or a lazily built provider over
/// the built-in messages.
#[must_use]
pub fn default_provider() -> Arc<LayeredMessageProvider> {
    {
        let slot = PROCESS_PROVIDER
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner);
        if let Some(provider) = slot.as_ref() {
            return provider.clone();
        }
    }
    static BUILTIN: OnceLock<Arc<LayeredMessageProvider>> = OnceLock::new();
    BUILTIN
        .get_or_init(|| {
            Arc::new(
                LayeredMessageProvider::new().with_default_bundle(Arc::new(builtin_bundle())),
            )
        })
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::Bundle;
    use lingo_format::msg_args;

    fn provider_with(entries: &[(&str, &str)]) -> LayeredMessageProvider {
        let bundle = Bundle::from_translations(
            "en".parse().unwrap(),
            entries
                .iter()
                .map(|(k, v)| ((*k).to_string(), (*v).to_string())),
        )
        .expect("valid bundle");
        LayeredMessageProvider::new().with_system_bundle(Arc::new(bundle))
    }

    #[test]
    fn renders_template_with_args() {
        let provider = provider_with(&[("error.port", "port %d is busy")]);
        let err = TranslatableError::new("error.port").with_args(msg_args![8080]);
        assert_eq!(err.format(&provider), "port 8080 is busy");
    }

    #[test]
    fn unknown_key_echoes() {
        let provider = provider_with(&[("some.key", "x")]);
        let err = TranslatableError::new("error.unknown");
        assert_eq!(err.format(&provider), "error.unknown");
    }

    #[test]
    fn wrapped_chain_renders_end_to_end() {
        let provider = provider_with(&[
            ("error.outer", "outer error"),
            ("error.inner", "inner error"),
        ]);
        let inner = TranslatableError::new("error.inner");
        let outer = TranslatableError::new("error.outer").wrap(inner);
        assert_eq!(outer.format(&provider), "outer error: inner error");
    }

    #[test]
    fn wrapped_foreign_error_uses_its_display() {
        let provider = provider_with(&[("error.io", "read failed")]);
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = TranslatableError::new("error.io").wrap(io);
        assert_eq!(err.format(&provider), "read failed: gone");
    }

    #[test]
    fn sentinel_identity_survives_derivation() {
        let sentinel = TranslatableError::new("error.base");
        let derived = sentinel
            .with_args(msg_args![1])
            .wrap(TranslatableError::new("error.other"));
        assert!(sentinel.is(&derived));
        assert!(derived.is(&sentinel));

        // Same key, different origin: not the same sentinel.
        let unrelated = TranslatableError::new("error.base");
        assert!(!sentinel.is(&unrelated));
    }

    #[test]
    fn mutators_are_pure() {
        let base = TranslatableError::new("error.base");
        let _derived = base.with_args(msg_args![1, 2]);
        assert!(base.args.is_empty());
        assert!(base.source.is_none());
    }

    #[test]
    fn translatable_args_resolve_through_the_provider() {
        let provider = provider_with(&[
            ("error.invalid", "invalid value for %s"),
            ("field.port", "the port number"),
        ]);
        let err = TranslatableError::new("error.invalid")
            .with_error_args([ErrorArg::translatable("field.port")]);
        assert_eq!(err.format(&provider), "invalid value for the port number");
    }

    #[test]
    fn source_is_exposed_through_the_error_trait() {
        let inner = TranslatableError::new("error.inner");
        let outer = TranslatableError::new("error.outer").wrap(inner);
        let source = std::error::Error::source(&outer).expect("has source");
        assert!(source.downcast_ref::<TranslatableError>().is_some());
    }
}
