//! The validated, lockable translation store.
//!
//! # Invariants
//!
//! 1. **Key-set parity**: once a bundle holds a language, every newly
//!    introduced language must carry exactly the reference key set (the
//!    first-inserted language's keys). A violating merge is rolled back
//!    whole; readers never observe partial state.
//! 2. **Default language exists**: construction from sources fails
//!    unless the default language is among them, and it is always seeded
//!    first so its key set becomes the reference set.
//! 3. **Immutability is idempotent**: an immutable bundle rejects every
//!    mutation without side effects, however often it is asked.
//! 4. **Formatter cache is pure memoization**: entries are never
//!    invalidated for the bundle's lifetime.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Unknown key | key absent everywhere | key echoed, never an error |
//! | Unknown language | no stored compatible tag | default language used |
//! | Key-set mismatch | divergent translation file | merge rejected whole |
//! | Immutable bundle | `set_immutable` called earlier | mutation rejected |

use std::collections::{BTreeMap, HashMap};
use std::path::Path;
use std::sync::{Arc, RwLock};

use lingo_format::{Formatter, FormatArg, parse_format_specifiers, render_template};
use lingo_locale::LanguageMatcher;
use tracing::{debug, warn};
use unic_langid::LanguageIdentifier;

use crate::error::{I18nError, KeyProblem};
use crate::load::{self, TranslationSource};

// ---------------------------------------------------------------------------
// TranslationSet
// ---------------------------------------------------------------------------

/// Key → template mapping for a single language.
///
/// Deterministically ordered so validation diagnostics and iteration are
/// stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TranslationSet {
    entries: BTreeMap<String, String>,
}

impl TranslationSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite one translation.
    pub fn insert(&mut self, key: impl Into<String>, template: impl Into<String>) {
        self.entries.insert(key.into(), template.into());
    }

    /// Look up a template by key.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Whether the set holds `key`.
    #[must_use]
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the set has no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Iterate keys in sorted order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate entries in sorted key order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for TranslationSet {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}

impl Extend<(String, String)> for TranslationSet {
    fn extend<I: IntoIterator<Item = (String, String)>>(&mut self, iter: I) {
        self.entries.extend(iter);
    }
}

impl IntoIterator for TranslationSet {
    type Item = (String, String);
    type IntoIter = std::collections::btree_map::IntoIter<String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

// ---------------------------------------------------------------------------
// Bundle
// ---------------------------------------------------------------------------

struct BundleState {
    /// Stored languages in insertion order; the first entry owns the
    /// reference key set.
    order: Vec<LanguageIdentifier>,
    sets: HashMap<LanguageIdentifier, TranslationSet>,
    matcher: LanguageMatcher,
    formatters: HashMap<LanguageIdentifier, Arc<Formatter>>,
    immutable: bool,
}

impl BundleState {
    /// Resolve a requested language to a stored one: exact, then
    /// matcher-closest, then the default language.
    fn resolve(
        &self,
        language: &LanguageIdentifier,
        default: &LanguageIdentifier,
    ) -> LanguageIdentifier {
        if self.sets.contains_key(language) {
            return language.clone();
        }
        self.matcher
            .closest(language)
            .unwrap_or_else(|| default.clone())
    }

    /// Per-key lookup chain: exact language, matcher-closest language,
    /// default language.
    fn lookup(
        &self,
        language: &LanguageIdentifier,
        key: &str,
        default: &LanguageIdentifier,
    ) -> Option<(&str, LanguageIdentifier)> {
        if let Some(template) = self.sets.get(language).and_then(|set| set.get(key)) {
            return Some((template, language.clone()));
        }
        if let Some(closest) = self.matcher.closest(language) {
            if closest != *language {
                if let Some(template) = self.sets.get(&closest).and_then(|set| set.get(key)) {
                    return Some((template, closest));
                }
            }
        }
        self.sets
            .get(default)
            .and_then(|set| set.get(key))
            .map(|template| (template, default.clone()))
    }

    fn formatter_for(&self, language: &LanguageIdentifier) -> Arc<Formatter> {
        self.formatters
            .get(language)
            .cloned()
            .unwrap_or_else(|| Arc::new(Formatter::new(language.clone())))
    }
}

/// A validated store of per-language translation sets.
///
/// All state sits behind one reader-writer lock: lookups take the read
/// lock, mutation takes the write lock, and validation happens entirely
/// under the write lock so a failed merge is invisible to readers.
pub struct Bundle {
    default_language: LanguageIdentifier,
    state: RwLock<BundleState>,
}

impl std::fmt::Debug for Bundle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = self.read_state();
        f.debug_struct("Bundle")
            .field("default_language", &self.default_language.to_string())
            .field("languages", &state.order)
            .field("immutable", &state.immutable)
            .finish()
    }
}

impl Bundle {
    /// Create an empty bundle whose lookups fall back to
    /// `default_language`.
    #[must_use]
    pub fn new(default_language: LanguageIdentifier) -> Self {
        let formatter = Arc::new(Formatter::new(default_language.clone()));
        let state = BundleState {
            order: Vec::new(),
            sets: HashMap::new(),
            matcher: LanguageMatcher::new(Vec::new(), default_language.clone()),
            formatters: HashMap::from([(default_language.clone(), formatter)]),
            immutable: false,
        };
        Self {
            default_language,
            state: RwLock::new(state),
        }
    }

    /// Create a bundle seeded with the default language's translations;
    /// their key set becomes the reference set.
    pub fn from_translations(
        default_language: LanguageIdentifier,
        translations: impl IntoIterator<Item = (String, String)>,
    ) -> Result<Self, I18nError> {
        let bundle = Self::new(default_language.clone());
        bundle.add_language(default_language, translations)?;
        Ok(bundle)
    }

    /// Build a bundle from decoded sources. The default language is
    /// seeded first (its key set is the reference set); the remaining
    /// sources follow in supplied order. Missing default translations
    /// are a fatal construction error.
    pub fn from_sources(
        default_language: LanguageIdentifier,
        mut sources: Vec<TranslationSource>,
    ) -> Result<Self, I18nError> {
        let position = sources
            .iter()
            .position(|source| source.language == default_language)
            .ok_or_else(|| I18nError::DefaultLanguageMissing {
                language: default_language.clone(),
            })?;
        let default_source = sources.remove(position);
        let bundle = Self::new(default_language);
        bundle.add_language(default_source.language, default_source.entries)?;
        for source in sources {
            bundle.add_language(source.language, source.entries)?;
        }
        Ok(bundle)
    }

    /// Build a bundle from a directory of per-language JSON files.
    pub fn from_dir(
        path: impl AsRef<Path>,
        default_language: LanguageIdentifier,
    ) -> Result<Self, I18nError> {
        let sources = load::load_dir(path.as_ref())?;
        Self::from_sources(default_language, sources)
    }

    /// The language lookups fall back to last.
    #[must_use]
    pub fn default_language(&self) -> &LanguageIdentifier {
        &self.default_language
    }

    /// Merge `translations` into the set for `language`.
    ///
    /// New keys are added and existing keys overwritten. A language seen
    /// for the first time (other than the very first) is validated
    /// against the reference key set; on violation nothing is committed
    /// and the offending keys are reported. Every template must survive
    /// format-specifier analysis.
    pub fn add_language(
        &self,
        language: LanguageIdentifier,
        translations: impl IntoIterator<Item = (String, String)>,
    ) -> Result<(), I18nError> {
        let entries: Vec<(String, String)> = translations.into_iter().collect();
        if entries.is_empty() {
            return Err(I18nError::EmptyTranslations { language });
        }

        let mut state = self.write_state();
        if state.immutable {
            return Err(I18nError::BundleImmutable);
        }

        for (key, template) in &entries {
            if let Err(reason) = parse_format_specifiers(template) {
                return Err(I18nError::TemplateRejected {
                    language: language.clone(),
                    key: key.clone(),
                    reason,
                });
            }
        }

        // Merge into a candidate so a validation failure commits nothing.
        let is_new = !state.sets.contains_key(&language);
        let mut candidate = state.sets.get(&language).cloned().unwrap_or_default();
        candidate.extend(entries);

        if is_new {
            if let Some(reference_tag) = state.order.first() {
                let reference = &state.sets[reference_tag];
                let problems = key_parity_problems(reference, &candidate);
                if !problems.is_empty() {
                    warn!(
                        language = %language,
                        problems = problems.len(),
                        "rejected translations with mismatched key set"
                    );
                    return Err(I18nError::InvalidTranslations { language, problems });
                }
            }
        }

        debug!(language = %language, keys = candidate.len(), "language added");
        state.sets.insert(language.clone(), candidate);
        if is_new {
            state.order.push(language.clone());
        }
        state.matcher = LanguageMatcher::new(state.order.clone(), self.default_language.clone());
        state
            .formatters
            .entry(language.clone())
            .or_insert_with(|| Arc::new(Formatter::new(language)));
        Ok(())
    }

    /// Translate `key` in the default language.
    #[must_use]
    pub fn translate(&self, key: &str, args: &[FormatArg]) -> String {
        self.translate_in(&self.default_language, key, args)
    }

    /// Translate `key` for `language`: exact tag, then the closest
    /// stored language, then the default language, then the key itself.
    ///
    /// With no arguments the raw template is returned verbatim, so
    /// literal `%` characters in untranslated text are never
    /// misinterpreted. Lookup is total — it never fails.
    #[must_use]
    pub fn translate_in(
        &self,
        language: &LanguageIdentifier,
        key: &str,
        args: &[FormatArg],
    ) -> String {
        let state = self.read_state();
        match state.lookup(language, key, &self.default_language) {
            Some((template, owner)) => {
                if args.is_empty() {
                    template.to_string()
                } else {
                    let formatter = state.formatter_for(&owner);
                    render_template(template, args, &formatter)
                }
            }
            None => {
                debug!(key, language = %language, "no translation found, echoing key");
                key.to_string()
            }
        }
    }

    /// Whether `language` (exactly) defines `key`.
    #[must_use]
    pub fn has_key(&self, language: &LanguageIdentifier, key: &str) -> bool {
        self.read_state()
            .sets
            .get(language)
            .is_some_and(|set| set.contains_key(key))
    }

    /// The raw template stored for exactly `language`/`key`.
    #[must_use]
    pub fn raw_template(&self, language: &LanguageIdentifier, key: &str) -> Option<String> {
        self.read_state()
            .sets
            .get(language)
            .and_then(|set| set.get(key))
            .map(str::to_string)
    }

    /// Locale formatter for `language`, with the same fallback order as
    /// [`translate_in`](Self::translate_in), memoized per language.
    #[must_use]
    pub fn formatter(&self, language: &LanguageIdentifier) -> Arc<Formatter> {
        let resolved = {
            let state = self.read_state();
            let resolved = state.resolve(language, &self.default_language);
            if let Some(formatter) = state.formatters.get(&resolved) {
                return formatter.clone();
            }
            resolved
        };
        let mut state = self.write_state();
        state
            .formatters
            .entry(resolved.clone())
            .or_insert_with(|| Arc::new(Formatter::new(resolved)))
            .clone()
    }

    /// Whether `language` is stored exactly.
    #[must_use]
    pub fn has_language(&self, language: &LanguageIdentifier) -> bool {
        self.read_state().sets.contains_key(language)
    }

    /// The closest stored language for `language`, or `None` when no
    /// stored tag is linguistically compatible.
    #[must_use]
    pub fn closest(&self, language: &LanguageIdentifier) -> Option<LanguageIdentifier> {
        self.read_state().matcher.closest(language)
    }

    /// Stored languages in insertion order.
    #[must_use]
    pub fn languages(&self) -> Vec<LanguageIdentifier> {
        self.read_state().order.clone()
    }

    /// A copy of the translation set stored for exactly `language`.
    #[must_use]
    pub fn translations(&self, language: &LanguageIdentifier) -> Option<TranslationSet> {
        self.read_state().sets.get(language).cloned()
    }

    /// The reference key set (keys of the first-inserted language).
    #[must_use]
    pub fn keys(&self) -> Vec<String> {
        let state = self.read_state();
        state
            .order
            .first()
            .and_then(|tag| state.sets.get(tag))
            .map(|set| set.keys().map(str::to_string).collect())
            .unwrap_or_default()
    }

    /// Whether the bundle stores no languages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.read_state().order.is_empty()
    }

    /// Make the bundle read-only. Idempotent; later mutation attempts
    /// return [`I18nError::BundleImmutable`] without side effects.
    pub fn set_immutable(&self) {
        self.write_state().immutable = true;
    }

    /// Whether the bundle rejects mutation.
    #[must_use]
    pub fn is_immutable(&self) -> bool {
        self.read_state().immutable
    }

    fn read_state(&self) -> std::sync::RwLockReadGuard<'_, BundleState> {
        self.state
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }

    fn write_state(&self) -> std::sync::RwLockWriteGuard<'_, BundleState> {
        self.state
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Symmetric key-set difference against the reference set: one problem
/// per missing key, one per extra key, in sorted key order.
fn key_parity_problems(reference: &TranslationSet, candidate: &TranslationSet) -> Vec<KeyProblem> {
    let mut problems = Vec::new();
    for key in reference.keys() {
        if !candidate.contains_key(key) {
            problems.push(KeyProblem::Missing { key: key.into() });
        }
    }
    for key in candidate.keys() {
        if !reference.contains_key(key) {
            problems.push(KeyProblem::Extra { key: key.into() });
        }
    }
    problems
}

#[cfg(test)]
mod tests {
    use super::*;
    use lingo_format::msg_args;

    fn tag(s: &str) -> LanguageIdentifier {
        s.parse().expect("valid tag")
    }

    fn set(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
        pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect()
    }

    fn english_bundle() -> Bundle {
        Bundle::from_translations(
            tag("en"),
            set(&[("greet", "Hello, %s!"), ("bye", "Goodbye")]),
        )
        .expect("valid bundle")
    }

    #[test]
    fn first_language_seeds_the_reference_set() {
        let bundle = english_bundle();
        assert_eq!(bundle.keys(), vec!["bye".to_string(), "greet".to_string()]);
        assert_eq!(bundle.languages(), vec![tag("en")]);
    }

    #[test]
    fn unknown_language_falls_back_to_default() {
        // Spanish is not stored; English is the fallback of last resort.
        let bundle = english_bundle();
        let out = bundle.translate_in(&tag("es"), "greet", &msg_args!["World"]);
        assert_eq!(out, "Hello, World!");
    }

    #[test]
    fn matcher_finds_regional_variant() {
        let bundle = english_bundle();
        bundle
            .add_language(tag("de"), set(&[("greet", "Hallo, %s!"), ("bye", "Tschüss")]))
            .unwrap();
        let out = bundle.translate_in(&tag("de-AT"), "greet", &msg_args!["Welt"]);
        assert_eq!(out, "Hallo, Welt!");
    }

    #[test]
    fn missing_key_echoes_the_key() {
        let bundle = english_bundle();
        assert_eq!(bundle.translate_in(&tag("en"), "nope.key", &[]), "nope.key");
    }

    #[test]
    fn empty_args_return_template_verbatim() {
        let bundle = Bundle::from_translations(
            tag("en"),
            set(&[("pct", "literal % signs stay %d intact")]),
        )
        .unwrap();
        assert_eq!(
            bundle.translate("pct", &[]),
            "literal % signs stay %d intact"
        );
    }

    #[test]
    fn mismatched_key_set_is_rejected_whole() {
        let bundle = english_bundle();
        bundle
            .add_language(tag("fr"), set(&[("greet", "Bonjour, %s!"), ("bye", "Au revoir")]))
            .unwrap();

        // German misses "bye" and adds "other".
        let err = bundle
            .add_language(tag("de"), set(&[("greet", "Hallo, %s!"), ("other", "x")]))
            .unwrap_err();
        assert_eq!(
            err.key_problems(),
            &[
                KeyProblem::Missing { key: "bye".into() },
                KeyProblem::Extra { key: "other".into() },
            ]
        );
        assert!(err.to_string().contains("missing key"));

        // Nothing committed: German is absent entirely.
        assert!(!bundle.has_language(&tag("de")));
        assert_eq!(bundle.languages(), vec![tag("en"), tag("fr")]);
        assert!(!bundle.has_key(&tag("de"), "greet"));
    }

    #[test]
    fn merge_into_existing_language_overwrites_and_adds() {
        let bundle = english_bundle();
        bundle
            .add_language(tag("en"), set(&[("greet", "Hi, %s!"), ("extra", "New")]))
            .unwrap();
        assert_eq!(bundle.translate("greet", &msg_args!["X"]), "Hi, X!");
        assert_eq!(bundle.translate("extra", &[]), "New");
    }

    #[test]
    fn empty_translations_are_rejected() {
        let bundle = english_bundle();
        let err = bundle.add_language(tag("fr"), Vec::new()).unwrap_err();
        assert_eq!(
            err,
            I18nError::EmptyTranslations {
                language: tag("fr")
            }
        );
    }

    #[test]
    fn malformed_template_is_rejected_at_add_time() {
        let bundle = english_bundle();
        let err = bundle
            .add_language(tag("en"), set(&[("bad", "dangling %")]))
            .unwrap_err();
        assert!(matches!(err, I18nError::TemplateRejected { .. }));
        assert!(!bundle.has_key(&tag("en"), "bad"));
    }

    #[test]
    fn immutable_bundle_rejects_mutation_idempotently() {
        let bundle = english_bundle();
        bundle.set_immutable();
        bundle.set_immutable();
        assert!(bundle.is_immutable());

        for _ in 0..3 {
            let err = bundle
                .add_language(tag("fr"), set(&[("greet", "x"), ("bye", "y")]))
                .unwrap_err();
            assert_eq!(err, I18nError::BundleImmutable);
        }
        assert_eq!(bundle.languages(), vec![tag("en")]);
        assert_eq!(
            bundle.translations(&tag("en")).unwrap().len(),
            2,
            "translations unchanged"
        );
    }

    #[test]
    fn from_sources_requires_the_default_language() {
        let sources = vec![TranslationSource {
            language: tag("fr"),
            entries: set(&[("k", "v")]).into_iter().collect(),
        }];
        let err = Bundle::from_sources(tag("en"), sources).unwrap_err();
        assert_eq!(
            err,
            I18nError::DefaultLanguageMissing {
                language: tag("en")
            }
        );
    }

    #[test]
    fn from_sources_seeds_default_language_first() {
        // French appears before English in the source list, but English
        // (the default) still owns the reference key set.
        let sources = vec![
            TranslationSource {
                language: tag("fr"),
                entries: set(&[("a", "A"), ("b", "B")]).into_iter().collect(),
            },
            TranslationSource {
                language: tag("en"),
                entries: set(&[("a", "A"), ("b", "B")]).into_iter().collect(),
            },
        ];
        let bundle = Bundle::from_sources(tag("en"), sources).unwrap();
        assert_eq!(bundle.languages()[0], tag("en"));
    }

    #[test]
    fn formatter_is_memoized_per_language() {
        let bundle = english_bundle();
        let first = bundle.formatter(&tag("en"));
        let second = bundle.formatter(&tag("en"));
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[test]
    fn formatter_follows_the_lookup_fallback() {
        let bundle = english_bundle();
        bundle
            .add_language(tag("de"), set(&[("greet", "Hallo, %s!"), ("bye", "Tschüss")]))
            .unwrap();
        assert_eq!(bundle.formatter(&tag("de-AT")).language(), &tag("de"));
        assert_eq!(bundle.formatter(&tag("ja")).language(), &tag("en"));
    }

    #[test]
    fn concurrent_readers_and_writers() {
        let bundle = Arc::new(english_bundle());
        let mut handles = Vec::new();
        for _ in 0..4 {
            let reader = Arc::clone(&bundle);
            handles.push(std::thread::spawn(move || {
                for _ in 0..200 {
                    let out = reader.translate_in(&tag("fr"), "greet", &msg_args!["x"]);
                    assert!(out == "Hello, x!" || out == "Bonjour, x!");
                }
            }));
        }
        let writer = Arc::clone(&bundle);
        handles.push(std::thread::spawn(move || {
            let _ = writer.add_language(
                tag("fr"),
                set(&[("greet", "Bonjour, %s!"), ("bye", "Au revoir")]),
            );
        }));
        for handle in handles {
            handle.join().expect("no panics");
        }
    }
}
