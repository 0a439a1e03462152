//! Decoding translation sources: one flat JSON object per language.
//!
//! Filenames carry the language (`de-CH.json` → `de-CH`). Loading is
//! construction-time work — nothing here runs on the lookup path — and
//! failures are aggregated per file rather than first-error-wins, so one
//! bad file in a directory reports alongside its neighbours.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tracing::debug;
use unic_langid::LanguageIdentifier;

use crate::bundle::{Bundle, TranslationSet};
use crate::error::I18nError;

/// Built-in system messages shipped with the engine.
const BUILTIN_EN: &str = include_str!("messages/en.json");
const BUILTIN_DE: &str = include_str!("messages/de.json");
const BUILTIN_FR: &str = include_str!("messages/fr.json");

/// One language's worth of decoded translations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TranslationSource {
    pub language: LanguageIdentifier,
    pub entries: TranslationSet,
}

/// Decode a flat JSON object of string values.
///
/// An empty document, a non-object document, or any non-string value is
/// a fatal per-language error.
pub fn parse_document(
    language: &LanguageIdentifier,
    json: &str,
) -> Result<TranslationSet, I18nError> {
    let malformed = |reason: String| I18nError::MalformedDocument {
        language: language.to_string(),
        reason,
    };
    let value: Value =
        serde_json::from_str(json).map_err(|error| malformed(error.to_string()))?;
    let Value::Object(object) = value else {
        return Err(malformed("top-level value is not an object".to_string()));
    };
    if object.is_empty() {
        return Err(I18nError::EmptyTranslations {
            language: language.clone(),
        });
    }
    let mut entries = TranslationSet::new();
    for (key, value) in object {
        let Value::String(template) = value else {
            return Err(malformed(format!("value for key {key:?} is not a string")));
        };
        entries.insert(key, template);
    }
    Ok(entries)
}

/// Load every `*.json` file in `dir` as a translation source.
///
/// The filename stem must parse as a language tag. Errors are collected
/// per file; any failure fails the whole load with the full list.
/// Successful sources come back in filename order (deterministic across
/// platforms).
pub fn load_dir(dir: &Path) -> Result<Vec<TranslationSource>, I18nError> {
    let read_dir = fs::read_dir(dir).map_err(|error| I18nError::Io {
        path: dir.to_path_buf(),
        reason: error.to_string(),
    })?;

    let mut paths: Vec<_> = read_dir
        .filter_map(Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.extension().is_some_and(|ext| ext == "json"))
        .collect();
    paths.sort();

    let mut sources = Vec::new();
    let mut failures = Vec::new();
    for path in paths {
        match load_file(&path) {
            Ok(source) => sources.push(source),
            Err(error) => failures.push((path, error)),
        }
    }
    if !failures.is_empty() {
        return Err(I18nError::LoadFailed { files: failures });
    }
    debug!(dir = %dir.display(), count = sources.len(), "translation sources loaded");
    Ok(sources)
}

fn load_file(path: &Path) -> Result<TranslationSource, I18nError> {
    let stem = path
        .file_stem()
        .and_then(|stem| stem.to_str())
        .ok_or_else(|| I18nError::InvalidLanguage {
            value: path.display().to_string(),
        })?;
    let language: LanguageIdentifier =
        stem.parse().map_err(|_| I18nError::InvalidLanguage {
            value: stem.to_string(),
        })?;
    let json = fs::read_to_string(path).map_err(|error| I18nError::Io {
        path: path.to_path_buf(),
        reason: error.to_string(),
    })?;
    let entries = parse_document(&language, &json)?;
    Ok(TranslationSource { language, entries })
}

/// The bundle of built-in system messages (range separator, common
/// error templates), with English as the default language.
///
/// Intended as the default tier of a layered provider.
#[must_use]
pub fn builtin_bundle() -> Bundle {
    let sources = [("en", BUILTIN_EN), ("de", BUILTIN_DE), ("fr", BUILTIN_FR)]
        .into_iter()
        .map(|(tag, json)| {
            let language: LanguageIdentifier =
                tag.parse().expect("embedded tag is valid");
            let entries =
                parse_document(&language, json).expect("embedded messages are well-formed");
            TranslationSource { language, entries }
        })
        .collect();
    Bundle::from_sources("en".parse().expect("literal tag is valid"), sources)
        .expect("embedded messages satisfy key parity")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn tag(s: &str) -> LanguageIdentifier {
        s.parse().expect("valid tag")
    }

    #[test]
    fn parses_a_flat_object() {
        let entries = parse_document(&tag("en"), r#"{"a": "A", "b": "B"}"#).unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries.get("a"), Some("A"));
    }

    #[test]
    fn rejects_empty_and_non_object_documents() {
        assert!(matches!(
            parse_document(&tag("en"), "{}"),
            Err(I18nError::EmptyTranslations { .. })
        ));
        assert!(matches!(
            parse_document(&tag("en"), "[1, 2]"),
            Err(I18nError::MalformedDocument { .. })
        ));
        assert!(matches!(
            parse_document(&tag("en"), "not json"),
            Err(I18nError::MalformedDocument { .. })
        ));
    }

    #[test]
    fn rejects_non_string_values() {
        let err = parse_document(&tag("en"), r#"{"a": 1}"#).unwrap_err();
        assert!(err.to_string().contains("not a string"));
    }

    #[test]
    fn loads_a_directory_in_filename_order() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"k": "en"}"#).unwrap();
        fs::write(dir.path().join("de.json"), r#"{"k": "de"}"#).unwrap();
        fs::write(dir.path().join("notes.txt"), "ignored").unwrap();

        let sources = load_dir(dir.path()).unwrap();
        let tags: Vec<String> = sources.iter().map(|s| s.language.to_string()).collect();
        assert_eq!(tags, vec!["de", "en"]);
    }

    #[test]
    fn aggregates_every_failing_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(dir.path().join("en.json"), r#"{"k": "ok"}"#).unwrap();
        fs::write(dir.path().join("b@d.json"), r#"{"k": "v"}"#).unwrap();
        fs::write(dir.path().join("de.json"), "not json").unwrap();

        let err = load_dir(dir.path()).unwrap_err();
        let I18nError::LoadFailed { files } = &err else {
            panic!("expected aggregated failure, got {err:?}");
        };
        assert_eq!(files.len(), 2, "both bad files reported: {files:?}");
    }

    #[test]
    fn missing_directory_is_an_io_error() {
        let err = load_dir(Path::new("/definitely/not/here")).unwrap_err();
        assert!(matches!(err, I18nError::Io { .. }));
    }

    #[test]
    fn builtin_bundle_has_three_languages_with_parity() {
        let bundle = builtin_bundle();
        let languages = bundle.languages();
        assert_eq!(languages[0], tag("en"));
        assert_eq!(languages.len(), 3);

        let reference = bundle.keys();
        for language in &languages {
            let set = bundle.translations(language).unwrap();
            let keys: Vec<String> = set.keys().map(str::to_string).collect();
            assert_eq!(keys, reference, "key parity for {language}");
        }
    }

    #[test]
    fn builtin_bundle_translates_the_range_separator() {
        let bundle = builtin_bundle();
        assert_eq!(bundle.translate_in(&tag("en"), "app.msg.range_to", &[]), "to");
        assert_eq!(bundle.translate_in(&tag("de"), "app.msg.range_to", &[]), "bis");
        assert_eq!(bundle.translate_in(&tag("fr"), "app.msg.range_to", &[]), "à");
    }
}
