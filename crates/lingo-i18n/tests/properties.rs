//! Property tests for the store invariants: key-set parity with full
//! rollback, and lookup totality.

use std::collections::BTreeSet;

use lingo_i18n::{Bundle, LanguageIdentifier, msg_args};
use proptest::prelude::*;

fn tag(s: &str) -> LanguageIdentifier {
    s.parse().expect("valid tag")
}

fn entries_for(keys: &BTreeSet<String>, suffix: &str) -> Vec<(String, String)> {
    keys.iter()
        .map(|key| (key.clone(), format!("{key} {suffix}")))
        .collect()
}

fn key_strategy() -> impl Strategy<Value = String> {
    "[a-z]{1,8}(\\.[a-z]{1,8})?"
}

proptest! {
    // Key-set parity: a divergent language is rejected and the bundle's
    // observable state is exactly what it was before the call.
    #[test]
    fn parity_violations_roll_back_completely(
        keys in prop::collection::btree_set(key_strategy(), 1..12),
        removed_index in any::<prop::sample::Index>(),
        extra_key in key_strategy(),
    ) {
        let bundle = Bundle::from_translations(tag("en"), entries_for(&keys, "en")).unwrap();
        bundle.add_language(tag("fr"), entries_for(&keys, "fr")).unwrap();

        // Mutate the key set: drop one key and add a fresh one.
        let mut mutated: BTreeSet<String> = keys.clone();
        let removed = removed_index.get(&keys.iter().cloned().collect::<Vec<_>>()).clone();
        mutated.remove(&removed);
        let genuinely_new = !keys.contains(&extra_key);
        mutated.insert(extra_key.clone());

        let languages_before = bundle.languages();
        let reference_before = bundle.keys();
        let result = bundle.add_language(tag("de"), entries_for(&mutated, "de"));

        if mutated == keys {
            // The mutation happened to reproduce the same set; the add
            // must succeed.
            prop_assert!(result.is_ok());
        } else {
            prop_assert!(result.is_err());
            prop_assert!(!bundle.has_language(&tag("de")));
            prop_assert_eq!(bundle.languages(), languages_before);
            prop_assert_eq!(bundle.keys(), reference_before);
            if genuinely_new {
                prop_assert!(!bundle.has_key(&tag("de"), &extra_key));
            }
        }
    }

    // Lookup totality: every (language, key) pair yields a non-empty
    // string — a translation, a fallback, or the key itself.
    #[test]
    fn lookup_is_total(
        lang in prop::sample::select(vec!["en", "fr", "de-CH", "ja", "pt-BR"]),
        key in "[a-zA-Z._-]{1,24}",
    ) {
        let bundle = Bundle::from_translations(
            tag("en"),
            vec![("known".to_string(), "a value".to_string())],
        ).unwrap();
        let out = bundle.translate_in(&tag(lang), &key, &[]);
        prop_assert!(!out.is_empty());
    }

    // Raw decimal verbs substitute exactly the value's own digits, for
    // any integer, in any of the configured locales.
    #[test]
    fn raw_decimal_is_locale_independent(
        n in any::<i64>(),
        lang in prop::sample::select(vec!["en", "fr", "de", "de-CH", "es"]),
    ) {
        let bundle = Bundle::from_translations(
            tag("en"),
            vec![("num".to_string(), "%d".to_string())],
        ).unwrap();
        let out = bundle.translate_in(&tag(lang), "num", &msg_args![n]);
        prop_assert_eq!(out, n.to_string());
    }
}
