#![forbid(unsafe_code)]

//! End-to-end showcase: build a layered provider, adopt a language, and
//! render translated, locale-formatted output.
//!
//! Pass a locale as the first argument (`lingo-demo de-CH`) or let the
//! environment decide (`LC_ALL`, `LC_MESSAGES`, `LANG`).

use std::sync::Arc;

use chrono::Local;
use lingo_i18n::{
    Bundle, FormatArg, LayeredMessageProvider, TranslatableError, builtin_bundle, msg_args,
    set_default_provider,
};
use lingo_locale::{EnvLocaleDetector, LocaleDetector, SystemEnv, normalize_locale_tag};
use tracing_subscriber::EnvFilter;

fn demo_bundle() -> Bundle {
    let entries = |greeting: &str, stats: &str| {
        vec![
            ("demo.greeting".to_string(), greeting.to_string()),
            ("demo.stats".to_string(), stats.to_string()),
        ]
    };
    let bundle = Bundle::from_translations(
        "en".parse().expect("literal tag is valid"),
        entries("Hello from %s!", "listening on port %d, %s requests served"),
    )
    .expect("demo messages are well-formed");
    bundle
        .add_language(
            "de".parse().expect("literal tag is valid"),
            entries("Hallo von %s!", "lauscht auf Port %d, %s Anfragen bedient"),
        )
        .expect("demo messages satisfy key parity");
    bundle
        .add_language(
            "fr".parse().expect("literal tag is valid"),
            entries("Bonjour de %s !", "écoute sur le port %d, %s requêtes servies"),
        )
        .expect("demo messages satisfy key parity");
    bundle
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let requested = std::env::args()
        .nth(1)
        .and_then(|raw| normalize_locale_tag(&raw))
        .or_else(|| EnvLocaleDetector::new(SystemEnv).detect())
        .unwrap_or_else(|| "en".parse().expect("literal tag is valid"));

    let provider = Arc::new(
        LayeredMessageProvider::new()
            .with_system_bundle(Arc::new(demo_bundle()))
            .with_default_bundle(Arc::new(builtin_bundle())),
    );
    provider.set_default_language(requested);
    set_default_provider(provider.clone());

    println!("language: {}", provider.current_language());
    println!("{}", provider.translate("demo.greeting", &msg_args!["Lingo"]));
    println!(
        "{}",
        provider.translate("demo.stats", &msg_args![8080, 1_234_567])
    );

    let formatter = provider.formatter();
    println!("percent: {}", formatter.format_percent(0.755, 1));
    println!("ordinal: {}", formatter.format_ordinal(21));
    println!("today:   {}", formatter.format_date(Local::now().date_naive()));
    println!(
        "range:   {}",
        provider.format_range(&FormatArg::Int(1_000), &FormatArg::Int(10_000))
    );

    let err = TranslatableError::new("app.err.invalid_value")
        .with_args(msg_args!["8o8o", "--port"]);
    println!("error:   {err}");
}
