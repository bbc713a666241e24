//! Locale inference and fallback resolution.
//!
//! Both are pure functions over the configuration (and, for inference, the
//! locales discovered by the last reload).

use crate::config::Config;

/// Compute the supported locales when none are configured explicitly.
///
/// The list starts with the default locale, followed by the locales that
/// declare a fallback and then every discovered locale. Each locale appears
/// once, at its first position.
pub fn infer_locales(config: &Config, discovered: &[String]) -> Vec<String> {
    let mut locales: Vec<String> = vec![config.default_locale.clone()];

    let fallback_keys = config
        .fallback_locales
        .iter()
        .flat_map(|fallbacks| fallbacks.locales());

    for locale in fallback_keys.chain(discovered.iter().map(String::as_str)) {
        if !locales.iter().any(|known| known == locale) {
            locales.push(locale.to_string());
        }
    }

    locales
}

/// Locale to use instead of `locale`. Always resolves to something: the
/// configured fallback if there is one, the default locale otherwise.
pub fn fallback_locale_for<'a>(config: &'a Config, locale: &str) -> &'a str {
    config
        .fallback_locales
        .as_ref()
        .and_then(|fallbacks| fallbacks.get(locale))
        .unwrap_or(config.default_locale.as_str())
}
