use anyhow::{bail, Context, Result};
use serde::de::{MapAccess, Visitor};
use serde::{Deserialize, Deserializer};
use std::fmt;
use std::path::Path;
use std::sync::Arc;

/// Name of the formatter used when `translations_format` is not set.
pub const DEFAULT_TRANSLATIONS_FORMAT: &str = "simple";

/// Static configuration read once by the manager.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// Locale used when nothing better is known
    pub default_locale: String,

    /// Explicit list of supported locales; inferred from the catalogs when absent
    #[serde(default)]
    pub supported_locales: Option<Vec<String>>,

    /// Locale -> locale substitutions, kept in declaration order
    #[serde(default)]
    pub fallback_locales: Option<FallbackLocales>,

    /// Catalog sources, merged in declaration order
    #[serde(default)]
    pub loaders: Vec<LoaderConfig>,

    /// Name of the formatter to render messages with
    #[serde(default = "default_translations_format")]
    pub translations_format: String,

    /// Message used when an identifier is missing in every candidate locale
    #[serde(skip)]
    pub fallback: Option<FallbackMessage>,
}

fn default_translations_format() -> String {
    DEFAULT_TRANSLATIONS_FORMAT.to_string()
}

impl Config {
    /// Create a configuration with only a default locale set
    pub fn new(default_locale: impl Into<String>) -> Self {
        Self {
            default_locale: default_locale.into(),
            supported_locales: None,
            fallback_locales: None,
            loaders: Vec::new(),
            translations_format: default_translations_format(),
            fallback: None,
        }
    }

    /// Set the explicit list of supported locales
    pub fn with_supported_locales<I, S>(mut self, locales: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.supported_locales = Some(locales.into_iter().map(Into::into).collect());
        self
    }

    /// Add a fallback mapping, e.g. `fr-CA` -> `fr`
    pub fn with_fallback_locale(
        mut self,
        locale: impl Into<String>,
        fallback: impl Into<String>,
    ) -> Self {
        self.fallback_locales
            .get_or_insert_with(FallbackLocales::default)
            .insert(locale, fallback);
        self
    }

    /// Append a loader entry, replacing an existing entry with the same name
    pub fn with_loader(mut self, loader: LoaderConfig) -> Self {
        match self.loaders.iter_mut().find(|entry| entry.name == loader.name) {
            Some(entry) => *entry = loader,
            None => self.loaders.push(loader),
        }
        self
    }

    /// Set the formatter name
    pub fn with_translations_format(mut self, format: impl Into<String>) -> Self {
        self.translations_format = format.into();
        self
    }

    /// Set the fallback message callback
    pub fn with_fallback<F>(mut self, fallback: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        self.fallback = Some(FallbackMessage::new(fallback));
        self
    }

    /// Look up a loader entry by name
    pub fn loader(&self, name: &str) -> Option<&LoaderConfig> {
        self.loaders.iter().find(|loader| loader.name == name)
    }

    /// Read configuration from `I18N_*` environment variables.
    ///
    /// Loaders listed in `I18N_LOADERS` are enabled without options.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::new(
            std::env::var("I18N_DEFAULT_LOCALE").unwrap_or_else(|_| "en".to_string()),
        );

        if let Ok(value) = std::env::var("I18N_SUPPORTED_LOCALES") {
            let locales = split_list(&value);
            if !locales.is_empty() {
                config.supported_locales = Some(locales);
            }
        }

        if let Ok(value) = std::env::var("I18N_FALLBACK_LOCALES") {
            config.fallback_locales = Some(
                parse_fallback_pairs(&value).context("Invalid I18N_FALLBACK_LOCALES")?,
            );
        }

        if let Ok(value) = std::env::var("I18N_LOADERS") {
            config.loaders = split_list(&value)
                .into_iter()
                .map(LoaderConfig::new)
                .collect();
        }

        if let Ok(value) = std::env::var("I18N_TRANSLATIONS_FORMAT") {
            config.translations_format = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML document
    pub fn from_toml_str(source: &str) -> Result<Self> {
        let config: Self = toml::from_str(source).context("Failed to parse i18n configuration")?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read i18n configuration {}", path.display()))?;
        Self::from_toml_str(&source)
    }

    fn validate(&self) -> Result<()> {
        if self.default_locale.trim().is_empty() {
            bail!("default_locale must not be empty");
        }
        if self.translations_format.trim().is_empty() {
            bail!("translations_format must not be empty");
        }
        for (index, loader) in self.loaders.iter().enumerate() {
            if self.loaders[..index].iter().any(|earlier| earlier.name == loader.name) {
                bail!("Loader '{}' is configured more than once", loader.name);
            }
        }
        Ok(())
    }
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|item| !item.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_fallback_pairs(value: &str) -> Result<FallbackLocales> {
    let mut fallbacks = FallbackLocales::default();
    for pair in split_list(value) {
        let (locale, fallback) = pair
            .split_once('=')
            .with_context(|| format!("Expected locale=fallback, got '{}'", pair))?;
        let (locale, fallback) = (locale.trim(), fallback.trim());
        if locale.is_empty() || fallback.is_empty() {
            bail!("Empty locale in fallback pair '{}'", pair);
        }
        fallbacks.insert(locale, fallback);
    }
    Ok(fallbacks)
}

/// One catalog source entry.
#[derive(Debug, Clone, Deserialize)]
pub struct LoaderConfig {
    /// Registry name of the source
    pub name: String,

    /// Disabled sources are skipped entirely
    #[serde(default)]
    pub enabled: bool,

    /// Source-specific options
    #[serde(flatten)]
    pub options: serde_json::Map<String, serde_json::Value>,
}

impl LoaderConfig {
    /// Create an enabled loader entry without options
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            enabled: true,
            options: serde_json::Map::new(),
        }
    }

    /// Set the enabled flag
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        self
    }

    /// Set a source-specific option
    pub fn with_option(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.options.insert(key.into(), value);
        self
    }
}

/// Ordered locale -> fallback locale map.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FallbackLocales {
    entries: Vec<(String, String)>,
}

impl FallbackLocales {
    /// Insert or replace a mapping; replacing keeps the original position
    pub fn insert(&mut self, locale: impl Into<String>, fallback: impl Into<String>) {
        let locale = locale.into();
        let fallback = fallback.into();
        match self.entries.iter_mut().find(|(key, _)| *key == locale) {
            Some(entry) => entry.1 = fallback,
            None => self.entries.push((locale, fallback)),
        }
    }

    pub fn get(&self, locale: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(key, _)| key == locale)
            .map(|(_, fallback)| fallback.as_str())
    }

    /// Locales that have a fallback, in declaration order
    pub fn locales(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(key, _)| key.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for FallbackLocales {
    fn from_iter<T: IntoIterator<Item = (K, V)>>(iter: T) -> Self {
        let mut fallbacks = Self::default();
        for (locale, fallback) in iter {
            fallbacks.insert(locale, fallback);
        }
        fallbacks
    }
}

impl<'de> Deserialize<'de> for FallbackLocales {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct FallbackVisitor;

        impl<'de> Visitor<'de> for FallbackVisitor {
            type Value = FallbackLocales;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of locale to fallback locale")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut fallbacks = FallbackLocales::default();
                while let Some((locale, fallback)) = map.next_entry::<String, String>()? {
                    fallbacks.insert(locale, fallback);
                }
                Ok(fallbacks)
            }
        }

        deserializer.deserialize_map(FallbackVisitor)
    }
}

/// Callback producing a message for an identifier missing in every locale.
#[derive(Clone)]
pub struct FallbackMessage(Arc<dyn Fn(&str, &str) -> Option<String> + Send + Sync>);

impl FallbackMessage {
    pub fn new<F>(fallback: F) -> Self
    where
        F: Fn(&str, &str) -> Option<String> + Send + Sync + 'static,
    {
        Self(Arc::new(fallback))
    }

    pub fn call(&self, identifier: &str, locale: &str) -> Option<String> {
        (self.0)(identifier, locale)
    }
}

impl fmt::Debug for FallbackMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("FallbackMessage(..)")
    }
}
