//! The translation manager: loads and merges catalogs, answers locale
//! questions and hands out per-locale [`I18n`] facades.

use crate::config::Config;
use crate::error::I18nError;
use crate::i18n::{
    fallback_locale_for, infer_locales, merge_catalogs, negotiate, Catalog, CatalogSource,
    Formatter, FormatterFactory, FormatterRegistry, I18n, LanguagePreference, LoaderFactory,
    LoaderRegistry, Messages, MissingTranslationSink, TracingSink,
};
use futures::future::try_join_all;
use std::sync::{Arc, Mutex, PoisonError, RwLock};
use tracing::{debug, info};

/// A plugin handed to [`I18nManager::extend`].
#[derive(Clone)]
pub enum Extension {
    Loader(LoaderFactory),
    Formatter(FormatterFactory),
}

/// Translations and inferred locales from the last successful reload.
#[derive(Debug, Default)]
struct Snapshot {
    translations: Arc<Catalog>,
    inferred_locales: Vec<String>,
}

/// Coordinates catalog sources, formatters and locale resolution.
///
/// Translations are exposed as immutable snapshots: a reload swaps the
/// manager's snapshot wholesale and never mutates one that was already
/// handed out. Reloads are serialized, so concurrent callers never observe a
/// partially merged store.
pub struct I18nManager {
    config: Arc<Config>,
    loaders: LoaderRegistry,
    formatters: FormatterRegistry,
    formatter: Mutex<Option<Arc<dyn Formatter>>>,
    /// `None` until the first successful load
    snapshot: RwLock<Option<Arc<Snapshot>>>,
    reload_lock: tokio::sync::Mutex<()>,
    sink: Arc<dyn MissingTranslationSink>,
}

impl I18nManager {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            loaders: LoaderRegistry::with_builtins(),
            formatters: FormatterRegistry::with_builtins(),
            formatter: Mutex::new(None),
            snapshot: RwLock::new(None),
            reload_lock: tokio::sync::Mutex::new(()),
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the sink that facades report missing translations to
    pub fn with_event_sink(mut self, sink: impl MissingTranslationSink + 'static) -> Self {
        self.sink = Arc::new(sink);
        self
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn default_locale(&self) -> &str {
        &self.config.default_locale
    }

    // ==================== Extension ====================

    /// Register a catalog source or formatter under `name`.
    pub fn extend(&self, name: impl Into<String>, extension: Extension) {
        match extension {
            Extension::Loader(factory) => self.loaders.register(name, factory),
            Extension::Formatter(factory) => self.formatters.register(name, factory),
        }
    }

    pub fn register_loader(&self, name: impl Into<String>, factory: LoaderFactory) {
        self.loaders.register(name, factory);
    }

    pub fn register_formatter(&self, name: impl Into<String>, factory: FormatterFactory) {
        self.formatters.register(name, factory);
    }

    // ==================== Loading ====================

    pub fn has_cached_translations(&self) -> bool {
        self.current().is_some()
    }

    /// Load translations unless they were loaded already.
    ///
    /// A caller arriving while another load is in flight waits for it and
    /// then returns without loading again.
    pub async fn load_translations(&self) -> Result<(), I18nError> {
        let _guard = self.reload_lock.lock().await;
        if self.has_cached_translations() {
            debug!("Translations already cached, skipping load");
            return Ok(());
        }
        self.reload_locked().await
    }

    /// Run every enabled source again and replace the translations.
    ///
    /// On failure the previous translations stay in place.
    pub async fn reload_translations(&self) -> Result<(), I18nError> {
        let _guard = self.reload_lock.lock().await;
        self.reload_locked().await
    }

    async fn reload_locked(&self) -> Result<(), I18nError> {
        let sources = self.resolve_sources()?;
        info!("Loading translations from {} sources", sources.len());

        let catalogs = try_join_all(sources.iter().map(|(name, source)| async move {
            source
                .load()
                .await
                .map_err(|source| I18nError::LoadFailed {
                    loader: name.clone(),
                    source: source.into(),
                })
        }))
        .await?;

        let merged = merge_catalogs(catalogs);
        let inferred_locales = infer_locales(&self.config, &merged.discovered_locales);

        info!(
            "Loaded translations for {} locales",
            merged.translations.len()
        );

        let snapshot = Snapshot {
            translations: Arc::new(merged.translations),
            inferred_locales,
        };
        *self
            .snapshot
            .write()
            .unwrap_or_else(PoisonError::into_inner) = Some(Arc::new(snapshot));

        Ok(())
    }

    /// Instantiate every enabled source, in declaration order. Fails before
    /// anything runs if a name has no registered factory.
    fn resolve_sources(&self) -> Result<Vec<(String, Box<dyn CatalogSource>)>, I18nError> {
        self.config
            .loaders
            .iter()
            .filter(|loader| loader.enabled)
            .map(|loader| -> Result<(String, Box<dyn CatalogSource>), I18nError> {
                let factory = self
                    .loaders
                    .get(&loader.name)
                    .ok_or_else(|| I18nError::UnknownLoader(loader.name.clone()))?;
                debug!("Resolved loader '{}'", loader.name);
                Ok((loader.name.clone(), factory(self.config.clone(), loader)))
            })
            .collect()
    }

    fn current(&self) -> Option<Arc<Snapshot>> {
        self.snapshot
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    // ==================== Queries ====================

    /// All translations, as an immutable snapshot. Empty before the first
    /// load.
    pub fn get_translations(&self) -> Arc<Catalog> {
        self.current()
            .map(|snapshot| snapshot.translations.clone())
            .unwrap_or_default()
    }

    /// Copy of the messages for `locale`, empty if the locale is unknown
    pub fn get_translations_for(&self, locale: &str) -> Messages {
        self.get_translations()
            .get(locale)
            .cloned()
            .unwrap_or_default()
    }

    /// The configured locales, or the inferred ones when none are configured.
    /// Inferred locales are empty until the first load.
    pub fn supported_locales(&self) -> Vec<String> {
        if let Some(locales) = &self.config.supported_locales {
            return locales.clone();
        }
        self.current()
            .map(|snapshot| snapshot.inferred_locales.clone())
            .unwrap_or_default()
    }

    /// Best supported locale for a language preference
    pub fn get_supported_locale_for<'p>(
        &self,
        preference: impl Into<LanguagePreference<'p>>,
    ) -> Option<String> {
        negotiate(preference, &self.supported_locales())
    }

    pub fn get_fallback_locale_for(&self, locale: &str) -> &str {
        fallback_locale_for(&self.config, locale)
    }

    /// Message from the configured fallback callback, if any
    pub fn get_fallback_message(&self, identifier: &str, locale: &str) -> Option<String> {
        self.config
            .fallback
            .as_ref()
            .and_then(|fallback| fallback.call(identifier, locale))
    }

    /// The formatter selected by `translations_format`, created on first use.
    pub fn get_formatter(&self) -> Result<Arc<dyn Formatter>, I18nError> {
        let mut cached = self
            .formatter
            .lock()
            .unwrap_or_else(PoisonError::into_inner);

        if let Some(formatter) = cached.as_ref() {
            return Ok(formatter.clone());
        }

        let name = &self.config.translations_format;
        let factory = self
            .formatters
            .get(name)
            .ok_or_else(|| I18nError::UnknownFormatter(name.clone()))?;
        debug!("Creating formatter '{}'", name);

        let formatter = factory(self.config.clone());
        *cached = Some(formatter.clone());
        Ok(formatter)
    }

    // ==================== Sessions ====================

    /// Facade rendering messages for `locale`.
    pub fn locale(self: &Arc<Self>, locale: impl Into<String>) -> I18n {
        I18n::new(locale.into(), Arc::clone(self), self.sink.clone())
    }
}
