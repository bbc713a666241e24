//! Catalog sources: the pluggable strategies that produce translations.

use crate::config::{Config, LoaderConfig};
use crate::i18n::catalog::{flatten_messages, Catalog};
use anyhow::{bail, Context, Result};
use async_trait::async_trait;
use std::sync::Arc;

/// Registry name of the built-in [`InlineSource`].
pub const INLINE_LOADER: &str = "inline";

/// Produces translations for one or more locales.
///
/// Sources are created by a registered factory on every reload and awaited
/// concurrently with the other enabled sources.
#[async_trait]
pub trait CatalogSource: Send + Sync {
    async fn load(&self) -> Result<Catalog>;
}

/// Builds a source from the full configuration and the source's own entry.
pub type LoaderFactory = Arc<dyn Fn(Arc<Config>, &LoaderConfig) -> Box<dyn CatalogSource> + Send + Sync>;

/// Wrap a closure as a [`LoaderFactory`].
pub fn loader_factory<F, S>(factory: F) -> LoaderFactory
where
    F: Fn(Arc<Config>, &LoaderConfig) -> S + Send + Sync + 'static,
    S: CatalogSource + 'static,
{
    Arc::new(
        move |config: Arc<Config>, loader: &LoaderConfig| -> Box<dyn CatalogSource> {
            Box::new(factory(config, loader))
        },
    )
}

/// Source reading catalogs embedded in its loader options.
///
/// ```toml
/// [[loaders]]
/// name = "inline"
/// enabled = true
///
/// [loaders.translations.en]
/// welcome = "Hi"
/// app = { title = "Search" }   # becomes "app.title"
/// ```
#[derive(Debug, Clone)]
pub struct InlineSource {
    translations: Option<serde_json::Value>,
}

impl InlineSource {
    pub fn new(loader: &LoaderConfig) -> Self {
        Self {
            translations: loader.options.get("translations").cloned(),
        }
    }

    pub fn factory() -> LoaderFactory {
        loader_factory(|_config, loader| InlineSource::new(loader))
    }
}

#[async_trait]
impl CatalogSource for InlineSource {
    async fn load(&self) -> Result<Catalog> {
        let Some(translations) = &self.translations else {
            return Ok(Catalog::new());
        };

        let serde_json::Value::Object(locales) = translations else {
            bail!("Inline translations must be a table keyed by locale");
        };

        let mut catalog = Catalog::new();
        for (locale, messages) in locales {
            let messages = flatten_messages(messages)
                .with_context(|| format!("Invalid inline translations for '{}'", locale))?;
            catalog.insert(locale.clone(), messages);
        }
        Ok(catalog)
    }
}
