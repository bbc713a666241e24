//! Internationalization (i18n) building blocks used by the manager.
//!
//! # Architecture
//!
//! - `catalog`: Catalog types and the last-source-wins merge
//! - `source`: `CatalogSource` trait and the built-in `inline` source
//! - `formatter`: `Formatter` trait and the built-in `simple` formatter
//! - `registry`: Name -> factory tables for sources and formatters
//! - `locale`: Locale inference and fallback resolution
//! - `negotiation`: Accept-Language parsing and locale negotiation
//! - `events`: Missing-translation events and sinks
//! - `facade`: Per-locale `I18n` facade
//!
//! # Example
//!
//! ```rust,ignore
//! use i18n_manager::{Config, I18nManager, LoaderConfig};
//!
//! let manager = Arc::new(I18nManager::new(
//!     Config::new("en").with_loader(LoaderConfig::new("inline")),
//! ));
//! manager.load_translations().await?;
//!
//! let locale = manager
//!     .get_supported_locale_for("fr-CA;q=0.9,en;q=0.5")
//!     .unwrap_or_else(|| manager.default_locale().to_string());
//! let text = manager.locale(locale).t("welcome", &FormatArgs::new())?;
//! ```

mod catalog;
mod events;
mod facade;
mod formatter;
mod locale;
mod negotiation;
mod registry;
mod source;

pub use catalog::{flatten_messages, merge_catalogs, Catalog, MergedCatalog, Messages};
pub use events::{MissingTranslation, MissingTranslationSink, TracingSink};
pub use facade::I18n;
pub use formatter::{
    formatter_factory, FormatArgs, Formatter, FormatterFactory, SimpleFormatter, SIMPLE_FORMATTER,
};
pub use locale::{fallback_locale_for, infer_locales};
pub use negotiation::{
    negotiate, parse_accept_language, preferred_locales, AcceptedLanguage, LanguagePreference,
};
pub use registry::{FormatterRegistry, LoaderRegistry, PluginRegistry};
pub use source::{loader_factory, CatalogSource, InlineSource, LoaderFactory, INLINE_LOADER};
