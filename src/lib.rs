//! Translation manager: merges catalogs from pluggable sources, negotiates
//! locales and resolves fallbacks.

pub mod config;
pub mod error;
pub mod i18n;
pub mod manager;

pub use config::{Config, FallbackLocales, FallbackMessage, LoaderConfig};
pub use error::I18nError;
pub use i18n::{
    CatalogSource, FormatArgs, Formatter, I18n, LanguagePreference, MissingTranslation,
    MissingTranslationSink,
};
pub use manager::{Extension, I18nManager};
