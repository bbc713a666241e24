//! Per-locale facade handed out by [`I18nManager::locale`].

use crate::error::I18nError;
use crate::i18n::{FormatArgs, MissingTranslation, MissingTranslationSink};
use crate::manager::I18nManager;
use std::sync::Arc;

/// Renders messages for one locale.
///
/// Lookup tries the locale first, then its fallback locale. When both miss,
/// a [`MissingTranslation`] event is emitted and the configured fallback
/// message (or a `translation missing` placeholder) is rendered instead.
#[derive(Clone)]
pub struct I18n {
    locale: String,
    fallback_locale: String,
    manager: Arc<I18nManager>,
    sink: Arc<dyn MissingTranslationSink>,
}

impl std::fmt::Debug for I18n {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("I18n")
            .field("locale", &self.locale)
            .field("fallback_locale", &self.fallback_locale)
            .finish_non_exhaustive()
    }
}

impl I18n {
    pub(crate) fn new(
        locale: String,
        manager: Arc<I18nManager>,
        sink: Arc<dyn MissingTranslationSink>,
    ) -> Self {
        let fallback_locale = manager.get_fallback_locale_for(&locale).to_string();
        Self {
            locale,
            fallback_locale,
            manager,
            sink,
        }
    }

    pub fn locale(&self) -> &str {
        &self.locale
    }

    /// Locale consulted when a message is missing in [`locale`](Self::locale)
    pub fn fallback_locale(&self) -> &str {
        &self.fallback_locale
    }

    /// Change the locale, recomputing its fallback
    pub fn switch_locale(&mut self, locale: impl Into<String>) {
        self.locale = locale.into();
        self.fallback_locale = self
            .manager
            .get_fallback_locale_for(&self.locale)
            .to_string();
    }

    /// Whether `identifier` exists in the current locale
    pub fn has_message(&self, identifier: &str) -> bool {
        self.manager
            .get_translations()
            .get(&self.locale)
            .is_some_and(|messages| messages.contains_key(identifier))
    }

    /// Whether `identifier` exists in the fallback locale
    pub fn has_fallback_message(&self, identifier: &str) -> bool {
        self.manager
            .get_translations()
            .get(&self.fallback_locale)
            .is_some_and(|messages| messages.contains_key(identifier))
    }

    /// Render `identifier` with `args`.
    pub fn format_message(&self, identifier: &str, args: &FormatArgs) -> Result<String, I18nError> {
        let (template, locale) = match self.lookup(identifier) {
            Some(found) => found,
            None => {
                let fallback = self.manager.get_fallback_message(identifier, &self.locale);
                self.sink.emit(&MissingTranslation {
                    identifier: identifier.to_string(),
                    locale: self.locale.clone(),
                    has_fallback: fallback.is_some(),
                });
                let template = fallback.unwrap_or_else(|| {
                    format!("translation missing: {}, {}", self.locale, identifier)
                });
                (template, self.locale.clone())
            }
        };

        let formatter = self.manager.get_formatter()?;
        formatter
            .format(&template, &locale, args)
            .map_err(|source| I18nError::Format {
                identifier: identifier.to_string(),
                locale,
                source: source.into(),
            })
    }

    /// Shorthand for [`format_message`](Self::format_message)
    pub fn t(&self, identifier: &str, args: &FormatArgs) -> Result<String, I18nError> {
        self.format_message(identifier, args)
    }

    /// Template and the locale it was found in
    fn lookup(&self, identifier: &str) -> Option<(String, String)> {
        let translations = self.manager.get_translations();

        [&self.locale, &self.fallback_locale]
            .into_iter()
            .find_map(|locale| {
                translations
                    .get(locale)
                    .and_then(|messages| messages.get(identifier))
                    .map(|template| (template.clone(), locale.clone()))
            })
    }
}
