//! Error types surfaced by the translation manager.

use thiserror::Error;

/// Boxed error produced by a catalog source or formatter.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by [`I18nManager`](crate::manager::I18nManager) and the
/// per-locale [`I18n`](crate::i18n::I18n) facade.
#[derive(Debug, Error)]
pub enum I18nError {
    /// An enabled loader has no registered factory.
    #[error("unknown translations loader \"{0}\"; register it with extend() before loading")]
    UnknownLoader(String),

    /// `translations_format` names a formatter that was never registered.
    #[error("unknown translations formatter \"{0}\"; register it with extend() before use")]
    UnknownFormatter(String),

    /// A catalog source failed; the previous translations are kept.
    #[error("translations loader \"{loader}\" failed")]
    LoadFailed {
        loader: String,
        #[source]
        source: BoxError,
    },

    /// The formatter could not render a message.
    #[error("failed to format \"{identifier}\" for locale \"{locale}\"")]
    Format {
        identifier: String,
        locale: String,
        #[source]
        source: BoxError,
    },
}

impl I18nError {
    /// Whether this error comes from configuration rather than from a
    /// source or formatter at runtime.
    pub fn is_configuration(&self) -> bool {
        matches!(self, Self::UnknownLoader(_) | Self::UnknownFormatter(_))
    }
}
