//! Missing-translation notifications.

use tracing::warn;

/// Emitted when an identifier has no message in the requested locale nor in
/// its fallback locale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingTranslation {
    pub identifier: String,
    pub locale: String,
    /// Whether a configured fallback message was used instead
    pub has_fallback: bool,
}

/// Receives missing-translation events.
pub trait MissingTranslationSink: Send + Sync {
    fn emit(&self, event: &MissingTranslation);
}

/// Default sink: logs every event as a warning.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl MissingTranslationSink for TracingSink {
    fn emit(&self, event: &MissingTranslation) {
        warn!(
            identifier = %event.identifier,
            locale = %event.locale,
            has_fallback = event.has_fallback,
            "Missing translation"
        );
    }
}

impl<F> MissingTranslationSink for F
where
    F: Fn(&MissingTranslation) + Send + Sync,
{
    fn emit(&self, event: &MissingTranslation) {
        self(event)
    }
}
