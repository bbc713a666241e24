//! Translation catalogs and the merge applied on every reload.

use indexmap::IndexMap;
use std::collections::HashMap;
use tracing::warn;

/// Translation key -> message template for a single locale.
pub type Messages = HashMap<String, String>;

/// Locale -> messages, in the order the source lists its locales. Sources
/// produce one, the manager merges them.
pub type Catalog = IndexMap<String, Messages>;

/// Result of merging the output of every enabled source.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MergedCatalog {
    pub translations: Catalog,

    /// Locales in the order they were first seen across sources
    pub discovered_locales: Vec<String>,
}

/// Merge catalogs in the given order. A key present in several catalogs
/// keeps the value from the last one.
pub fn merge_catalogs<I>(catalogs: I) -> MergedCatalog
where
    I: IntoIterator<Item = Catalog>,
{
    let mut merged = MergedCatalog::default();

    for catalog in catalogs {
        for (locale, messages) in catalog {
            if locale.is_empty() {
                warn!(
                    "Dropping {} messages registered under an empty locale",
                    messages.len()
                );
                continue;
            }

            if !merged.discovered_locales.contains(&locale) {
                merged.discovered_locales.push(locale.clone());
            }

            merged
                .translations
                .entry(locale)
                .or_default()
                .extend(messages);
        }
    }

    merged
}

/// Flatten a nested JSON object into dot-notation keys
/// (`{"app": {"title": "X"}}` becomes `app.title`).
pub fn flatten_messages(value: &serde_json::Value) -> anyhow::Result<Messages> {
    let mut messages = Messages::new();
    flatten_into(&mut messages, None, value)?;
    Ok(messages)
}

fn flatten_into(
    messages: &mut Messages,
    prefix: Option<&str>,
    value: &serde_json::Value,
) -> anyhow::Result<()> {
    match value {
        serde_json::Value::Object(map) => {
            for (key, child) in map {
                let path = match prefix {
                    Some(prefix) => format!("{}.{}", prefix, key),
                    None => key.clone(),
                };
                flatten_into(messages, Some(&path), child)?;
            }
            Ok(())
        }
        serde_json::Value::String(text) => match prefix {
            Some(key) => {
                messages.insert(key.to_string(), text.clone());
                Ok(())
            }
            None => anyhow::bail!("Expected an object of messages, found a string"),
        },
        other => anyhow::bail!(
            "Message '{}' must be a string, found {}",
            prefix.unwrap_or("<root>"),
            other
        ),
    }
}
