//! Plugin registries: name -> factory tables for catalog sources and
//! formatters.
//!
//! Both registries are populated with their built-in entry when the manager
//! is created and extended by callers afterwards. Entries are never removed;
//! registering a name twice replaces the earlier factory.

use crate::i18n::formatter::{FormatterFactory, SimpleFormatter, SIMPLE_FORMATTER};
use crate::i18n::source::{InlineSource, LoaderFactory, INLINE_LOADER};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};
use tracing::debug;

/// A thread-safe table of named factories.
///
/// Lookups clone the factory out of the table, so resolution never holds the
/// lock while a plugin runs.
pub struct PluginRegistry<F> {
    /// What the registry holds, used in log messages ("loader", "formatter")
    kind: &'static str,
    factories: RwLock<HashMap<String, F>>,
}

/// Registry of catalog source factories.
pub type LoaderRegistry = PluginRegistry<LoaderFactory>;

/// Registry of formatter factories.
pub type FormatterRegistry = PluginRegistry<FormatterFactory>;

impl<F: Clone> PluginRegistry<F> {
    /// Create an empty registry.
    ///
    /// # Arguments
    /// * `kind` - Label used when logging registrations
    pub fn new(kind: &'static str) -> Self {
        Self {
            kind,
            factories: RwLock::new(HashMap::new()),
        }
    }

    /// Register a factory under `name`.
    ///
    /// # Arguments
    /// * `name` - The name configuration refers to
    /// * `factory` - The factory; replaces any factory already registered
    ///   under the same name
    pub fn register(&self, name: impl Into<String>, factory: F) {
        let name = name.into();
        let mut factories = self
            .factories
            .write()
            .unwrap_or_else(PoisonError::into_inner);

        if factories.insert(name.clone(), factory).is_some() {
            debug!("Replaced {} '{}'", self.kind, name);
        } else {
            debug!("Registered {} '{}'", self.kind, name);
        }
    }

    /// Get the factory registered under `name`.
    ///
    /// # Returns
    /// * `Some(factory)` if a factory is registered
    /// * `None` otherwise
    pub fn get(&self, name: &str) -> Option<F> {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    /// Check if a factory is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(name)
    }

    /// Get all registered names, sorted.
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self
            .factories
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        names.sort();
        names
    }
}

impl LoaderRegistry {
    /// Registry holding the built-in `inline` source.
    pub fn with_builtins() -> Self {
        let registry = Self::new("loader");
        registry.register(INLINE_LOADER, InlineSource::factory());
        registry
    }
}

impl FormatterRegistry {
    /// Registry holding the built-in `simple` formatter.
    pub fn with_builtins() -> Self {
        let registry = Self::new("formatter");
        registry.register(SIMPLE_FORMATTER, SimpleFormatter::factory());
        registry
    }
}
