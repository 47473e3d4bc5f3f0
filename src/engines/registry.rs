//! Engine registry: the ordered set of enabled engines.
//!
//! Built once at startup and shared read-only between requests.

use crate::engines::TranslationEngine;
use crate::error::ConfigError;
use std::sync::Arc;

/// Non-empty, ordered collection of engines.
#[derive(Clone)]
pub struct EngineRegistry {
    engines: Vec<Arc<dyn TranslationEngine>>,
}

impl EngineRegistry {
    /// Create a registry.
    ///
    /// # Errors
    /// `ConfigError::NoEnginesEnabled` when `engines` is empty; the process
    /// must not start serving in that case.
    pub fn new(engines: Vec<Arc<dyn TranslationEngine>>) -> Result<Self, ConfigError> {
        if engines.is_empty() {
            return Err(ConfigError::NoEnginesEnabled);
        }
        Ok(Self { engines })
    }

    /// Look up an engine by name.
    ///
    /// Unknown names fall back to the first registered engine instead of
    /// failing, so every path with an engine segment renders something. A
    /// stricter deployment may prefer a not-found here; see [`Self::find`].
    pub fn get(&self, name: &str) -> &dyn TranslationEngine {
        self.find(name).unwrap_or_else(|| self.default_engine())
    }

    /// Exact lookup without fallback.
    pub fn find(&self, name: &str) -> Option<&dyn TranslationEngine> {
        self.engines
            .iter()
            .find(|engine| engine.name() == name)
            .map(|engine| engine.as_ref())
    }

    /// The first registered engine.
    pub fn default_engine(&self) -> &dyn TranslationEngine {
        // non-empty by construction
        self.engines[0].as_ref()
    }

    pub fn iter(&self) -> impl Iterator<Item = &dyn TranslationEngine> {
        self.engines.iter().map(|engine| engine.as_ref())
    }

    pub fn names(&self) -> Vec<&str> {
        self.iter().map(|engine| engine.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.engines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.engines.is_empty()
    }
}

impl std::fmt::Debug for EngineRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineRegistry")
            .field("engines", &self.names())
            .finish()
    }
}
