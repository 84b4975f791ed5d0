//! Locale-specific extractor registry
//!
//! Extractors are registered under `extract-trim-<locale>` keys, usually once
//! at startup, and looked up on every dispatch.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use crate::Extractor;

/// Prefix of every registry key, independent of the configured entity name
pub const REGISTRY_PREFIX: &str = "extract-trim";

/// Lookup of extractors by registry key
pub trait ExtractorRegistry: Send + Sync {
    fn get(&self, key: &str) -> Option<Arc<dyn Extractor>>;
}

/// Registry kept in process memory
#[derive(Default)]
pub struct InMemoryRegistry {
    extractors: RwLock<HashMap<String, Arc<dyn Extractor>>>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an extractor, returning the one it replaced
    pub fn register(
        &self,
        key: impl Into<String>,
        extractor: Arc<dyn Extractor>,
    ) -> Option<Arc<dyn Extractor>> {
        self.extractors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(key.into(), extractor)
    }

    /// Remove an extractor
    pub fn unregister(&self, key: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(key)
    }

    /// Registered keys, sorted
    pub fn keys(&self) -> Vec<String> {
        let mut keys: Vec<String> = self
            .extractors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .cloned()
            .collect();
        keys.sort();
        keys
    }

    pub fn len(&self) -> usize {
        self.extractors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ExtractorRegistry for InMemoryRegistry {
    fn get(&self, key: &str) -> Option<Arc<dyn Extractor>> {
        self.extractors
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .cloned()
    }
}

impl std::fmt::Debug for InMemoryRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryRegistry")
            .field("keys", &self.keys())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::TrimExtractor;

    #[test]
    fn test_register_and_get() {
        let registry = InMemoryRegistry::new();
        assert!(registry.is_empty());

        registry.register("extract-trim-es", Arc::new(TrimExtractor::new()));
        assert_eq!(registry.len(), 1);
        assert!(registry.get("extract-trim-es").is_some());
        assert!(registry.get("extract-trim-fr").is_none());
    }

    #[test]
    fn test_replace_and_unregister() {
        let registry = InMemoryRegistry::new();
        assert!(registry
            .register("k", Arc::new(TrimExtractor::new()))
            .is_none());
        assert!(registry
            .register("k", Arc::new(TrimExtractor::new()))
            .is_some());
        assert_eq!(registry.keys(), vec!["k".to_string()]);

        assert!(registry.unregister("k").is_some());
        assert!(registry.is_empty());
    }
}
