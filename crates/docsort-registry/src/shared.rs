//! Thread-safe registry handle

use crate::{CanonicalRegistry, RegistryStatistics, Resolution};
use docsort_domain::CanonicalEntry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

/// Cloneable handle serializing access to one [`CanonicalRegistry`]
///
/// Each resolution runs under a single lock, so two threads resolving
/// spellings of the same new company register it once.
#[derive(Debug, Clone)]
pub struct SharedRegistry {
    inner: Arc<Mutex<CanonicalRegistry>>,
}

impl SharedRegistry {
    /// Wrap a registry
    pub fn new(registry: CanonicalRegistry) -> Self {
        Self {
            inner: Arc::new(Mutex::new(registry)),
        }
    }

    /// See [`CanonicalRegistry::resolve`]
    pub fn resolve(&self, raw: &str) -> Resolution {
        self.lock().resolve(raw)
    }

    /// See [`CanonicalRegistry::record_file`]
    pub fn record_file(&self, folder_name: &str) -> bool {
        self.lock().record_file(folder_name)
    }

    /// See [`CanonicalRegistry::statistics`]
    pub fn statistics(&self) -> RegistryStatistics {
        self.lock().statistics()
    }

    /// Owned copies of all entries, ordered by canonical name
    pub fn entries(&self) -> Vec<CanonicalEntry> {
        self.lock().entries().into_iter().cloned().collect()
    }

    /// Run `f` with exclusive access
    pub fn with<R>(&self, f: impl FnOnce(&mut CanonicalRegistry) -> R) -> R {
        f(&mut self.lock())
    }

    // A panic mid-resolve leaves the map consistent: entries are only
    // inserted whole, so the poisoned guard is still usable.
    fn lock(&self) -> MutexGuard<'_, CanonicalRegistry> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl From<CanonicalRegistry> for SharedRegistry {
    fn from(registry: CanonicalRegistry) -> Self {
        Self::new(registry)
    }
}
