//! In-memory catalog store for testing.

use std::sync::{Arc, Mutex, MutexGuard};

use crate::catalog::{Catalog, CatalogError, CatalogStore};

#[derive(Debug, Default)]
struct StoreState {
    current: Option<Catalog>,
    snapshots: Vec<Catalog>,
    fail_saves_after: Option<usize>,
}

/// Catalog store that keeps every saved snapshot in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryCatalogStore {
    state: Arc<Mutex<StoreState>>,
}

impl MemoryCatalogStore {
    /// Store holding `catalog` as its persisted content.
    pub fn with_catalog(catalog: Catalog) -> Self {
        let store = Self::default();
        store.lock().current = Some(catalog);
        store
    }

    /// Let `count` saves succeed, then fail every later one.
    pub fn fail_saves_after(&self, count: usize) {
        self.lock().fail_saves_after = Some(count);
    }

    /// The last persisted catalog.
    pub fn current(&self) -> Option<Catalog> {
        self.lock().current.clone()
    }

    /// Every successfully saved catalog, oldest first.
    pub fn snapshots(&self) -> Vec<Catalog> {
        self.lock().snapshots.clone()
    }

    pub fn save_count(&self) -> usize {
        self.lock().snapshots.len()
    }

    fn lock(&self) -> MutexGuard<'_, StoreState> {
        self.state.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl CatalogStore for MemoryCatalogStore {
    fn load(&self) -> Result<Catalog, CatalogError> {
        self.lock().current.clone().ok_or_else(|| CatalogError::Read {
            path: self.location(),
            message: "nothing stored".to_string(),
        })
    }

    fn save(&self, catalog: &Catalog) -> Result<(), CatalogError> {
        let mut state = self.lock();
        if state
            .fail_saves_after
            .is_some_and(|limit| state.snapshots.len() >= limit)
        {
            return Err(CatalogError::Write {
                path: "memory://catalog".to_string(),
                message: "simulated write failure".to_string(),
            });
        }
        state.current = Some(catalog.clone());
        state.snapshots.push(catalog.clone());
        Ok(())
    }

    fn location(&self) -> String {
        "memory://catalog".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_empty_store_fails() {
        let store = MemoryCatalogStore::default();
        assert!(matches!(store.load(), Err(CatalogError::Read { .. })));
    }

    #[test]
    fn test_save_records_snapshots() {
        let catalog = Catalog::new(vec!["title".to_string()]).unwrap();
        let store = MemoryCatalogStore::with_catalog(catalog.clone());

        store.save(&catalog).unwrap();
        store.save(&catalog).unwrap();
        assert_eq!(store.save_count(), 2);
        assert_eq!(store.load().unwrap(), catalog);
    }

    #[test]
    fn test_save_failure_injection() {
        let catalog = Catalog::new(vec!["title".to_string()]).unwrap();
        let store = MemoryCatalogStore::with_catalog(catalog.clone());
        store.fail_saves_after(1);

        assert!(store.save(&catalog).is_ok());
        assert!(matches!(
            store.save(&catalog),
            Err(CatalogError::Write { .. })
        ));
        assert_eq!(store.save_count(), 1);
    }
}
