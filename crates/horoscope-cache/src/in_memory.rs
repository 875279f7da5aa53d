use std::collections::HashMap;

use async_trait::async_trait;
use horoscope_core::{CacheKey, HoroscopeCache, HoroscopeError};
use tokio::sync::RwLock;

/// In-memory horoscope cache.
///
/// Entries never expire and the map is unbounded; it lives as long as the
/// value that owns it.
pub struct InMemoryHoroscopeCache {
    store: RwLock<HashMap<CacheKey, String>>,
}

impl InMemoryHoroscopeCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    pub async fn len(&self) -> usize {
        self.store.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.store.read().await.is_empty()
    }
}

impl Default for InMemoryHoroscopeCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HoroscopeCache for InMemoryHoroscopeCache {
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, HoroscopeError> {
        let store = self.store.read().await;
        Ok(store.get(key).cloned())
    }

    async fn put(&self, key: &CacheKey, horoscope: &str) -> Result<(), HoroscopeError> {
        let mut store = self.store.write().await;
        store.insert(key.clone(), horoscope.to_string());
        Ok(())
    }

    async fn clear(&self) -> Result<(), HoroscopeError> {
        let mut store = self.store.write().await;
        store.clear();
        Ok(())
    }
}
