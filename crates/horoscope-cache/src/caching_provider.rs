use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use async_trait::async_trait;
use horoscope_core::{CacheKey, HoroscopeCache, HoroscopeError, HoroscopeProvider};

type Gate = Arc<tokio::sync::Mutex<()>>;
type GateTable = Mutex<HashMap<CacheKey, Gate>>;

/// Serves horoscopes from a cache, falling back to the wrapped provider on a miss.
///
/// Concurrent misses for the same key wait behind a per-key gate, so the
/// wrapped provider sees at most one in-flight call per key. Failures are
/// returned unchanged and never cached; the next caller for that key tries
/// the provider again.
pub struct CachingHoroscopeProvider {
    inner: Arc<dyn HoroscopeProvider>,
    cache: Arc<dyn HoroscopeCache>,
    // Never held across an await, so it can be taken from `Drop`.
    in_flight: GateTable,
}

/// A task's claim on a per-key gate.
///
/// Dropping the handle, whether the fetch finished or its future was
/// cancelled, removes the gate from the table once no other task holds it.
struct GateHandle<'a> {
    key: CacheKey,
    gate: Gate,
    table: &'a GateTable,
}

impl Drop for GateHandle<'_> {
    fn drop(&mut self) {
        // Let go of our handle before counting the remaining holders.
        drop(std::mem::take(&mut self.gate));
        let mut in_flight = self.table.lock().unwrap_or_else(PoisonError::into_inner);
        if in_flight
            .get(&self.key)
            .is_some_and(|held| Arc::strong_count(held) == 1)
        {
            in_flight.remove(&self.key);
        }
    }
}

impl CachingHoroscopeProvider {
    pub fn new(inner: Arc<dyn HoroscopeProvider>, cache: Arc<dyn HoroscopeCache>) -> Self {
        Self {
            inner,
            cache,
            in_flight: Mutex::new(HashMap::new()),
        }
    }

    pub fn cache(&self) -> &Arc<dyn HoroscopeCache> {
        &self.cache
    }

    fn acquire_gate(&self, key: &CacheKey) -> GateHandle<'_> {
        let mut in_flight = self.in_flight.lock().unwrap_or_else(PoisonError::into_inner);
        let gate = in_flight.entry(key.clone()).or_default().clone();
        GateHandle {
            key: key.clone(),
            gate,
            table: &self.in_flight,
        }
    }

    async fn fetch_behind_gate(&self, handle: &GateHandle<'_>) -> Result<String, HoroscopeError> {
        let _guard = handle.gate.lock().await;
        let key = &handle.key;

        // Another task may have filled the entry while we waited.
        if let Some(cached) = self.cache.get(key).await? {
            tracing::debug!(key = %key, "horoscope cache hit after wait");
            return Ok(cached);
        }

        let horoscope = self
            .inner
            .horoscope_for(&key.subject, &key.effective_date)
            .await?;
        self.cache.put(key, &horoscope).await?;
        Ok(horoscope)
    }
}

#[async_trait]
impl HoroscopeProvider for CachingHoroscopeProvider {
    async fn horoscope_for(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError> {
        let key = CacheKey::new(subject, effective_date);

        if let Some(cached) = self.cache.get(&key).await? {
            tracing::debug!(key = %key, "horoscope cache hit");
            return Ok(cached);
        }
        tracing::debug!(key = %key, "horoscope cache miss");

        let handle = self.acquire_gate(&key);
        let result = self.fetch_behind_gate(&handle).await;
        drop(handle);

        if let Err(ref e) = result {
            tracing::debug!(key = %key, error = %e, "horoscope fetch failed, not cached");
        }
        result
    }
}
