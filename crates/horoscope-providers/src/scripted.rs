use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use horoscope_core::{CacheKey, HoroscopeError, HoroscopeProvider};

/// Provider that answers from a fixed table and counts how often it is asked.
#[derive(Clone, Default)]
pub struct ScriptedHoroscopeProvider {
    script: Arc<HashMap<CacheKey, Result<String, HoroscopeError>>>,
    latency: Option<Duration>,
    calls: Arc<AtomicUsize>,
}

impl ScriptedHoroscopeProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_horoscope(
        self,
        subject: impl Into<String>,
        effective_date: impl Into<String>,
        horoscope: impl Into<String>,
    ) -> Self {
        self.script_outcome(CacheKey::new(subject, effective_date), Ok(horoscope.into()))
    }

    pub fn with_failure(
        self,
        subject: impl Into<String>,
        effective_date: impl Into<String>,
        error: HoroscopeError,
    ) -> Self {
        self.script_outcome(CacheKey::new(subject, effective_date), Err(error))
    }

    /// Sleep for `latency` before answering each call.
    pub fn with_latency(mut self, latency: Duration) -> Self {
        self.latency = Some(latency);
        self
    }

    /// Number of calls received so far, including failed ones.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    fn script_outcome(mut self, key: CacheKey, outcome: Result<String, HoroscopeError>) -> Self {
        Arc::make_mut(&mut self.script).insert(key, outcome);
        self
    }
}

#[async_trait]
impl HoroscopeProvider for ScriptedHoroscopeProvider {
    async fn horoscope_for(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(latency) = self.latency {
            tokio::time::sleep(latency).await;
        }

        let key = CacheKey::new(subject, effective_date);
        self.script.get(&key).cloned().unwrap_or_else(|| {
            Err(HoroscopeError::Provider(format!(
                "no horoscope scripted for {key}"
            )))
        })
    }
}
