use std::sync::Arc;

use horoscope_cache::{CachingHoroscopeProvider, InMemoryHoroscopeCache};
use horoscope_core::{HoroscopeCache, HoroscopeError, HoroscopeProvider};
use horoscope_providers::{
    MumblerAdapter, MumblerConfig, ProviderBackend, RetryHoroscopeProvider, RetryPolicy,
};
use serde::{Deserialize, Serialize};

/// Settings for the default provider chain built by [`CrystalBall::from_config`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CrystalBallConfig {
    #[serde(default)]
    pub mumbler: MumblerConfig,
    /// Retry transient Mumbler failures before they reach the cache.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub retry: Option<RetryPolicy>,
}

impl CrystalBallConfig {
    pub fn new(mumbler: MumblerConfig) -> Self {
        Self {
            mumbler,
            retry: None,
        }
    }

    pub fn with_retry(mut self, policy: RetryPolicy) -> Self {
        self.retry = Some(policy);
        self
    }
}

/// Entry point for horoscope lookups.
///
/// The crystal ball owns no state of its own; it forwards every request to
/// the provider chain it was built with.
#[derive(Clone)]
pub struct CrystalBall {
    provider: Arc<dyn HoroscopeProvider>,
}

impl CrystalBall {
    pub fn new(provider: Arc<dyn HoroscopeProvider>) -> Self {
        Self { provider }
    }

    /// Wrap `inner` so repeated lookups are answered from `cache`.
    pub fn cached(inner: Arc<dyn HoroscopeProvider>, cache: Arc<dyn HoroscopeCache>) -> Self {
        Self::new(Arc::new(CachingHoroscopeProvider::new(inner, cache)))
    }

    /// Build the default chain: an in-memory cache in front of the Mumbler service.
    pub fn from_config(
        config: CrystalBallConfig,
        backend: Arc<dyn ProviderBackend>,
    ) -> Result<Self, HoroscopeError> {
        config.mumbler.validate()?;
        if let Some(ref policy) = config.retry {
            policy.validate()?;
        }

        tracing::debug!(
            base_url = %config.mumbler.base_url,
            retry = config.retry.is_some(),
            "building crystal ball"
        );

        let mut inner: Arc<dyn HoroscopeProvider> =
            Arc::new(MumblerAdapter::new(config.mumbler, backend));
        if let Some(policy) = config.retry {
            inner = Arc::new(RetryHoroscopeProvider::new(inner, policy));
        }
        Ok(Self::cached(inner, Arc::new(InMemoryHoroscopeCache::new())))
    }

    pub fn provider(&self) -> &Arc<dyn HoroscopeProvider> {
        &self.provider
    }

    pub async fn fetch_horoscope(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError> {
        self.provider.horoscope_for(subject, effective_date).await
    }
}
