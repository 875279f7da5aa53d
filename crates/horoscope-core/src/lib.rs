use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Identifies one horoscope: a subject (usually a horse's name) on an effective date.
///
/// Equality and hashing are structural, so two keys built from equal components
/// address the same cache entry.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CacheKey {
    pub subject: String,
    pub effective_date: String,
}

impl CacheKey {
    pub fn new(subject: impl Into<String>, effective_date: impl Into<String>) -> Self {
        Self {
            subject: subject.into(),
            effective_date: effective_date.into(),
        }
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.subject, self.effective_date)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HoroscopeError {
    #[error("provider error: {0}")]
    Provider(String),
    #[error("rate limit: {0}")]
    RateLimit(String),
    #[error("provider unavailable: {0}")]
    Unavailable(String),
    #[error("parsing error: {0}")]
    Parsing(String),
    #[error("cache error: {0}")]
    Cache(String),
    #[error("config error: {0}")]
    Config(String),
}

impl HoroscopeError {
    /// Transient failures that a caller may reasonably try again.
    pub fn is_transient(&self) -> bool {
        matches!(self, HoroscopeError::RateLimit(_) | HoroscopeError::Unavailable(_))
    }
}

/// Anything that can produce a horoscope for a subject on a date.
#[async_trait]
pub trait HoroscopeProvider: Send + Sync {
    async fn horoscope_for(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError>;
}

/// Trait for caching horoscope texts.
#[async_trait]
pub trait HoroscopeCache: Send + Sync {
    /// Look up a cached horoscope by key.
    async fn get(&self, key: &CacheKey) -> Result<Option<String>, HoroscopeError>;
    /// Store a horoscope, replacing any previous value for the key.
    async fn put(&self, key: &CacheKey, horoscope: &str) -> Result<(), HoroscopeError>;
    /// Clear all entries from the cache.
    async fn clear(&self) -> Result<(), HoroscopeError>;
}
