use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use horoscope_core::{HoroscopeError, HoroscopeProvider};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RetryPolicy {
    pub max_attempts: usize,
    #[serde(with = "millis")]
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn validate(&self) -> Result<(), HoroscopeError> {
        if self.max_attempts == 0 {
            return Err(HoroscopeError::Config(
                "retry max_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn delay_for(&self, attempt: usize) -> Duration {
        let factor = 2u32.saturating_pow(u32::try_from(attempt).unwrap_or(u32::MAX));
        self.base_delay.saturating_mul(factor)
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            base_delay: Duration::from_millis(500),
        }
    }
}

mod millis {
    use std::time::Duration;

    use serde::{ser::Error as _, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(d: &Duration, s: S) -> Result<S::Ok, S::Error> {
        let ms = u64::try_from(d.as_millis()).map_err(S::Error::custom)?;
        s.serialize_u64(ms)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<Duration, D::Error> {
        u64::deserialize(d).map(Duration::from_millis)
    }
}

/// Retries transient provider failures with exponential backoff.
pub struct RetryHoroscopeProvider {
    inner: Arc<dyn HoroscopeProvider>,
    policy: RetryPolicy,
}

impl RetryHoroscopeProvider {
    pub fn new(inner: Arc<dyn HoroscopeProvider>, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }
}

#[async_trait]
impl HoroscopeProvider for RetryHoroscopeProvider {
    async fn horoscope_for(
        &self,
        subject: &str,
        effective_date: &str,
    ) -> Result<String, HoroscopeError> {
        // A zero policy is rejected by `validate`; still make the one call.
        let max_attempts = self.policy.max_attempts.max(1);
        let mut attempt = 0;
        loop {
            match self.inner.horoscope_for(subject, effective_date).await {
                Ok(text) => return Ok(text),
                Err(e) if e.is_transient() && attempt + 1 < max_attempts => {
                    tracing::warn!(
                        subject = %subject,
                        date = %effective_date,
                        attempt = attempt + 1,
                        error = %e,
                        "retrying horoscope fetch"
                    );
                    tokio::time::sleep(self.policy.delay_for(attempt)).await;
                    attempt += 1;
                }
                Err(e) => return Err(e),
            }
        }
    }
}
