//! Equine Horoscope: horoscopes for horses, fetched once and remembered.
//!
//! [`CrystalBall`] is the entry point. It forwards each request to a
//! [`HoroscopeProvider`](core::HoroscopeProvider) chain, normally an in-memory
//! cache in front of the Mumbler horoscope service.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use equine_horoscope::{CrystalBall, CrystalBallConfig};
//! use equine_horoscope::providers::HttpBackend;
//!
//! let ball = CrystalBall::from_config(CrystalBallConfig::default(), Arc::new(HttpBackend::new()))?;
//! let text = ball.fetch_horoscope("Seabiscuit", "2024-05-05").await?;
//! ```

mod crystal_ball;

pub use crystal_ball::{CrystalBall, CrystalBallConfig};

/// Core traits and types: HoroscopeProvider, HoroscopeCache, CacheKey, HoroscopeError.
pub use horoscope_core as core;

/// InMemoryHoroscopeCache and the CachingHoroscopeProvider decorator.
pub use horoscope_cache as cache;

/// Mumbler adapter, scripted stub, retry wrapper and HTTP backends.
pub use horoscope_providers as providers;
