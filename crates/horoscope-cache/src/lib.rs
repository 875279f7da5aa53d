mod caching_provider;
mod in_memory;

pub use caching_provider::CachingHoroscopeProvider;
pub use in_memory::InMemoryHoroscopeCache;

// Re-export the cache trait so callers can depend on this crate alone
pub use horoscope_core::HoroscopeCache;
