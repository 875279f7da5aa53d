use std::sync::Arc;

use horoscope_cache::{HoroscopeCache, InMemoryHoroscopeCache};
use horoscope_core::CacheKey;

#[tokio::test]
async fn cache_hit() {
    let cache = InMemoryHoroscopeCache::new();
    let key = CacheKey::new("Seabiscuit", "2024-05-05");
    cache.put(&key, "Bold forecast").await.unwrap();

    let result = cache.get(&key).await.unwrap();
    assert_eq!(result.as_deref(), Some("Bold forecast"));
}

#[tokio::test]
async fn cache_miss() {
    let cache = InMemoryHoroscopeCache::new();
    let result = cache
        .get(&CacheKey::new("Nobody", "2024-05-05"))
        .await
        .unwrap();
    assert!(result.is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn entries_are_keyed_by_date() {
    let cache = InMemoryHoroscopeCache::new();
    let first = CacheKey::new("Secretariat", "2024-01-01");
    let second = CacheKey::new("Secretariat", "2024-01-02");

    cache.put(&first, "New year, new stride").await.unwrap();

    assert!(cache.get(&second).await.unwrap().is_none());
    assert_eq!(
        cache.get(&first).await.unwrap().as_deref(),
        Some("New year, new stride")
    );
}

#[tokio::test]
async fn overwrite_existing_key() {
    let cache = InMemoryHoroscopeCache::new();
    let key = CacheKey::new("Seabiscuit", "2024-05-05");
    cache.put(&key, "old").await.unwrap();
    cache.put(&key, "new").await.unwrap();

    assert_eq!(cache.get(&key).await.unwrap().as_deref(), Some("new"));
    assert_eq!(cache.len().await, 1);
}

#[tokio::test]
async fn clear_removes_all() {
    let cache = InMemoryHoroscopeCache::new();
    let a = CacheKey::new("Seabiscuit", "2024-05-05");
    let b = CacheKey::new("Secretariat", "2024-01-01");
    cache.put(&a, "va").await.unwrap();
    cache.put(&b, "vb").await.unwrap();
    assert_eq!(cache.len().await, 2);

    cache.clear().await.unwrap();

    assert!(cache.get(&a).await.unwrap().is_none());
    assert!(cache.get(&b).await.unwrap().is_none());
    assert!(cache.is_empty().await);
}

#[tokio::test]
async fn concurrent_access() {
    let cache = Arc::new(InMemoryHoroscopeCache::new());
    let mut handles = Vec::new();

    for i in 0..10 {
        let c = cache.clone();
        handles.push(tokio::spawn(async move {
            let key = CacheKey::new(format!("horse_{i}"), "2024-05-05");
            c.put(&key, &format!("val_{i}")).await.unwrap();
        }));
    }

    for h in handles {
        h.await.unwrap();
    }

    for i in 0..10 {
        let key = CacheKey::new(format!("horse_{i}"), "2024-05-05");
        let result = cache.get(&key).await.unwrap();
        assert_eq!(result, Some(format!("val_{i}")), "{key} should exist");
    }
}
