use std::time::{Duration, Instant};

use horoscope_core::{HoroscopeError, HoroscopeProvider};
use horoscope_providers::ScriptedHoroscopeProvider;

#[tokio::test]
async fn answers_from_script_and_counts_calls() {
    let provider =
        ScriptedHoroscopeProvider::new().with_horoscope("Seabiscuit", "2024-05-05", "Bold forecast");

    assert_eq!(provider.calls(), 0);
    let text = provider
        .horoscope_for("Seabiscuit", "2024-05-05")
        .await
        .unwrap();
    assert_eq!(text, "Bold forecast");
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn unscripted_key_fails() {
    let provider = ScriptedHoroscopeProvider::new();
    let err = provider
        .horoscope_for("Seabiscuit", "2024-05-05")
        .await
        .unwrap_err();
    assert_eq!(
        err,
        HoroscopeError::Provider("no horoscope scripted for Seabiscuit@2024-05-05".into())
    );
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn scripted_failure_is_returned() {
    let provider = ScriptedHoroscopeProvider::new().with_failure(
        "Seabiscuit",
        "2024-05-05",
        HoroscopeError::Unavailable("stars hidden".into()),
    );
    let err = provider
        .horoscope_for("Seabiscuit", "2024-05-05")
        .await
        .unwrap_err();
    assert_eq!(err, HoroscopeError::Unavailable("stars hidden".into()));
}

#[tokio::test]
async fn clones_share_call_counter() {
    let provider =
        ScriptedHoroscopeProvider::new().with_horoscope("Seabiscuit", "2024-05-05", "Bold forecast");
    let clone = provider.clone();

    clone.horoscope_for("Seabiscuit", "2024-05-05").await.unwrap();
    assert_eq!(provider.calls(), 1);
}

#[tokio::test]
async fn latency_delays_answer() {
    let provider = ScriptedHoroscopeProvider::new()
        .with_horoscope("Seabiscuit", "2024-05-05", "Bold forecast")
        .with_latency(Duration::from_millis(30));

    let started = Instant::now();
    provider
        .horoscope_for("Seabiscuit", "2024-05-05")
        .await
        .unwrap();
    assert!(started.elapsed() >= Duration::from_millis(30));
}
