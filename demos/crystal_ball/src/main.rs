use std::sync::Arc;

use equine_horoscope::core::HoroscopeError;
use equine_horoscope::providers::{FakeBackend, MumblerConfig, ProviderResponse};
use equine_horoscope::{CrystalBall, CrystalBallConfig};
use serde_json::json;

#[tokio::main]
async fn main() -> Result<(), HoroscopeError> {
    tracing_subscriber::fmt::init();

    // --- Setup: a fake Mumbler that can answer exactly twice ---
    let backend = Arc::new(FakeBackend::new());
    backend
        .push_response(ProviderResponse {
            status: 200,
            body: json!({"horoscope": "A bold stride brings you to the winner's circle."}),
        })
        .push_response(ProviderResponse {
            status: 200,
            body: json!({"horoscope": "Rest today; the track is muddy."}),
        });

    let config = CrystalBallConfig::new(MumblerConfig::new().with_base_url("http://mumbler.demo"));
    let ball = CrystalBall::from_config(config, backend.clone())?;

    println!("=== Cache Miss (first call) ===");
    let first = ball.fetch_horoscope("Seabiscuit", "2024-05-05").await?;
    println!("Seabiscuit, 2024-05-05: {first}");

    println!("\n=== Cache Hit (same horse, same date) ===");
    let again = ball.fetch_horoscope("Seabiscuit", "2024-05-05").await?;
    println!("Seabiscuit, 2024-05-05: {again}");
    println!("Same horoscope: {}", first == again);

    println!("\n=== Cache Miss (different date) ===");
    let other = ball.fetch_horoscope("Seabiscuit", "2024-05-06").await?;
    println!("Seabiscuit, 2024-05-06: {other}");

    println!(
        "\nMumbler was asked {} times for 3 lookups.",
        backend.requests().await.len()
    );
    Ok(())
}
