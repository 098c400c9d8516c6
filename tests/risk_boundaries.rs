// tests/risk_boundaries.rs
//
// Boundary tests for the risk bands via the public /api/predict-risk.
// Optimized with a cached Router (tokio::sync::OnceCell).

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use http::StatusCode;
use serde::Deserialize;
use tokio::sync::OnceCell;
use tower::ServiceExt; // for `oneshot`

use floodguard_backend::api;
use floodguard_backend::config::AppConfig;

#[derive(Debug, Deserialize)]
struct RiskResponse {
    predicted_risk_level: u8,
    risk_label: String,
    score: f64,
    confidence: f64,
}

// --- Router cache (build once per test binary) ---
static ROUTER: OnceCell<axum::Router> = OnceCell::const_new();

async fn test_app() -> axum::Router {
    ROUTER
        .get_or_init(|| async {
            let state =
                api::AppState::from_config(AppConfig::default()).expect("state should build");
            api::create_router(state)
        })
        .await
        .clone()
}

async fn call_predict(rainfall: f64, humidity: f64, temperature: f64) -> RiskResponse {
    let router = test_app().await;

    let payload = serde_json::json!({
        "rainfall_mm_24h": rainfall,
        "humidity": humidity,
        "temperature_c": temperature,
    });
    let req = Request::builder()
        .method("POST")
        .uri("/api/predict-risk")
        .header("content-type", "application/json")
        .body(Body::from(payload.to_string()))
        .unwrap();

    let resp = router.oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    serde_json::from_slice(&bytes).expect("parse /api/predict-risk json")
}

#[inline]
fn approx(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[tokio::test]
async fn rainfall_band_edges_are_exclusive() {
    // Exactly at each threshold → the band below; just past → the band above.
    for (at, just_past, score_at, score_past) in [
        (10.0, 10.01, 0.00, 0.10),
        (30.0, 30.01, 0.10, 0.30),
        (60.0, 60.01, 0.30, 0.50),
        (100.0, 100.01, 0.50, 0.70),
    ] {
        let a = call_predict(at, 0.0, 25.0).await;
        let b = call_predict(just_past, 0.0, 25.0).await;
        assert!(
            approx(a.score, score_at),
            "rainfall {at} → score {}, expected {score_at}",
            a.score
        );
        assert!(
            approx(b.score, score_past),
            "rainfall {just_past} → score {}, expected {score_past}",
            b.score
        );
    }
}

#[tokio::test]
async fn humidity_band_edges_are_exclusive() {
    for (at, just_past, score_at, score_past) in [
        (70.0, 70.01, 0.00, 0.10),
        (80.0, 80.01, 0.10, 0.20),
        (90.0, 90.01, 0.20, 0.30),
    ] {
        let a = call_predict(0.0, at, 25.0).await;
        let b = call_predict(0.0, just_past, 25.0).await;
        assert!(approx(a.score, score_at), "humidity {at} → {}", a.score);
        assert!(
            approx(b.score, score_past),
            "humidity {just_past} → {}",
            b.score
        );
    }
}

#[tokio::test]
async fn cold_reading_adds_its_nudge() {
    let warm = call_predict(0.0, 0.0, 20.0).await;
    let cold = call_predict(0.0, 0.0, 19.99).await;
    assert!(approx(warm.score, 0.0));
    assert!(approx(cold.score, 0.05));
}

#[tokio::test]
async fn level_never_regresses_as_rainfall_grows() {
    let mut last_level = 0u8;
    let mut last_score = 0.0f64;
    let mut rainfall = 0.0;
    while rainfall <= 200.0 {
        let r = call_predict(rainfall, 75.0, 18.0).await;
        assert!(
            r.predicted_risk_level >= last_level,
            "level regressed at rainfall {rainfall}"
        );
        assert!(
            r.score >= last_score - 1e-9,
            "score regressed at rainfall {rainfall}"
        );
        last_level = r.predicted_risk_level;
        last_score = r.score;
        rainfall += 5.0;
    }
    // The sweep must end in the top band with this humidity/temperature mix.
    assert_eq!(last_level, 3);
}

#[tokio::test]
async fn labels_match_levels_across_the_range() {
    let expectations = [
        (0.0, 0.0, 25.0, 0, "No Significant Flood Risk"),
        (50.0, 75.0, 25.0, 1, "Low Risk"),
        (150.0, 0.0, 25.0, 2, "Moderate Risk"),
        (150.0, 95.0, 15.0, 3, "High Risk"),
    ];
    for (rain, hum, temp, level, label) in expectations {
        let r = call_predict(rain, hum, temp).await;
        assert_eq!(r.predicted_risk_level, level, "level for rain {rain}");
        assert_eq!(r.risk_label, label, "label for rain {rain}");
    }
}

#[tokio::test]
async fn confidence_saturates_at_100() {
    // 0.7 + 0.3 + 0.05 pushes min(score + 0.2, 1.0) to the cap.
    let r = call_predict(101.0, 91.0, 10.0).await;
    assert!(approx(r.confidence, 100.0), "confidence {}", r.confidence);

    // Below saturation the transform is score + 20 points.
    let r = call_predict(0.0, 0.0, 25.0).await;
    assert!(approx(r.confidence, 20.0), "confidence {}", r.confidence);
}
