// tests/shelters_config.rs
//
// Config-file resolution for the shelter directory: env override, default
// path, seed fallback. Env-touching tests are serialized.

use std::{env, fs};

use axum::{
    body::{to_bytes, Body},
    http::Request,
};
use serde_json::Value as Json;
use tower::ServiceExt as _;

use floodguard_backend::api;
use floodguard_backend::config::AppConfig;
use floodguard_backend::shelters::{ShelterDirectory, ENV_SHELTERS_CONFIG_PATH};

const SAMPLE_TOML: &str = r#"
[[shelters]]
name = "Riverside High Ground Camp"
distance = "0.9 km"

[[shelters]]
name = "District Sports Complex"
distance = "4.1 km"
"#;

#[serial_test::serial]
#[test]
fn env_path_overrides_default() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("shelters.toml");
    fs::write(&path, SAMPLE_TOML).unwrap();

    env::set_var(ENV_SHELTERS_CONFIG_PATH, path.display().to_string());
    let d = ShelterDirectory::load_default();
    env::remove_var(ENV_SHELTERS_CONFIG_PATH);

    assert_eq!(d.len(), 2);
    assert_eq!(d.all()[0].name, "Riverside High Ground Camp");
    assert_eq!(d.all()[1].distance, "4.1 km");
}

#[serial_test::serial]
#[test]
fn missing_env_path_falls_back_to_seed() {
    // Point at a file that does not exist; the directory must still serve.
    env::set_var(ENV_SHELTERS_CONFIG_PATH, "/definitely/not/here.toml");
    let d = ShelterDirectory::load_default();
    env::remove_var(ENV_SHELTERS_CONFIG_PATH);

    assert_eq!(d.len(), 3);
    assert!(!d.is_empty());
}

#[serial_test::serial]
#[tokio::test(flavor = "multi_thread")]
async fn router_serves_configured_shelters() {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("shelters.toml");
    fs::write(&path, SAMPLE_TOML).unwrap();

    env::set_var(ENV_SHELTERS_CONFIG_PATH, path.display().to_string());
    let state = api::AppState::from_config(AppConfig::default()).expect("state builds");
    env::remove_var(ENV_SHELTERS_CONFIG_PATH);

    let app = api::create_router(state);
    let req = Request::builder()
        .method("GET")
        .uri("/api/shelters")
        .body(Body::empty())
        .unwrap();
    let resp = app.oneshot(req).await.unwrap();
    assert!(resp.status().is_success());

    let bytes = to_bytes(resp.into_body(), 256 * 1024).await.unwrap();
    let v: Json = serde_json::from_slice(&bytes).unwrap();
    let shelters = v["shelters"].as_array().unwrap();
    assert_eq!(shelters.len(), 2);
    assert_eq!(shelters[1]["name"], "District Sports Complex");
}
