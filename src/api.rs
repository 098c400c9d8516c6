use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Utc;
use metrics::counter;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;

use crate::config::{AppConfig, DEFAULT_LAT, DEFAULT_LON};
use crate::news::{FallbackNewsGateway, NewsDataGateway, NewsGateway, DEFAULT_LANG};
use crate::risk::{self, InvalidInput, WeatherSample};
use crate::shelters::{Shelter, ShelterDirectory};
use crate::weather::{OpenWeatherGateway, SimulatedWeatherGateway, WeatherGateway, WeatherReport};

#[derive(Clone)]
pub struct AppState {
    config: Arc<AppConfig>,
    weather: Arc<dyn WeatherGateway>,
    news: Arc<dyn NewsGateway>,
    shelters: Arc<ShelterDirectory>,
}

impl AppState {
    /// Wire gateways from a config snapshot. Providers without a key get
    /// their credential-free fallback so every route stays serviceable.
    pub fn from_config(config: AppConfig) -> anyhow::Result<Self> {
        let weather: Arc<dyn WeatherGateway> = match &config.openweather_api_key {
            Some(key) => Arc::new(OpenWeatherGateway::new(key.clone())?),
            None => Arc::new(SimulatedWeatherGateway),
        };
        let news: Arc<dyn NewsGateway> = match &config.newsdata_api_key {
            Some(key) => Arc::new(NewsDataGateway::new(key.clone())?),
            None => Arc::new(FallbackNewsGateway),
        };
        Ok(Self {
            config: Arc::new(config),
            weather,
            news,
            shelters: Arc::new(ShelterDirectory::load_default()),
        })
    }

    /// Snapshot the environment and wire from it (binary and tests).
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_config(AppConfig::from_env())
    }
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(root_status))
        .route("/api/health", get(health))
        .route("/api/weather", get(get_weather))
        .route("/api/predict-risk", post(predict_risk))
        .route("/api/shelters", get(get_shelters))
        .route("/api/news", get(get_news))
        .layer(CorsLayer::very_permissive())
        .with_state(state)
}

/// Errors surfaced to HTTP clients as `{"error": ...}` JSON.
pub enum ApiError {
    BadRequest(String),
    Upstream(anyhow::Error),
}

impl From<InvalidInput> for ApiError {
    fn from(e: InvalidInput) -> Self {
        ApiError::BadRequest(e.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::Upstream(err) => (StatusCode::BAD_GATEWAY, format!("{err:#}")),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}

#[derive(serde::Serialize)]
struct RootStatus {
    message: &'static str,
    weather_api: bool,
    news_api: bool,
    timestamp: String,
}

async fn root_status(State(state): State<AppState>) -> Json<RootStatus> {
    Json(RootStatus {
        message: "Flood Guard Backend Running",
        weather_api: state.config.weather_api_configured(),
        news_api: state.config.news_api_configured(),
        timestamp: Utc::now().to_rfc3339(),
    })
}

#[derive(serde::Serialize)]
struct Health {
    status: &'static str,
    time: String,
}

async fn health() -> Json<Health> {
    Json(Health {
        status: "online",
        time: Utc::now().to_rfc3339(),
    })
}

#[derive(serde::Deserialize)]
struct WeatherQuery {
    lat: Option<f64>,
    lon: Option<f64>,
}

async fn get_weather(
    State(state): State<AppState>,
    Query(q): Query<WeatherQuery>,
) -> Result<Json<WeatherReport>, ApiError> {
    let lat = q.lat.unwrap_or(DEFAULT_LAT);
    let lon = q.lon.unwrap_or(DEFAULT_LON);
    let report = state
        .weather
        .fetch(lat, lon)
        .await
        .map_err(ApiError::Upstream)?;
    Ok(Json(report))
}

#[derive(Debug, PartialEq, serde::Serialize)]
struct PredictRiskResponse {
    predicted_risk_level: u8,
    risk_label: &'static str,
    score: f64,
    confidence: f64,
}

/// POST body is untyped on purpose: the dashboard sends whatever fields it
/// has, and an absent body means "all defaults".
async fn predict_risk(body: Option<Json<Value>>) -> Result<Json<PredictRiskResponse>, ApiError> {
    let body = body.map(|Json(v)| v).unwrap_or(Value::Null);
    let sample = WeatherSample::from_json(&body)?;
    let assessment = risk::assess(&sample);

    counter!("risk_assessments_total").increment(1);

    Ok(Json(PredictRiskResponse {
        predicted_risk_level: assessment.level.rank(),
        risk_label: assessment.level.label(),
        score: assessment.score,
        confidence: assessment.confidence,
    }))
}

#[derive(serde::Serialize)]
struct SheltersResponse {
    shelters: Vec<Shelter>,
}

async fn get_shelters(State(state): State<AppState>) -> Json<SheltersResponse> {
    Json(SheltersResponse {
        shelters: state.shelters.all().to_vec(),
    })
}

#[derive(serde::Deserialize)]
struct NewsQuery {
    lang: Option<String>,
}

async fn get_news(
    State(state): State<AppState>,
    Query(q): Query<NewsQuery>,
) -> Result<Json<Value>, ApiError> {
    let lang = q.lang.as_deref().unwrap_or(DEFAULT_LANG);
    let payload = state.news.fetch(lang).await.map_err(ApiError::Upstream)?;
    Ok(Json(payload))
}
