//! Weather gateway: OpenWeather proxy with a simulated fallback.
//!
//! The live provider flattens the upstream payload into the stable shape the
//! dashboard consumes. Without an API key the service still answers, using a
//! canned reading, so the frontend can be developed credential-free.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use metrics::counter;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const OPENWEATHER_URL: &str = "https://api.openweathermap.org/data/2.5/weather";
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Flattened current-weather reading served by `/api/weather`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherReport {
    pub temperature: f64,
    pub humidity: f64,
    pub pressure: f64,
    /// Last-hour rainfall in mm; 0 when upstream omits it.
    pub rainfall: f64,
    pub wind_speed: f64,
    pub description: String,
    pub location: String,
    /// RFC 3339, stamped at proxy time.
    pub timestamp: String,
    /// "openweather" or "simulated".
    pub source: String,
}

#[async_trait]
pub trait WeatherGateway: Send + Sync {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherReport>;
    fn name(&self) -> &'static str;
}

/// Live OpenWeather client.
pub struct OpenWeatherGateway {
    api_key: String,
    base_url: String,
    client: reqwest::Client,
}

impl OpenWeatherGateway {
    pub fn new(api_key: impl Into<String>) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .context("building weather http client")?;
        Ok(Self {
            api_key: api_key.into(),
            base_url: OPENWEATHER_URL.to_string(),
            client,
        })
    }

    #[cfg(test)]
    fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }
}

#[async_trait]
impl WeatherGateway for OpenWeatherGateway {
    async fn fetch(&self, lat: f64, lon: f64) -> Result<WeatherReport> {
        let resp = self
            .client
            .get(&self.base_url)
            .query(&[
                ("lat", lat.to_string()),
                ("lon", lon.to_string()),
                ("appid", self.api_key.clone()),
                ("units", "metric".to_string()),
            ])
            .send()
            .await
            .map_err(|e| {
                tracing::warn!(error = ?e, provider = "openweather", "provider http error");
                counter!("weather_proxy_errors_total").increment(1);
                e
            })
            .context("openweather get()")?;

        let resp = resp.error_for_status().map_err(|e| {
            tracing::warn!(error = ?e, provider = "openweather", "provider status error");
            counter!("weather_proxy_errors_total").increment(1);
            e
        })?;

        let data: OwmCurrent = resp.json().await.context("decoding openweather json")?;
        Ok(flatten(data))
    }

    fn name(&self) -> &'static str {
        "openweather"
    }
}

/// Canned reading served when no API key is configured.
pub struct SimulatedWeatherGateway;

#[async_trait]
impl WeatherGateway for SimulatedWeatherGateway {
    async fn fetch(&self, _lat: f64, _lon: f64) -> Result<WeatherReport> {
        Ok(WeatherReport {
            temperature: 29.4,
            humidity: 76.0,
            pressure: 1009.0,
            rainfall: 12.1,
            wind_speed: 3.4,
            description: "simulated rain".to_string(),
            location: "Simulated India".to_string(),
            timestamp: Utc::now().to_rfc3339(),
            source: "simulated".to_string(),
        })
    }

    fn name(&self) -> &'static str {
        "simulated"
    }
}

// Upstream shape, only the fields we flatten.

#[derive(Debug, Deserialize)]
struct OwmCurrent {
    main: OwmMain,
    #[serde(default)]
    rain: Option<OwmRain>,
    wind: OwmWind,
    #[serde(default)]
    weather: Vec<OwmWeather>,
    #[serde(default)]
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
struct OwmMain {
    temp: f64,
    humidity: f64,
    pressure: f64,
}

#[derive(Debug, Deserialize)]
struct OwmRain {
    #[serde(rename = "1h")]
    one_h: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct OwmWind {
    speed: f64,
}

#[derive(Debug, Deserialize)]
struct OwmWeather {
    description: String,
}

fn flatten(data: OwmCurrent) -> WeatherReport {
    WeatherReport {
        temperature: data.main.temp,
        humidity: data.main.humidity,
        pressure: data.main.pressure,
        rainfall: data.rain.and_then(|r| r.one_h).unwrap_or(0.0),
        wind_speed: data.wind.speed,
        description: data
            .weather
            .first()
            .map(|w| w.description.clone())
            .unwrap_or_default(),
        location: data.name.unwrap_or_else(|| "Unknown".to_string()),
        timestamp: Utc::now().to_rfc3339(),
        source: "openweather".to_string(),
    }
}
