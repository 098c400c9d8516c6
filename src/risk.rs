//! # Flood Risk Scorer
//! Pure, testable logic that maps `(rainfall, humidity, temperature)` →
//! `RiskAssessment`. No I/O, suitable for unit tests and any transport.
//!
//! Policy: each variable contributes once (highest matching band wins, no
//! stacking within a variable); the additive total is classified into an
//! ordinal risk level. Confidence is a saturating transform of the score.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// A field of the request body could not be coerced to a float.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {detail}")]
pub struct InvalidInput {
    pub field: &'static str,
    pub detail: String,
}

/// One 24h weather reading. Missing fields take the documented defaults.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeatherSample {
    pub rainfall_mm_24h: f64,
    pub humidity: f64,
    pub temperature_c: f64,
}

impl Default for WeatherSample {
    fn default() -> Self {
        Self {
            rainfall_mm_24h: 0.0,
            humidity: 0.0,
            temperature_c: 25.0,
        }
    }
}

impl WeatherSample {
    pub fn new(rainfall_mm_24h: f64, humidity: f64, temperature_c: f64) -> Self {
        Self {
            rainfall_mm_24h,
            humidity,
            temperature_c,
        }
    }

    /// Build a sample from an untyped JSON body.
    ///
    /// The dashboard posts hand-assembled JSON, so fields may arrive as
    /// numbers or as numeric strings; both are accepted. Missing keys and
    /// `null` fall back to defaults. Anything else is `InvalidInput`.
    pub fn from_json(body: &Value) -> Result<Self, InvalidInput> {
        if !(body.is_object() || body.is_null()) {
            return Err(InvalidInput {
                field: "body",
                detail: "expected a JSON object".to_string(),
            });
        }
        let defaults = Self::default();
        Ok(Self {
            rainfall_mm_24h: coerce_f64(body, "rainfall_mm_24h")?
                .unwrap_or(defaults.rainfall_mm_24h),
            humidity: coerce_f64(body, "humidity")?.unwrap_or(defaults.humidity),
            temperature_c: coerce_f64(body, "temperature_c")?.unwrap_or(defaults.temperature_c),
        })
    }
}

/// Coerce `body[field]` to a float. `Ok(None)` means absent/null (use the
/// default); numeric strings are parsed the way form-ish clients send them.
fn coerce_f64(body: &Value, field: &'static str) -> Result<Option<f64>, InvalidInput> {
    match body.get(field) {
        None | Some(Value::Null) => Ok(None),
        Some(Value::Number(n)) => n.as_f64().map(Some).ok_or_else(|| InvalidInput {
            field,
            detail: format!("number out of range: {n}"),
        }),
        Some(Value::String(s)) => s.trim().parse::<f64>().map(Some).map_err(|_| InvalidInput {
            field,
            detail: format!("not a number: {s:?}"),
        }),
        Some(other) => Err(InvalidInput {
            field,
            detail: format!("expected a number, got {other}"),
        }),
    }
}

/// Ordinal risk category, ascending severity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RiskLevel {
    None,
    Low,
    Moderate,
    High,
}

impl RiskLevel {
    /// Numeric rank used on the wire (`predicted_risk_level`).
    pub fn rank(self) -> u8 {
        match self {
            RiskLevel::None => 0,
            RiskLevel::Low => 1,
            RiskLevel::Moderate => 2,
            RiskLevel::High => 3,
        }
    }

    /// Human-readable label used on the wire (`risk_label`).
    pub fn label(self) -> &'static str {
        match self {
            RiskLevel::None => "No Significant Flood Risk",
            RiskLevel::Low => "Low Risk",
            RiskLevel::Moderate => "Moderate Risk",
            RiskLevel::High => "High Risk",
        }
    }

    /// Classify an unrounded score, first matching band high to low.
    pub fn from_score(score: f64) -> Self {
        if score >= 0.80 {
            RiskLevel::High
        } else if score >= 0.50 {
            RiskLevel::Moderate
        } else if score >= 0.25 {
            RiskLevel::Low
        } else {
            RiskLevel::None
        }
    }
}

/// Per-variable contributions, kept for explainability.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub rainfall: f64,
    pub humidity: f64,
    pub temperature: f64,
}

/// Complete assessment for one sample.
/// `score` and `confidence` are rounded to 2 decimals for display; the
/// level is classified from the unrounded sum so band edges stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RiskAssessment {
    pub level: RiskLevel,
    pub score: f64,
    pub confidence: f64,
    pub breakdown: ScoreBreakdown,
}

/// Assess flood risk for one weather sample.
///
/// Deterministic and stateless; safe to call concurrently.
pub fn assess(sample: &WeatherSample) -> RiskAssessment {
    let breakdown = ScoreBreakdown {
        rainfall: rainfall_contribution(sample.rainfall_mm_24h),
        humidity: humidity_contribution(sample.humidity),
        temperature: temperature_contribution(sample.temperature_c),
    };
    let raw = breakdown.rainfall + breakdown.humidity + breakdown.temperature;

    // Confidence saturates at 100 and is computed from the unrounded sum;
    // rounding happens last so outputs match the historical service exactly.
    let confidence = round2((raw + 0.20).min(1.0) * 100.0);

    RiskAssessment {
        level: RiskLevel::from_score(raw),
        score: round2(raw),
        confidence,
        breakdown,
    }
}

// Band tables. Lower bounds are exclusive (strict comparisons): a reading of
// exactly 100 mm falls in the >60 band, not the >100 one.

fn rainfall_contribution(mm: f64) -> f64 {
    if mm > 100.0 {
        0.70
    } else if mm > 60.0 {
        0.50
    } else if mm > 30.0 {
        0.30
    } else if mm > 10.0 {
        0.10
    } else {
        0.0
    }
}

fn humidity_contribution(pct: f64) -> f64 {
    if pct > 90.0 {
        0.30
    } else if pct > 80.0 {
        0.20
    } else if pct > 70.0 {
        0.10
    } else {
        0.0
    }
}

fn temperature_contribution(celsius: f64) -> f64 {
    if celsius < 20.0 {
        0.05
    } else {
        0.0
    }
}

#[inline]
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}
