use chrono::Utc;
use serde::Deserialize;
use thiserror::Error;

use crate::domain::{Classification, TrafficLight};

pub const ANALYSE_PATH: &str = "/api/analyse";

#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Network failure or non-200 status. No verdict; the tab keeps whatever
    /// icon it had.
    #[error("analysis request failed: {0}")]
    Transport(#[from] reqwest::Error),
    /// The server answered 200 but the body was not a usable verdict.
    #[error("analysis response malformed: {0}")]
    Malformed(String),
}

#[derive(Debug, Deserialize)]
struct AnalysisBody {
    score: Option<f64>,
    #[serde(rename = "trafficLight")]
    traffic_light: Option<i64>,
}

/// A 200 response must carry both `score` and `trafficLight`; anything else is
/// a malformed classification, not a transport failure.
pub fn parse_body(body: &str) -> Result<Classification, AnalysisError> {
    let parsed: AnalysisBody =
        serde_json::from_str(body).map_err(|err| AnalysisError::Malformed(err.to_string()))?;

    match (parsed.score, parsed.traffic_light) {
        (Some(score), Some(code)) => Ok(Classification {
            score,
            light: TrafficLight::from_code(code),
            received_at: Utc::now(),
        }),
        _ => Err(AnalysisError::Malformed(
            "missing score or trafficLight field".to_string(),
        )),
    }
}
