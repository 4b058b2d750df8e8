//! JSON contract with the prediction service

use super::forecast::ForecastPoint;
use super::form::{Method, TimeFrame};
use serde::{Deserialize, Deserializer, Serialize};

/// Body of `POST /predict`
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PredictRequest {
    pub keyword: String,
    pub time_frame: TimeFrame,
    pub method: Method,
    pub days_to_predict: u32,
}

/// Successful `POST /predict` body. Missing or null arrays decode as empty.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct PredictResponse {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub historical: Vec<ForecastPoint>,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub forecast: Vec<ForecastPoint>,
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

/// Body of a non-2xx answer
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub error: Option<String>,
}

/// Body of `GET /`
#[derive(Debug, Clone, Deserialize)]
pub struct HealthBody {
    #[serde(default)]
    pub message: Option<String>,
}

/// A structured answer from the service
#[derive(Debug, Clone, PartialEq)]
pub enum PredictOutcome {
    /// 2xx with a readable body
    Forecast(PredictResponse),
    /// Non-2xx; carries the message to show the user
    Rejected(String),
}
