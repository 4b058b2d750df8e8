//! Form state for a prediction request

use crate::error::ValidationError;
use crate::model::wire::PredictRequest;
use serde::{Deserialize, Serialize};

/// Aggregation bucket applied to historical data before forecasting
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeFrame {
    #[default]
    Week,
    Month,
    Year,
}

impl TimeFrame {
    pub fn all() -> [TimeFrame; 3] {
        [TimeFrame::Week, TimeFrame::Month, TimeFrame::Year]
    }

    pub fn label(&self) -> &'static str {
        match self {
            TimeFrame::Week => "Week",
            TimeFrame::Month => "Month",
            TimeFrame::Year => "Year",
        }
    }

    pub fn next(&self) -> TimeFrame {
        match self {
            TimeFrame::Week => TimeFrame::Month,
            TimeFrame::Month => TimeFrame::Year,
            TimeFrame::Year => TimeFrame::Week,
        }
    }

    pub fn prev(&self) -> TimeFrame {
        match self {
            TimeFrame::Week => TimeFrame::Year,
            TimeFrame::Month => TimeFrame::Week,
            TimeFrame::Year => TimeFrame::Month,
        }
    }
}

/// Forecasting technique, passed through to the service unchanged
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Method {
    #[default]
    Log,
    Linear,
}

impl Method {
    pub fn all() -> [Method; 2] {
        [Method::Log, Method::Linear]
    }

    pub fn label(&self) -> &'static str {
        match self {
            Method::Log => "Log",
            Method::Linear => "Linear",
        }
    }

    /// Two options, so next and previous are the same move
    pub fn toggle(&self) -> Method {
        match self {
            Method::Log => Method::Linear,
            Method::Linear => Method::Log,
        }
    }
}

/// The user's current input
///
/// `days_to_predict` keeps the raw text of the numeric field; it is only
/// turned into a number by [`FormState::validate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormState {
    pub keyword: String,
    pub time_frame: TimeFrame,
    pub method: Method,
    pub days_to_predict: String,
}

impl Default for FormState {
    fn default() -> Self {
        Self {
            keyword: String::new(),
            time_frame: TimeFrame::Week,
            method: Method::Log,
            days_to_predict: "7".to_string(),
        }
    }
}

impl FormState {
    /// Parse the horizon field into a positive day count
    pub fn horizon(&self) -> Result<u32, ValidationError> {
        let raw = self.days_to_predict.trim();
        if raw.is_empty() {
            return Err(ValidationError::MissingHorizon);
        }
        let value: i64 = raw
            .parse()
            .map_err(|_| ValidationError::InvalidHorizon(raw.to_string()))?;
        if value < 1 {
            return Err(ValidationError::NonPositiveHorizon(value));
        }
        u32::try_from(value).map_err(|_| ValidationError::InvalidHorizon(raw.to_string()))
    }

    /// Check the form and build the wire payload
    pub fn validate(&self) -> Result<PredictRequest, ValidationError> {
        if self.keyword.trim().is_empty() {
            return Err(ValidationError::EmptyKeyword);
        }
        let days_to_predict = self.horizon()?;
        Ok(PredictRequest {
            keyword: self.keyword.clone(),
            time_frame: self.time_frame,
            method: self.method,
            days_to_predict,
        })
    }
}
