//! Prediction request state
//!
//! Owns the form, the request status and both result series. Setters are the
//! only way to change the form; `begin_submit` and `settle` are the only way
//! to change status and results, which keeps the two consistent.

use super::forecast::{rows, ForecastPoint, ForecastRows};
use super::form::{FormState, Method, TimeFrame};
use super::status::RequestStatus;
use super::wire::{PredictOutcome, PredictRequest};
use crate::error::{SubmitRejected, TransportError, NETWORK_ERROR, REQUEST_CANCELLED, REQUEST_FAILED};
use chrono::{DateTime, Local};
use tracing::{debug, info, warn};

/// A validated request, stamped with the generation it belongs to
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    pub generation: u64,
    pub request: PredictRequest,
}

#[derive(Debug, Default)]
pub struct PredictionState {
    form: FormState,
    status: RequestStatus,
    historical: Vec<ForecastPoint>,
    forecast: Vec<ForecastPoint>,
    /// Bumped on every submit; only the latest generation may settle
    generation: u64,
    settled_at: Option<DateTime<Local>>,
}

impl PredictionState {
    pub fn new(form: FormState) -> Self {
        Self {
            form,
            ..Self::default()
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Form setters
    // ─────────────────────────────────────────────────────────────────────────

    pub fn set_keyword(&mut self, keyword: impl Into<String>) {
        self.form.keyword = keyword.into();
    }

    pub fn set_time_frame(&mut self, time_frame: TimeFrame) {
        self.form.time_frame = time_frame;
    }

    pub fn set_method(&mut self, method: Method) {
        self.form.method = method;
    }

    /// Raw text of the numeric field; parsed at submit time
    pub fn set_days_to_predict(&mut self, days: impl Into<String>) {
        self.form.days_to_predict = days.into();
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn keyword(&self) -> &str {
        &self.form.keyword
    }

    pub fn time_frame(&self) -> TimeFrame {
        self.form.time_frame
    }

    pub fn method(&self) -> Method {
        self.form.method
    }

    pub fn days_to_predict(&self) -> &str {
        &self.form.days_to_predict
    }

    pub fn status(&self) -> &RequestStatus {
        &self.status
    }

    pub fn loading(&self) -> bool {
        self.status.is_pending()
    }

    /// Error banner text; empty when there is nothing to show
    pub fn error(&self) -> &str {
        self.status.error_message().unwrap_or("")
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn settled_at(&self) -> Option<DateTime<Local>> {
        self.settled_at
    }

    pub fn historical(&self) -> &[ForecastPoint] {
        &self.historical
    }

    pub fn forecast(&self) -> &[ForecastPoint] {
        &self.forecast
    }

    pub fn historical_rows(&self) -> ForecastRows<'_> {
        rows(&self.historical)
    }

    pub fn forecast_rows(&self) -> ForecastRows<'_> {
        rows(&self.forecast)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Start a submission
    ///
    /// Clears previous results and error, then validates. A validation
    /// failure settles immediately as `Failed` without producing a request.
    pub fn begin_submit(&mut self) -> Result<Submission, SubmitRejected> {
        if self.status.is_pending() {
            debug!(generation = self.generation, "submit ignored, request in flight");
            return Err(SubmitRejected::AlreadyPending);
        }

        self.generation += 1;
        self.status = RequestStatus::Pending;
        self.historical.clear();
        self.forecast.clear();

        match self.form.validate() {
            Ok(request) => {
                info!(
                    generation = self.generation,
                    keyword = %request.keyword,
                    time_frame = ?request.time_frame,
                    method = ?request.method,
                    days_to_predict = request.days_to_predict,
                    "submitting prediction request"
                );
                Ok(Submission {
                    generation: self.generation,
                    request,
                })
            }
            Err(err) => {
                info!(generation = self.generation, error = %err, "form rejected before sending");
                self.status = RequestStatus::Failed(err.to_string());
                self.settled_at = Some(Local::now());
                Err(SubmitRejected::Invalid(err))
            }
        }
    }

    /// Apply the result of a request
    ///
    /// Returns false when the result belongs to a stale or abandoned
    /// generation, in which case nothing changes.
    pub fn settle(
        &mut self,
        generation: u64,
        result: Result<PredictOutcome, TransportError>,
    ) -> bool {
        if !self.status.is_pending() || generation != self.generation {
            debug!(
                generation,
                current = self.generation,
                "dropping result for stale request"
            );
            return false;
        }

        self.status = match result {
            Ok(PredictOutcome::Forecast(response)) => {
                info!(
                    generation,
                    historical = response.historical.len(),
                    forecast = response.forecast.len(),
                    "prediction received"
                );
                self.historical = response.historical;
                self.forecast = response.forecast;
                RequestStatus::Succeeded
            }
            Ok(PredictOutcome::Rejected(message)) => {
                info!(generation, %message, "prediction rejected by service");
                if message.trim().is_empty() {
                    RequestStatus::Failed(REQUEST_FAILED.to_string())
                } else {
                    RequestStatus::Failed(message)
                }
            }
            Err(err) => {
                warn!(generation, error = %err, "prediction request failed");
                RequestStatus::Failed(NETWORK_ERROR.to_string())
            }
        };
        self.settled_at = Some(Local::now());
        true
    }

    /// Give up on the in-flight request; its result will be ignored
    pub fn abandon(&mut self) -> bool {
        if !self.status.is_pending() {
            return false;
        }
        info!(generation = self.generation, "prediction request cancelled");
        self.status = RequestStatus::Failed(REQUEST_CANCELLED.to_string());
        self.settled_at = Some(Local::now());
        true
    }
}
