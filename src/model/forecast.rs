//! Forecast points and their display rows

use serde::Deserialize;
use std::iter::Map;
use std::slice::Iter;

/// One dated value with its uncertainty band
///
/// The service omits the band on historical points, so the bounds are optional.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ForecastPoint {
    pub ds: String,
    pub yhat: f64,
    #[serde(default)]
    pub yhat_lower: Option<f64>,
    #[serde(default)]
    pub yhat_upper: Option<f64>,
}

impl ForecastPoint {
    /// `"{ds}: {yhat:.2}%"`
    ///
    /// Uses std float formatting, which rounds the exact binary value and
    /// breaks exact ties to even (0.125 renders as 0.12).
    pub fn display_row(&self) -> String {
        format!("{}: {:.2}%", self.ds, self.yhat)
    }

    /// `"[lower, upper]"`, or a dash when the service sent no band
    pub fn band_label(&self) -> String {
        match (self.yhat_lower, self.yhat_upper) {
            (Some(lower), Some(upper)) => format!("[{:.2}, {:.2}]", lower, upper),
            _ => "-".to_string(),
        }
    }
}

/// Lazy display rows over a series. `Clone` restarts the sequence.
pub type ForecastRows<'a> = Map<Iter<'a, ForecastPoint>, fn(&ForecastPoint) -> String>;

/// Project a series onto display rows, in series order
pub fn rows(points: &[ForecastPoint]) -> ForecastRows<'_> {
    points.iter().map(ForecastPoint::display_row as fn(&ForecastPoint) -> String)
}
