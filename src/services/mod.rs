//! External service interactions
//!
//! - `PredictClient` - HTTP calls to the prediction service
//! - `PredictionRunner` - runs those calls in the background

pub mod predict_client;
pub mod prediction_runner;

pub use predict_client::PredictClient;
pub use prediction_runner::{PredictionRunner, RunnerMessage};
