//! Model layer - request state and wire types
//!
//! - `PredictionState` - the form, request status and result series
//! - `wire` - JSON bodies exchanged with the prediction service
//! - `ModalStack` - overlay management

pub mod forecast;
pub mod form;
pub mod modal;
pub mod prediction;
pub mod status;
pub mod wire;

pub use forecast::ForecastPoint;
pub use form::{FormState, Method, TimeFrame};
pub use prediction::{PredictionState, Submission};
pub use status::{RequestStatus, ServiceHealth};
pub use wire::PredictOutcome;
