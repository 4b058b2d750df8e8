//! UI Components
//!
//! Each component encapsulates its own presentation state, event handling
//! and rendering. Components communicate through Actions rather than direct
//! state mutation.

pub mod form;
pub mod help_dialog;
pub mod layout;
pub mod quit_dialog;
pub mod results;
pub mod status_bar;

pub use form::{FormComponent, FormField};
pub use help_dialog::HelpDialog;
pub use layout::{calculate_main_layout, centered_popup};
pub use quit_dialog::QuitDialog;
pub use results::ResultsComponent;
pub use status_bar::{draw_header, draw_help_bar};
