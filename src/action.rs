//! Action enum - All possible application actions
//!
//! Components turn key events into Actions; the App applies them to the
//! prediction state.

use std::fmt;

/// All possible actions in the application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    // ─────────────────────────────────────────────────────────────────────────
    // App Lifecycle
    // ─────────────────────────────────────────────────────────────────────────
    /// Regular tick; polls background calls
    Tick,
    /// Terminal was resized
    Resize(u16, u16),
    /// Quit without confirmation
    ForceQuit,

    // ─────────────────────────────────────────────────────────────────────────
    // Form Editing
    // ─────────────────────────────────────────────────────────────────────────
    /// Move focus to the next form field
    NextField,
    /// Move focus to the previous form field
    PrevField,
    /// Type a character into the focused text field
    FieldInput(char),
    /// Delete the last character of the focused text field
    FieldBackspace,
    /// Empty the focused text field
    ClearField,
    /// Select the next option of the focused choice field
    NextOption,
    /// Select the previous option of the focused choice field
    PrevOption,

    // ─────────────────────────────────────────────────────────────────────────
    // Requests
    // ─────────────────────────────────────────────────────────────────────────
    /// Validate the form and send a prediction request
    Submit,
    /// Abort the in-flight request
    CancelRequest,
    /// Ping the prediction service
    CheckService,

    // ─────────────────────────────────────────────────────────────────────────
    // Results
    // ─────────────────────────────────────────────────────────────────────────
    /// Scroll results up one line
    ScrollUp,
    /// Scroll results down one line
    ScrollDown,
    /// Scroll results up one page
    PageUp,
    /// Scroll results down one page
    PageDown,
    /// Show or hide the uncertainty band column
    ToggleBands,

    // ─────────────────────────────────────────────────────────────────────────
    // Modals
    // ─────────────────────────────────────────────────────────────────────────
    /// Open quit confirmation dialog
    OpenQuitDialog,
    /// Open help dialog showing all keyboard shortcuts
    OpenHelp,
    /// Close the current modal
    CloseModal,
}

impl fmt::Display for Action {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Action::Tick => write!(f, "Tick"),
            Action::Resize(w, h) => write!(f, "Resize({}, {})", w, h),
            Action::ForceQuit => write!(f, "ForceQuit"),
            Action::NextField => write!(f, "NextField"),
            Action::PrevField => write!(f, "PrevField"),
            Action::FieldInput(c) => write!(f, "FieldInput('{}')", c),
            Action::FieldBackspace => write!(f, "FieldBackspace"),
            Action::ClearField => write!(f, "ClearField"),
            Action::NextOption => write!(f, "NextOption"),
            Action::PrevOption => write!(f, "PrevOption"),
            Action::Submit => write!(f, "Submit"),
            Action::CancelRequest => write!(f, "CancelRequest"),
            Action::CheckService => write!(f, "CheckService"),
            Action::ScrollUp => write!(f, "ScrollUp"),
            Action::ScrollDown => write!(f, "ScrollDown"),
            Action::PageUp => write!(f, "PageUp"),
            Action::PageDown => write!(f, "PageDown"),
            Action::ToggleBands => write!(f, "ToggleBands"),
            Action::OpenQuitDialog => write!(f, "OpenQuitDialog"),
            Action::OpenHelp => write!(f, "OpenHelp"),
            Action::CloseModal => write!(f, "CloseModal"),
        }
    }
}
