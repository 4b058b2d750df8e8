//! Request lifecycle status

/// Where the current submission stands
///
/// `Idle` is only the initial state. Every submit moves to `Pending`, and
/// every settlement moves to `Succeeded` or `Failed`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum RequestStatus {
    #[default]
    Idle,
    Pending,
    Succeeded,
    Failed(String),
}

impl RequestStatus {
    pub fn is_pending(&self) -> bool {
        matches!(self, RequestStatus::Pending)
    }

    /// Message for the error banner, if any
    pub fn error_message(&self) -> Option<&str> {
        match self {
            RequestStatus::Failed(message) => Some(message.as_str()),
            _ => None,
        }
    }

    pub fn status_icon(&self) -> &str {
        match self {
            RequestStatus::Idle => "·",
            RequestStatus::Pending => "⏳",
            RequestStatus::Succeeded => "✓",
            RequestStatus::Failed(_) => "✗",
        }
    }
}

/// Reachability of the prediction service, from its liveness route
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ServiceHealth {
    #[default]
    Unknown,
    Checking,
    Up(String),
    Down,
}

impl ServiceHealth {
    pub fn label(&self) -> &str {
        match self {
            ServiceHealth::Unknown => "unknown",
            ServiceHealth::Checking => "checking...",
            ServiceHealth::Up(message) => message.as_str(),
            ServiceHealth::Down => "unreachable",
        }
    }
}
