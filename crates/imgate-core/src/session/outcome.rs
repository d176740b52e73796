use serde::Serialize;

/// Result of a best-effort outbound action.
///
/// Sessions log failures and carry on; the outcome lets callers and tests see
/// what happened without scraping logs.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", content = "detail", rename_all = "snake_case")]
pub enum SendOutcome {
    /// The legacy client accepted the action
    Delivered,
    /// Nothing was sent
    Skipped(SkipReason),
    /// The legacy client reported a failure
    Failed(String),
}

/// Why an outbound action was not attempted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum SkipReason {
    /// No legacy client is attached to the session
    NotConnected,
    /// Operator configuration disables the action
    Disabled,
    /// Status text was absent or empty
    EmptyStatus,
}

impl SendOutcome {
    pub fn is_delivered(&self) -> bool {
        matches!(self, Self::Delivered)
    }

    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}
