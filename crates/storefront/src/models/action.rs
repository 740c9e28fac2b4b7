//! Uniform results for form-submission actions.

use serde::Serialize;

/// Outcome of a form action.
///
/// Serializes as `{"status": "success"}`, `{"status": "success", "data": …}`
/// or `{"status": "error", "message": …}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum ActionResult<T> {
    Success {
        #[serde(skip_serializing_if = "Option::is_none")]
        data: Option<T>,
    },
    Error {
        message: String,
    },
}

impl<T> ActionResult<T> {
    /// A success carrying data.
    pub const fn success(data: T) -> Self {
        Self::Success { data: Some(data) }
    }

    /// A success with nothing to return.
    pub const fn done() -> Self {
        Self::Success { data: None }
    }

    /// A failure with a message safe to show to the shopper.
    pub fn error(message: impl Into<String>) -> Self {
        Self::Error {
            message: message.into(),
        }
    }
}

/// Severity of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Warning,
    Error,
}

/// A toast shown after a batch action.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub title: String,
    pub description: String,
}

/// Aggregate outcome of re-adding order lines to the cart.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReorderSummary {
    pub success_count: usize,
    pub error_count: usize,
    pub notification: Notification,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_action_result_shapes() {
        let done: ActionResult<()> = ActionResult::done();
        assert_eq!(serde_json::to_value(done).unwrap(), json!({"status": "success"}));

        let with_data = ActionResult::success(json!({"id": 3}));
        assert_eq!(
            serde_json::to_value(with_data).unwrap(),
            json!({"status": "success", "data": {"id": 3}})
        );

        let error: ActionResult<()> = ActionResult::error("Invalid email or password.");
        assert_eq!(
            serde_json::to_value(error).unwrap(),
            json!({"status": "error", "message": "Invalid email or password."})
        );
    }
}
