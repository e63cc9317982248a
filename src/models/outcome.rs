//! Result types exchanged with the host UI.

use serde::{Deserialize, Serialize};

/// The result of checking a step model.
///
/// Mirrors the three answers a host can give: the model is fine, it is
/// wrong without explanation, or it is wrong with a message for the user.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModelValidity {
    /// The model is acceptable.
    #[default]
    Valid,
    /// The model is invalid; the step's default message applies.
    Invalid,
    /// The model is invalid with a user-facing reason.
    Message(String),
}

impl ModelValidity {
    /// Returns true only for [`ModelValidity::Valid`].
    pub fn is_valid(&self) -> bool {
        matches!(self, ModelValidity::Valid)
    }
}

impl From<bool> for ModelValidity {
    fn from(valid: bool) -> Self {
        if valid {
            ModelValidity::Valid
        } else {
            ModelValidity::Invalid
        }
    }
}

impl From<String> for ModelValidity {
    fn from(message: String) -> Self {
        ModelValidity::Message(message)
    }
}

impl From<&str> for ModelValidity {
    fn from(message: &str) -> Self {
        ModelValidity::Message(message.to_string())
    }
}

/// What the finish handler asks the host to do once the wizard completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum FinishOutcome {
    /// Keep the wizard open; it is not marked finished.
    KeepOpen,
    /// Navigate to the given location.
    Redirect(String),
    /// Close the wizard's window.
    Close,
}

impl FinishOutcome {
    /// Returns true when this outcome completes the wizard.
    pub fn finishes(&self) -> bool {
        !matches!(self, FinishOutcome::KeepOpen)
    }

    /// Returns the redirect target, if any.
    pub fn redirect_target(&self) -> Option<&str> {
        match self {
            FinishOutcome::Redirect(target) => Some(target),
            _ => None,
        }
    }
}

impl From<bool> for FinishOutcome {
    fn from(close: bool) -> Self {
        if close {
            FinishOutcome::Close
        } else {
            FinishOutcome::KeepOpen
        }
    }
}

impl From<()> for FinishOutcome {
    fn from(_: ()) -> Self {
        FinishOutcome::Close
    }
}

impl From<String> for FinishOutcome {
    fn from(target: String) -> Self {
        FinishOutcome::Redirect(target)
    }
}

/// A semantic event for the presentation layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "snake_case")]
pub enum Notification {
    /// Show an error message.
    Error(String),
    /// Show a success message.
    Success(String),
    /// Dismiss anything currently shown.
    Clear,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_model_validity_from_bool_and_str() {
        assert_eq!(ModelValidity::from(true), ModelValidity::Valid);
        assert_eq!(ModelValidity::from(false), ModelValidity::Invalid);
        assert_eq!(
            ModelValidity::from("Too short"),
            ModelValidity::Message("Too short".to_string())
        );
        assert!(!ModelValidity::from("Too short").is_valid());
    }

    #[test]
    fn test_finish_outcome_tri_state() {
        assert_eq!(FinishOutcome::from(false), FinishOutcome::KeepOpen);
        assert_eq!(FinishOutcome::from(true), FinishOutcome::Close);
        assert_eq!(FinishOutcome::from(()), FinishOutcome::Close);
        assert_eq!(
            FinishOutcome::from("/done".to_string()).redirect_target(),
            Some("/done")
        );
        assert!(!FinishOutcome::KeepOpen.finishes());
        assert!(FinishOutcome::Close.finishes());
    }

    #[test]
    fn test_notification_serialization() {
        let json = serde_json::to_value(Notification::Error("Nope".to_string())).unwrap();
        assert_eq!(json, serde_json::json!({ "type": "error", "message": "Nope" }));
    }
}
