//! Configuration types for wizard definitions.
//!
//! This module contains the strongly-typed structures that are deserialized
//! from YAML wizard definition files.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::models::Step;

/// User-facing messages emitted by the wizard.
///
/// Every field falls back to the stock wording when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Messages {
    /// Shown when validation fails without a more specific message.
    pub validation_default: String,
    /// Shown when a hook fails without a user-facing message.
    pub unexpected_error: String,
    /// Shown when the finish handler succeeds.
    pub finish_success: String,
}

impl Default for Messages {
    fn default() -> Self {
        Self {
            validation_default: "Please correct errors".to_string(),
            unexpected_error: "An unexpected error has occurred".to_string(),
            finish_success: "Wizard Complete".to_string(),
        }
    }
}

/// Runtime settings for a wizard instance.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct WizardSettings {
    /// User-facing messages.
    pub messages: Messages,
}

/// A complete wizard definition.
///
/// ```yaml
/// title: Onboarding
/// extra_model:
///   source: web
/// settings:
///   messages:
///     finish_success: Welcome aboard!
/// steps:
///   - id: account
///     title: Create your account
///     kind: account-form
/// ```
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct WizardDefinition {
    /// The wizard title.
    pub title: String,
    /// Seed merged into every collation.
    #[serde(default = "empty_object")]
    pub extra_model: Value,
    /// Runtime settings.
    #[serde(default)]
    pub settings: WizardSettings,
    /// The steps, in navigation order.
    #[serde(default)]
    pub steps: Vec<Step>,
}

fn empty_object() -> Value {
    Value::Object(Map::new())
}
