//! Step model and related types.
//!
//! This module defines the [`Step`] struct and the [`MergeMode`] policy that
//! controls how a step's model lands in the collated result.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// How repeated contributions to the same alias combine during collation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MergeMode {
    /// The alias holds the model of the last visited step using it.
    #[default]
    Replace,
    /// Models are deep-merged field by field; `null` never erases a value.
    Merge,
    /// Models are appended to an array under the alias.
    Array,
}

/// A named unit of work in a wizard.
///
/// Steps are plain data so the whole wizard state stays serializable. The
/// behavior attached to a step (validation, advance hooks) is looked up by
/// its [`kind`](Step::kind) in a [`RendererRegistry`](crate::renderer::RendererRegistry).
///
/// # Example
///
/// ```
/// use wizard_engine::models::{MergeMode, Step};
/// use serde_json::json;
///
/// let step = Step::new("address", "Your address")
///     .with_model(json!({ "street": null }))
///     .with_alias("contact", MergeMode::Merge);
///
/// assert_eq!(step.alias(), Some("contact"));
/// assert!(!step.visited);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Step {
    /// Unique identifier within a wizard instance.
    pub id: String,
    /// The title shown to the user.
    pub title: String,
    /// Step-owned data, edited by the host UI.
    #[serde(default = "empty_model")]
    pub model: Value,
    /// True once the step has been committed by an advance or a jump.
    #[serde(default)]
    pub visited: bool,
    /// Key under which the model nests in the collated result.
    #[serde(default)]
    pub alias: Option<String>,
    /// How models sharing an alias are combined.
    #[serde(default)]
    pub merge_mode: MergeMode,
    /// Renderer tag used to resolve the step's behavior.
    #[serde(default)]
    pub kind: Option<String>,
    /// Message shown when the step's model check returns a plain `false`.
    #[serde(default)]
    pub error_message: Option<String>,
}

fn empty_model() -> Value {
    Value::Object(serde_json::Map::new())
}

impl Step {
    /// Creates an unvisited step with an empty object model.
    pub fn new(id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            model: empty_model(),
            visited: false,
            alias: None,
            merge_mode: MergeMode::default(),
            kind: None,
            error_message: None,
        }
    }

    /// Sets the initial model.
    pub fn with_model(mut self, model: Value) -> Self {
        self.model = model;
        self
    }

    /// Nests the model under `alias` using the given merge policy.
    pub fn with_alias(mut self, alias: impl Into<String>, merge_mode: MergeMode) -> Self {
        self.alias = Some(alias.into());
        self.merge_mode = merge_mode;
        self
    }

    /// Sets the renderer tag.
    pub fn with_kind(mut self, kind: impl Into<String>) -> Self {
        self.kind = Some(kind.into());
        self
    }

    /// Sets the step's default validation message.
    pub fn with_error_message(mut self, message: impl Into<String>) -> Self {
        self.error_message = Some(message.into());
        self
    }

    /// Returns the alias, treating an empty string as no alias.
    pub fn alias(&self) -> Option<&str> {
        self.alias.as_deref().filter(|alias| !alias.is_empty())
    }
}
