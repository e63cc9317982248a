//! Wizard state model.
//!
//! [`WizardState`] is the single source of truth for one wizard instance.
//! Its fields form the serialization contract for hosts that want to resume
//! a wizard; step behavior is not part of it.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::Step;

/// The complete state of one wizard instance.
///
/// Transitions never edit a published state in place; they build a new
/// `WizardState` and hand it to the [`Wizard`](crate::Wizard) for publishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WizardState {
    /// The wizard title.
    pub title: Option<String>,
    /// True while a load or navigation transition is in flight.
    pub loading: bool,
    /// True once the initial step set has been established.
    pub wizard_loaded: bool,
    /// Every known step, keyed by id.
    pub step_entities: HashMap<String, Step>,
    /// Navigation order of step ids.
    pub step_order: Vec<String>,
    /// The step the user is on.
    pub current_step_id: Option<String>,
    /// Terminal flag set by a closing finish.
    pub finished: bool,
    /// When the wizard finished.
    #[serde(default)]
    pub finished_at: Option<DateTime<Utc>>,
    /// Caller-supplied seed merged into every collation.
    pub extra_model: Value,
}

impl Default for WizardState {
    fn default() -> Self {
        Self {
            title: None,
            loading: false,
            wizard_loaded: false,
            step_entities: HashMap::new(),
            step_order: Vec::new(),
            current_step_id: None,
            finished: false,
            finished_at: None,
            extra_model: Value::Object(Map::new()),
        }
    }
}

impl WizardState {
    /// Creates an empty, unloaded state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up a step by id.
    pub fn step(&self, id: &str) -> Option<&Step> {
        self.step_entities.get(id)
    }

    /// Returns the steps in navigation order.
    pub fn steps(&self) -> impl Iterator<Item = &Step> + '_ {
        self.step_order
            .iter()
            .filter_map(|id| self.step_entities.get(id))
    }

    /// Returns true if `id` is part of the navigation order.
    pub fn contains(&self, id: &str) -> bool {
        self.step_order.iter().any(|existing| existing == id)
    }

    /// Returns the position of `id` in the navigation order.
    pub fn position(&self, id: &str) -> Option<usize> {
        self.step_order.iter().position(|existing| existing == id)
    }

    /// Returns the number of steps in the navigation order.
    pub fn step_count(&self) -> usize {
        self.step_order.len()
    }

    /// Returns the current step, if any.
    pub fn current_step(&self) -> Option<&Step> {
        self.current_step_id
            .as_deref()
            .and_then(|id| self.step_entities.get(id))
    }

    /// Returns the current step's model.
    pub fn current_step_model(&self) -> Option<&Value> {
        self.current_step().map(|step| &step.model)
    }

    /// Returns the current step's title.
    pub fn current_step_title(&self) -> Option<&str> {
        self.current_step().map(|step| step.title.as_str())
    }

    /// Returns the 1-based position of the current step, or 0 when there is
    /// no current step.
    pub fn current_step_number(&self) -> usize {
        self.current_position().map_or(0, |position| position + 1)
    }

    pub(crate) fn current_position(&self) -> Option<usize> {
        self.current_step_id
            .as_deref()
            .and_then(|id| self.position(id))
    }

    /// Returns true when the current step is first in order.
    pub fn is_first_step(&self) -> bool {
        self.current_position() == Some(0)
    }

    /// Returns true when the current step is last in order.
    pub fn is_last_step(&self) -> bool {
        self.current_step_number() == self.step_count()
    }

    /// True while the initial load is in flight.
    pub fn is_wizard_loading(&self) -> bool {
        !self.wizard_loaded && self.loading
    }

    /// True while a step transition is in flight.
    pub fn is_step_loading(&self) -> bool {
        self.wizard_loaded && self.loading
    }
}
