//! Step registry loading.
//!
//! This module establishes a wizard's step set from an ordered sequence of
//! steps.

use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::debug;

use crate::error::{WizardError, WizardResult};
use crate::models::{Step, WizardState};

/// Replaces the step set of `state` with `steps`.
///
/// The input order becomes the navigation order and the first step becomes
/// current. If an id appears twice, it keeps its first position and the later
/// step definition wins. A non-object `extra_model` is replaced with `{}`.
///
/// # Errors
///
/// Returns [`WizardError::NoSteps`] when `steps` is empty; `state` is not
/// touched in that case and the caller decides whether that is fatal.
///
/// # Examples
///
/// ```
/// use wizard_engine::engine::load_steps;
/// use wizard_engine::models::{Step, WizardState};
/// use serde_json::json;
///
/// let state = WizardState::new();
/// let steps = vec![Step::new("a", "A"), Step::new("b", "B")];
/// let loaded = load_steps(&state, steps, json!({ "source": "web" })).unwrap();
///
/// assert_eq!(loaded.step_order, vec!["a", "b"]);
/// assert_eq!(loaded.current_step_id.as_deref(), Some("a"));
/// assert!(loaded.wizard_loaded);
/// ```
pub fn load_steps(
    state: &WizardState,
    steps: Vec<Step>,
    extra_model: Value,
) -> WizardResult<WizardState> {
    if steps.is_empty() {
        return Err(WizardError::NoSteps);
    }

    let mut step_order: Vec<String> = Vec::with_capacity(steps.len());
    let mut step_entities: HashMap<String, Step> = HashMap::with_capacity(steps.len());

    for step in steps {
        if step_entities.contains_key(&step.id) {
            debug!(step_id = %step.id, "Duplicate step id in load; keeping first position");
        } else {
            step_order.push(step.id.clone());
        }
        step_entities.insert(step.id.clone(), step);
    }

    let extra_model = match extra_model {
        Value::Object(map) => Value::Object(map),
        _ => Value::Object(Map::new()),
    };

    Ok(WizardState {
        current_step_id: step_order.first().cloned(),
        step_order,
        step_entities,
        loading: false,
        wizard_loaded: true,
        extra_model,
        ..state.clone()
    })
}
