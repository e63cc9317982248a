//! Navigation transitions.
//!
//! Pure functions that compute the next [`WizardState`] for each step of
//! the navigation state machine. The async [`Wizard`](crate::Wizard) driver
//! decides when to apply them; nothing here awaits or publishes.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::models::{FinishOutcome, ModelValidity, WizardState};

/// Marks the start of a load and records the wizard title.
pub fn begin_load(state: &WizardState, title: impl Into<String>) -> WizardState {
    WizardState {
        title: Some(title.into()),
        loading: true,
        ..state.clone()
    }
}

/// Records a failed load.
pub fn load_failed(state: &WizardState) -> WizardState {
    WizardState {
        loading: false,
        wizard_loaded: false,
        ..state.clone()
    }
}

/// Marks a navigation transition (advance, retreat, finish) as in flight.
pub fn begin_transition(state: &WizardState) -> WizardState {
    WizardState {
        loading: true,
        ..state.clone()
    }
}

/// Returns the state to the ready position after a failed transition.
pub fn transition_failed(state: &WizardState) -> WizardState {
    WizardState {
        loading: false,
        ..state.clone()
    }
}

/// Combines form and model validity into a single verdict.
///
/// The step is valid only when the form is valid and the model check
/// returned [`ModelValidity::Valid`]. On failure the message is, in order of
/// preference: the model check's own message, the step's default message
/// (only when the form was fine and the model check said `false`), or
/// `default_message`.
///
/// # Examples
///
/// ```
/// use wizard_engine::engine::check_validity;
/// use wizard_engine::models::ModelValidity;
///
/// assert!(check_validity(true, &ModelValidity::Valid, None, "Please correct errors").is_ok());
/// assert_eq!(
///     check_validity(true, &"Too young".into(), None, "Please correct errors"),
///     Err("Too young".to_string())
/// );
/// assert_eq!(
///     check_validity(false, &ModelValidity::Valid, None, "Please correct errors"),
///     Err("Please correct errors".to_string())
/// );
/// ```
pub fn check_validity(
    form_valid: bool,
    model_valid: &ModelValidity,
    step_message: Option<&str>,
    default_message: &str,
) -> Result<(), String> {
    match (form_valid, model_valid) {
        (true, ModelValidity::Valid) => Ok(()),
        (true, ModelValidity::Message(message)) => Err(message.clone()),
        (true, ModelValidity::Invalid) => {
            Err(step_message.unwrap_or(default_message).to_string())
        }
        (false, _) => Err(default_message.to_string()),
    }
}

/// Commits `model` to the current step and moves forward.
///
/// The current step gets `model` and is marked visited. The new current step
/// is `target` when it is part of the order; otherwise the successor of the
/// current step, staying put on the last step. With no current step the
/// wizard moves to the first step. This is the success path of both advance
/// and go-to.
pub fn commit_and_move(state: &WizardState, model: Value, target: Option<&str>) -> WizardState {
    let mut next = state.clone();

    if let Some(step) = state
        .current_step_id
        .as_deref()
        .and_then(|id| next.step_entities.get_mut(id))
    {
        step.model = model;
        step.visited = true;
    }

    next.current_step_id = match target.filter(|id| state.contains(id)) {
        Some(id) => Some(id.to_string()),
        None => successor(state),
    };
    next.loading = false;
    next
}

fn successor(state: &WizardState) -> Option<String> {
    match state.current_position() {
        Some(position) if position + 1 >= state.step_order.len() => state.current_step_id.clone(),
        Some(position) => state.step_order.get(position + 1).cloned(),
        None => state.step_order.first().cloned(),
    }
}

/// Moves to the previous step.
///
/// Returns `None` when there is nothing to go back to: the current step is
/// first, or there is no current step. The departing step's model is not
/// stored and it is not marked visited.
pub fn retreat(state: &WizardState) -> Option<WizardState> {
    let position = state.current_position()?;
    if position == 0 {
        return None;
    }

    Some(WizardState {
        current_step_id: state.step_order.get(position - 1).cloned(),
        loading: false,
        ..state.clone()
    })
}

/// Returns true when an advance has landed back on a last step that has
/// already been completed.
///
/// First arrival at the last step does not count; the step has to have been
/// committed before (for example by advancing on it).
pub fn should_auto_finish(state: &WizardState) -> bool {
    state.is_last_step() && state.current_step().is_some_and(|step| step.visited)
}

/// Applies the outcome of a successful finish handler.
///
/// [`FinishOutcome::KeepOpen`] only clears `loading`; any other outcome
/// marks the wizard finished, clears the current step and stamps `at`.
pub fn finish_succeeded(
    state: &WizardState,
    outcome: &FinishOutcome,
    at: DateTime<Utc>,
) -> WizardState {
    if !outcome.finishes() {
        return WizardState {
            loading: false,
            ..state.clone()
        };
    }

    WizardState {
        loading: false,
        finished: true,
        finished_at: Some(at),
        current_step_id: None,
        ..state.clone()
    }
}
