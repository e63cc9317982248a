//! Structural edits to a wizard's step set.
//!
//! Every function here takes the current state and returns `Some(next)`
//! when the edit changes something, or `None` when it is a no-op. A no-op
//! is never an error: inserting an id that is already ordered, or removing
//! one that is not, simply leaves the published state untouched.

use serde_json::Value;
use tracing::debug;

use crate::models::{Step, WizardState};

/// Where a block of steps goes relative to its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Relation {
    /// Immediately before the anchor.
    Before,
    /// Immediately after the anchor.
    #[default]
    After,
}

/// A model replacement for one step.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelUpdate {
    /// The step to update.
    pub id: String,
    /// The new model.
    pub model: Value,
}

impl ModelUpdate {
    /// Creates a model update.
    pub fn new(id: impl Into<String>, model: Value) -> Self {
        Self {
            id: id.into(),
            model,
        }
    }
}

/// Appends `step` to the end of the order.
pub fn insert(state: &WizardState, step: Step) -> Option<WizardState> {
    insert_many(state, vec![step], None, Relation::After)
}

/// Inserts `step` immediately before `anchor`, or at the end if `anchor`
/// is not ordered.
///
/// # Examples
///
/// ```
/// use wizard_engine::engine::{insert_before, load_steps};
/// use wizard_engine::models::{Step, WizardState};
/// use serde_json::json;
///
/// let state = load_steps(&WizardState::new(), vec![Step::new("a", "A"), Step::new("c", "C")], json!({})).unwrap();
/// let next = insert_before(&state, Step::new("b", "B"), "c").unwrap();
/// assert_eq!(next.step_order, vec!["a", "b", "c"]);
///
/// // Same id again: no-op.
/// assert!(insert_before(&next, Step::new("b", "B"), "a").is_none());
/// ```
pub fn insert_before(state: &WizardState, step: Step, anchor: &str) -> Option<WizardState> {
    insert_many(state, vec![step], Some(anchor), Relation::Before)
}

/// Inserts `step` immediately after `anchor`, or at the end if `anchor`
/// is not ordered.
pub fn insert_after(state: &WizardState, step: Step, anchor: &str) -> Option<WizardState> {
    insert_many(state, vec![step], Some(anchor), Relation::After)
}

/// Inserts `steps` as one contiguous block, preserving their relative order.
///
/// Steps whose id is already ordered, or that repeat an id earlier in the
/// block, are skipped. Without an anchor, or with an anchor that is not
/// ordered, the block is appended.
pub fn insert_many(
    state: &WizardState,
    steps: Vec<Step>,
    anchor: Option<&str>,
    relation: Relation,
) -> Option<WizardState> {
    let mut block: Vec<Step> = Vec::with_capacity(steps.len());
    for step in steps {
        if state.contains(&step.id) || block.iter().any(|queued| queued.id == step.id) {
            debug!(step_id = %step.id, "Skipping insert of already present step");
            continue;
        }
        block.push(step);
    }

    if block.is_empty() {
        return None;
    }

    let insert_at = anchor
        .and_then(|anchor| state.position(anchor))
        .map(|index| match relation {
            Relation::Before => index,
            Relation::After => index + 1,
        })
        .unwrap_or(state.step_order.len());

    let mut next = state.clone();
    let ids: Vec<String> = block.iter().map(|step| step.id.clone()).collect();
    next.step_order.splice(insert_at..insert_at, ids);
    for step in block {
        next.step_entities.insert(step.id.clone(), step);
    }

    Some(next)
}

/// Removes the step with `id` from both the entities and the order.
pub fn remove_by_id(state: &WizardState, id: &str) -> Option<WizardState> {
    remove_by_filter(state, |step| step.id == id)
}

/// Removes every ordered step matching `predicate`.
///
/// The remaining steps keep their relative order. If the current step is
/// removed, the step that now occupies its position becomes current (the
/// new last step if it was at the end).
pub fn remove_by_filter<F>(state: &WizardState, mut predicate: F) -> Option<WizardState>
where
    F: FnMut(&Step) -> bool,
{
    let to_remove: Vec<&String> = state
        .step_order
        .iter()
        .filter(|id| state.step_entities.get(*id).is_some_and(&mut predicate))
        .collect();

    if to_remove.is_empty() {
        return None;
    }

    let step_order: Vec<String> = state
        .step_order
        .iter()
        .filter(|id| !to_remove.contains(id))
        .cloned()
        .collect();

    let mut step_entities = state.step_entities.clone();
    for id in &to_remove {
        step_entities.remove(*id);
    }

    let current_step_id = rehome_current(state, &step_order);

    Some(WizardState {
        step_order,
        step_entities,
        current_step_id,
        ..state.clone()
    })
}

fn rehome_current(state: &WizardState, step_order: &[String]) -> Option<String> {
    let current = state.current_step_id.as_ref()?;
    if step_order.contains(current) {
        return Some(current.clone());
    }

    let old_position = state.position(current)?;
    let survivors_before = state.step_order[..old_position]
        .iter()
        .filter(|id| step_order.contains(*id))
        .count();

    step_order
        .get(survivors_before)
        .or_else(|| step_order.last())
        .cloned()
}

/// Replaces the model of step `id` without touching its visited flag.
pub fn update_model(state: &WizardState, id: &str, model: Value) -> Option<WizardState> {
    update_models(state, vec![ModelUpdate::new(id, model)])
}

/// Replaces the models of several steps; unknown ids are skipped.
pub fn update_models(state: &WizardState, updates: Vec<ModelUpdate>) -> Option<WizardState> {
    if !updates
        .iter()
        .any(|update| state.step_entities.contains_key(&update.id))
    {
        return None;
    }

    let mut next = state.clone();
    for ModelUpdate { id, model } in updates {
        match next.step_entities.get_mut(&id) {
            Some(step) => step.model = model,
            None => debug!(step_id = %id, "Skipping model update for unknown step"),
        }
    }

    Some(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::load_steps;
    use serde_json::json;

    fn state_with(ids: &[&str]) -> WizardState {
        let steps = ids.iter().map(|id| Step::new(*id, format!("Step {id}"))).collect();
        load_steps(&WizardState::new(), steps, json!({})).unwrap()
    }

    #[test]
    fn test_insert_appends() {
        let state = state_with(&["existingStep"]);
        let next = insert(&state, Step::new("newStep", "New Step")).unwrap();

        assert_eq!(next.step_order, vec!["existingStep", "newStep"]);
        assert!(next.step("newStep").is_some());
    }

    #[test]
    fn test_insert_existing_id_is_noop() {
        let state = state_with(&["a", "b"]);
        assert!(insert(&state, Step::new("a", "Again")).is_none());
    }

    #[test]
    fn test_insert_before_middle() {
        let state = state_with(&["existingStep1", "existingStep2"]);
        let next = insert_before(&state, Step::new("newStep", "New"), "existingStep2").unwrap();
        assert_eq!(next.step_order, vec!["existingStep1", "newStep", "existingStep2"]);
    }

    #[test]
    fn test_insert_before_start() {
        let state = state_with(&["existingStep"]);
        let next = insert_before(&state, Step::new("newStep", "New"), "existingStep").unwrap();
        assert_eq!(next.step_order, vec!["newStep", "existingStep"]);
    }

    #[test]
    fn test_insert_before_missing_anchor_appends() {
        let state = state_with(&["existingStep"]);
        let next = insert_before(&state, Step::new("newStep", "New"), "nonExistentStep").unwrap();
        assert_eq!(next.step_order, vec!["existingStep", "newStep"]);
    }

    #[test]
    fn test_insert_after_first_and_last() {
        let state = state_with(&["existingStep1", "existingStep2"]);

        let after_first = insert_after(&state, Step::new("newStep", "New"), "existingStep1").unwrap();
        assert_eq!(after_first.step_order, vec!["existingStep1", "newStep", "existingStep2"]);

        let after_last = insert_after(&state, Step::new("newStep", "New"), "existingStep2").unwrap();
        assert_eq!(after_last.step_order, vec!["existingStep1", "existingStep2", "newStep"]);

        let missing = insert_after(&state, Step::new("newStep", "New"), "existingStepFoo").unwrap();
        assert_eq!(missing.step_order, vec!["existingStep1", "existingStep2", "newStep"]);
    }

    #[test]
    fn test_insert_many_keeps_block_order() {
        let state = state_with(&["a", "d"]);
        let next = insert_many(
            &state,
            vec![Step::new("b", "B"), Step::new("c", "C")],
            Some("d"),
            Relation::Before,
        )
        .unwrap();
        assert_eq!(next.step_order, vec!["a", "b", "c", "d"]);
    }

    #[test]
    fn test_insert_many_skips_present_and_repeated_ids() {
        let state = state_with(&["a"]);
        let next = insert_many(
            &state,
            vec![Step::new("a", "A"), Step::new("b", "B"), Step::new("b", "B again")],
            Some("a"),
            Relation::After,
        )
        .unwrap();
        assert_eq!(next.step_order, vec!["a", "b"]);
        assert_eq!(next.step("b").unwrap().title, "B");
    }

    #[test]
    fn test_insert_many_all_present_is_noop() {
        let state = state_with(&["a", "b"]);
        let result = insert_many(&state, vec![Step::new("b", "B")], None, Relation::After);
        assert!(result.is_none());
    }

    #[test]
    fn test_remove_by_id() {
        let state = state_with(&["existingStep1", "existingStep2"]);
        let next = remove_by_id(&state, "existingStep2").unwrap();

        assert_eq!(next.step_order, vec!["existingStep1"]);
        assert!(next.step("existingStep2").is_none());
    }

    #[test]
    fn test_remove_missing_id_is_noop() {
        let state = state_with(&["existingStep1"]);
        assert!(remove_by_id(&state, "nonExistentStep").is_none());
    }

    #[test]
    fn test_remove_by_filter_two_of_three() {
        let state = state_with(&["existingStep1", "existingStep2", "existingStep3"]);
        let next = remove_by_filter(&state, |step| {
            step.id == "existingStep1" || step.id == "existingStep2"
        })
        .unwrap();

        assert_eq!(next.step_order, vec!["existingStep3"]);
        assert!(next.step("existingStep1").is_none());
        assert!(next.step("existingStep2").is_none());
    }

    #[test]
    fn test_remove_by_filter_no_match_is_noop() {
        let state = state_with(&["a", "b"]);
        assert!(remove_by_filter(&state, |_| false).is_none());
    }

    #[test]
    fn test_removing_current_step_moves_to_successor() {
        let mut state = state_with(&["a", "b", "c"]);
        state.current_step_id = Some("b".to_string());

        let next = remove_by_id(&state, "b").unwrap();
        assert_eq!(next.current_step_id.as_deref(), Some("c"));
    }

    #[test]
    fn test_removing_current_last_step_moves_to_new_last() {
        let mut state = state_with(&["a", "b", "c"]);
        state.current_step_id = Some("c".to_string());

        let next = remove_by_filter(&state, |step| step.id != "a").unwrap();
        assert_eq!(next.current_step_id.as_deref(), Some("a"));
    }

    #[test]
    fn test_removing_every_step_clears_current() {
        let state = state_with(&["a"]);
        let next = remove_by_id(&state, "a").unwrap();
        assert!(next.current_step_id.is_none());
    }

    #[test]
    fn test_update_model_keeps_visited() {
        let mut state = state_with(&["a"]);
        state.step_entities.get_mut("a").unwrap().visited = true;

        let next = update_model(&state, "a", json!({ "name": "Ada" })).unwrap();
        let step = next.step("a").unwrap();
        assert_eq!(step.model, json!({ "name": "Ada" }));
        assert!(step.visited);
    }

    #[test]
    fn test_update_model_unknown_is_noop() {
        let state = state_with(&["a"]);
        assert!(update_model(&state, "zzz", json!({})).is_none());
    }

    #[test]
    fn test_update_models_skips_unknown_ids() {
        let state = state_with(&["a", "b"]);
        let next = update_models(
            &state,
            vec![
                ModelUpdate::new("a", json!({ "x": 1 })),
                ModelUpdate::new("missing", json!({ "y": 2 })),
                ModelUpdate::new("b", json!({ "z": 3 })),
            ],
        )
        .unwrap();

        assert_eq!(next.step("a").unwrap().model, json!({ "x": 1 }));
        assert_eq!(next.step("b").unwrap().model, json!({ "z": 3 }));
        assert!(next.step("missing").is_none());
    }

    #[test]
    fn test_update_models_empty_is_noop() {
        let state = state_with(&["a"]);
        assert!(update_models(&state, vec![]).is_none());
    }
}
