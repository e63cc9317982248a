//! Model collation.
//!
//! Folds the models of all visited steps into one aggregate object. The
//! walk follows the current step order, not the order steps were visited
//! in, so the result depends on the state alone.

use serde_json::{Map, Value};

use crate::models::{MergeMode, WizardState};

/// Builds the collated model for `state`.
///
/// Starts from a copy of `extra_model` and, for every visited step in
/// order:
/// - without an alias, shallow-merges the model's fields into the root;
/// - with [`MergeMode::Replace`], stores the model under the alias;
/// - with [`MergeMode::Array`], appends the model to the array under the alias;
/// - with [`MergeMode::Merge`], deep-merges the model into the object under
///   the alias, where `null` values never overwrite existing ones.
///
/// # Examples
///
/// ```
/// use wizard_engine::engine::collate;
/// use wizard_engine::models::{Step, WizardState};
/// use serde_json::json;
///
/// let mut state = WizardState::new();
/// let mut step = Step::new("name", "Name").with_model(json!({ "first": "Ada" }));
/// step.visited = true;
/// state.step_order.push(step.id.clone());
/// state.step_entities.insert(step.id.clone(), step);
///
/// assert_eq!(collate(&state), json!({ "first": "Ada" }));
/// ```
pub fn collate(state: &WizardState) -> Value {
    let mut result = match &state.extra_model {
        Value::Object(map) => map.clone(),
        _ => Map::new(),
    };

    for step in state.steps().filter(|step| step.visited) {
        match step.alias() {
            None => {
                if let Value::Object(fields) = &step.model {
                    for (key, value) in fields {
                        result.insert(key.clone(), value.clone());
                    }
                }
            }
            Some(alias) => match step.merge_mode {
                MergeMode::Replace => {
                    result.insert(alias.to_string(), step.model.clone());
                }
                MergeMode::Array => {
                    let collected = match result.remove(alias) {
                        Some(Value::Array(mut items)) => {
                            items.push(step.model.clone());
                            items
                        }
                        Some(Value::Null) | None => vec![step.model.clone()],
                        Some(existing) => vec![existing, step.model.clone()],
                    };
                    result.insert(alias.to_string(), Value::Array(collected));
                }
                MergeMode::Merge => {
                    let mut target = match result.remove(alias) {
                        Some(Value::Object(map)) => map,
                        _ => Map::new(),
                    };
                    if let Value::Object(fields) = &step.model {
                        merge_skipping_null(&mut target, fields);
                    }
                    result.insert(alias.to_string(), Value::Object(target));
                }
            },
        }
    }

    Value::Object(result)
}

/// Deep-merges `source` into `target`.
///
/// Nested objects merge recursively and nested arrays merge index by index.
/// A `null` in `source` keeps whatever `target` already holds; it is only
/// written when the key is new.
fn merge_skipping_null(target: &mut Map<String, Value>, source: &Map<String, Value>) {
    for (key, value) in source {
        match target.get_mut(key) {
            Some(existing) => merge_value(existing, value),
            None => {
                target.insert(key.clone(), value.clone());
            }
        }
    }
}

fn merge_value(target: &mut Value, source: &Value) {
    match (target, source) {
        (_, Value::Null) => {}
        (Value::Object(existing), Value::Object(incoming)) => {
            merge_skipping_null(existing, incoming);
        }
        (Value::Array(existing), Value::Array(incoming)) => {
            for (index, item) in incoming.iter().enumerate() {
                match existing.get_mut(index) {
                    Some(slot) => merge_value(slot, item),
                    None => existing.push(item.clone()),
                }
            }
        }
        (target, source) => *target = source.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Step;
    use serde_json::json;

    fn state_of(steps: Vec<Step>, extra_model: Value) -> WizardState {
        let mut state = WizardState::new();
        for step in steps {
            state.step_order.push(step.id.clone());
            state.step_entities.insert(step.id.clone(), step);
        }
        state.extra_model = extra_model;
        state
    }

    fn visited(id: &str, model: Value) -> Step {
        let mut step = Step::new(id, id).with_model(model);
        step.visited = true;
        step
    }

    #[test]
    fn test_starts_from_extra_model() {
        let state = state_of(vec![], json!({ "source": "web" }));
        assert_eq!(collate(&state), json!({ "source": "web" }));
    }

    #[test]
    fn test_unaliased_models_merge_into_root() {
        let state = state_of(
            vec![
                visited("1", json!({ "a": 1, "shared": "first" })),
                visited("2", json!({ "b": 2, "shared": "second" })),
            ],
            json!({}),
        );
        assert_eq!(collate(&state), json!({ "a": 1, "b": 2, "shared": "second" }));
    }

    #[test]
    fn test_unvisited_steps_are_excluded() {
        let state = state_of(
            vec![
                visited("A", json!({ "a": 1 })),
                Step::new("B", "B").with_model(json!({ "b": 2, "a": 99 })),
                visited("C", json!({ "c": 3 })),
            ],
            json!({}),
        );
        assert_eq!(collate(&state), json!({ "a": 1, "c": 3 }));
    }

    #[test]
    fn test_replace_alias_keeps_last_model() {
        let state = state_of(
            vec![
                visited("1", json!({ "x": 1 })).with_alias("thing", MergeMode::Replace),
                visited("2", json!({ "y": 2 })).with_alias("thing", MergeMode::Replace),
            ],
            json!({}),
        );
        assert_eq!(collate(&state), json!({ "thing": { "y": 2 } }));
    }

    #[test]
    fn test_array_alias_accumulates_in_order() {
        let state = state_of(
            vec![
                visited("1", json!({ "n": 1 })).with_alias("items", MergeMode::Array),
                visited("2", json!({ "n": 2 })).with_alias("items", MergeMode::Array),
            ],
            json!({}),
        );
        assert_eq!(collate(&state), json!({ "items": [{ "n": 1 }, { "n": 2 }] }));
    }

    #[test]
    fn test_array_alias_wraps_existing_scalar() {
        let state = state_of(
            vec![visited("1", json!({ "n": 1 })).with_alias("items", MergeMode::Array)],
            json!({ "items": "seed" }),
        );
        assert_eq!(collate(&state), json!({ "items": ["seed", { "n": 1 }] }));
    }

    #[test]
    fn test_merge_alias_null_never_erases() {
        let state = state_of(
            vec![
                visited("1", json!({ "first": true, "second": null }))
                    .with_alias("flags", MergeMode::Merge),
                visited("2", json!({ "first": false, "second": true }))
                    .with_alias("flags", MergeMode::Merge),
                visited("3", json!({ "first": null })).with_alias("flags", MergeMode::Merge),
            ],
            json!({}),
        );
        assert_eq!(
            collate(&state),
            json!({ "flags": { "first": false, "second": true } })
        );
    }

    #[test]
    fn test_merge_alias_is_deep() {
        let state = state_of(
            vec![
                visited("1", json!({ "address": { "street": "Main", "city": null } }))
                    .with_alias("contact", MergeMode::Merge),
                visited("2", json!({ "address": { "city": "Springfield" } }))
                    .with_alias("contact", MergeMode::Merge),
            ],
            json!({}),
        );
        assert_eq!(
            collate(&state),
            json!({ "contact": { "address": { "street": "Main", "city": "Springfield" } } })
        );
    }

    #[test]
    fn test_merge_alias_merges_nested_arrays_by_index() {
        let state = state_of(
            vec![
                visited("first", json!({ "tags": ["a", "b"], "slots": [{ "at": 9, "room": "A" }] }))
                    .with_alias("booking", MergeMode::Merge),
                visited("second", json!({ "tags": ["c"], "slots": [{ "at": 10 }, { "at": 11 }] }))
                    .with_alias("booking", MergeMode::Merge),
                visited("third", json!({ "tags": [null, "d"] }))
                    .with_alias("booking", MergeMode::Merge),
            ],
            json!({}),
        );

        assert_eq!(
            collate(&state),
            json!({
                "booking": {
                    "tags": ["c", "d"],
                    "slots": [{ "at": 10, "room": "A" }, { "at": 11 }]
                }
            })
        );
    }

    #[test]
    fn test_empty_alias_merges_into_root() {
        let mut step = visited("1", json!({ "a": 1 }));
        step.alias = Some(String::new());
        let state = state_of(vec![step], json!({}));
        assert_eq!(collate(&state), json!({ "a": 1 }));
    }

    #[test]
    fn test_collation_is_idempotent_and_pure() {
        let state = state_of(
            vec![
                visited("1", json!({ "n": 1 })).with_alias("items", MergeMode::Array),
                visited("2", json!({ "a": 1 })),
            ],
            json!({ "seed": true }),
        );
        let first = collate(&state);
        let second = collate(&state);
        assert_eq!(first, second);
        assert_eq!(state.extra_model, json!({ "seed": true }));
    }
}
