//! The step-sequencing and model-collation engine.
//!
//! This module contains the pure state transitions behind a wizard:
//! loading the step registry, navigation, structural mutation of the step
//! set, and collation of visited step models into one result. Every
//! function takes a [`WizardState`](crate::models::WizardState) by reference
//! and returns a new one, leaving publishing to the [`Wizard`](crate::Wizard).

mod collation;
mod mutation;
mod navigation;
mod registry;

pub use collation::collate;
pub use mutation::{
    ModelUpdate, Relation, insert, insert_after, insert_before, insert_many, remove_by_filter,
    remove_by_id, update_model, update_models,
};
pub use navigation::{
    begin_load, begin_transition, check_validity, commit_and_move, finish_succeeded, load_failed,
    retreat, should_auto_finish, transition_failed,
};
pub use registry::load_steps;
