//! Core data models for the Wizard Engine.
//!
//! This module contains all the domain models used throughout the engine.

mod outcome;
mod state;
mod step;

pub use outcome::{FinishOutcome, ModelValidity, Notification};
pub use state::WizardState;
pub use step::{MergeMode, Step};
