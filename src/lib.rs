//! Step-sequencing and model-collation engine for multi-step wizards.
//!
//! This crate keeps an ordered set of steps keyed by id, drives navigation
//! over them (advance, retreat, jump), supports inserting and removing steps
//! while the wizard runs, and collates the models of completed steps into
//! one result honoring alias, array and deep-merge policies. Rendering,
//! toasts and window handling stay with the host; the engine talks to it
//! through the traits in [`hooks`], [`notifications`] and [`renderer`].

#![warn(missing_docs)]

pub mod config;
pub mod engine;
pub mod error;
pub mod hooks;
pub mod models;
pub mod notifications;
pub mod renderer;
mod wizard;

pub use error::{HookError, WizardError, WizardResult};
pub use models::{FinishOutcome, MergeMode, ModelValidity, Notification, Step, WizardState};
pub use wizard::Wizard;
