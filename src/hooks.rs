//! Asynchronous collaborator interfaces.
//!
//! The engine awaits external work at exactly three points: resolving the
//! step list during a load, running a step's advance hook, and handing the
//! collated model to the finish handler. Each point is a trait here, and
//! any closure returning a matching future implements it.

use std::future::Future;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::HookError;
use crate::models::{FinishOutcome, Step};

/// Produces the ordered step list when none is supplied directly.
#[async_trait]
pub trait StepResolver: Send + Sync {
    /// Resolves the steps for the wizard.
    async fn resolve(&self) -> Result<Vec<Step>, HookError>;
}

#[async_trait]
impl<F, Fut> StepResolver for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Vec<Step>, HookError>> + Send + 'static,
{
    async fn resolve(&self) -> Result<Vec<Step>, HookError> {
        (self)().await
    }
}

/// A side effect run before leaving a step.
///
/// Only success or failure matters; a failure keeps the wizard on the
/// current step.
#[async_trait]
pub trait AdvanceHook: Send + Sync {
    /// Runs the side effect.
    async fn run(&self) -> Result<(), HookError>;
}

#[async_trait]
impl<F, Fut> AdvanceHook for F
where
    F: Fn() -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HookError>> + Send + 'static,
{
    async fn run(&self) -> Result<(), HookError> {
        (self)().await
    }
}

/// Receives the collated model when the wizard completes.
///
/// The returned [`FinishOutcome`] tells the host whether to keep the wizard
/// open, redirect, or close it. An error is shown to the user and leaves the
/// wizard unfinished.
#[async_trait]
pub trait FinishHandler: Send + Sync {
    /// Handles the collated model.
    async fn finish(&self, collated_model: Value) -> Result<FinishOutcome, HookError>;
}

#[async_trait]
impl<F, Fut> FinishHandler for F
where
    F: Fn(Value) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<FinishOutcome, HookError>> + Send + 'static,
{
    async fn finish(&self, collated_model: Value) -> Result<FinishOutcome, HookError> {
        (self)(collated_model).await
    }
}
