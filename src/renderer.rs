//! Step renderer lookup.
//!
//! Hosts register one [`StepRenderer`] per step kind. The wizard resolves
//! the current step's renderer through the [`RendererRegistry`] by the
//! step's `kind` tag to find out how to validate its model and which hooks
//! to run when the user leaves it.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;

use crate::hooks::AdvanceHook;
use crate::models::{ModelValidity, Step};

/// Per-kind step behavior supplied by the host UI.
pub trait StepRenderer: Send + Sync {
    /// Checks the model the user is about to commit.
    fn is_model_valid(&self, _model: &Value) -> ModelValidity {
        ModelValidity::Valid
    }

    /// Returns the hook to run before advancing past the step.
    fn on_advance(&self, _model: &Value) -> Option<Arc<dyn AdvanceHook>> {
        None
    }

    /// Returns the hook to run before going back from the step.
    fn on_retreat(&self) -> Option<Arc<dyn AdvanceHook>> {
        None
    }
}

/// Lookup table from step kind to renderer.
#[derive(Clone, Default)]
pub struct RendererRegistry {
    renderers: HashMap<String, Arc<dyn StepRenderer>>,
}

impl fmt::Debug for RendererRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut kinds: Vec<&String> = self.renderers.keys().collect();
        kinds.sort();
        f.debug_struct("RendererRegistry").field("kinds", &kinds).finish()
    }
}

impl RendererRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `renderer` for `kind`, replacing any previous one.
    pub fn register<R>(&mut self, kind: impl Into<String>, renderer: R) -> &mut Self
    where
        R: StepRenderer + 'static,
    {
        self.renderers.insert(kind.into(), Arc::new(renderer));
        self
    }

    /// Returns the renderer registered for `kind`.
    pub fn get(&self, kind: &str) -> Option<Arc<dyn StepRenderer>> {
        self.renderers.get(kind).cloned()
    }

    /// Returns the renderer for `step`, if it has a kind with a registration.
    pub fn resolve(&self, step: &Step) -> Option<Arc<dyn StepRenderer>> {
        step.kind.as_deref().and_then(|kind| self.get(kind))
    }

    /// Returns true when `kind` has a renderer.
    pub fn contains(&self, kind: &str) -> bool {
        self.renderers.contains_key(kind)
    }

    /// Returns the number of registered kinds.
    pub fn len(&self) -> usize {
        self.renderers.len()
    }

    /// Returns true when nothing is registered.
    pub fn is_empty(&self) -> bool {
        self.renderers.is_empty()
    }
}
