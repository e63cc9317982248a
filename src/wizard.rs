//! The wizard driver.
//!
//! [`Wizard`] owns one [`WizardState`] and runs the navigation state
//! machine over it. Every transition is computed by the pure functions in
//! [`engine`](crate::engine) and published as a fresh `Arc<WizardState>`
//! snapshot on a `tokio::sync::watch` channel, so observers never see a
//! half-applied change. The only suspension points are the collaborator
//! hooks: the step resolver, advance/retreat hooks and the finish handler.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use chrono::Utc;
use serde_json::Value;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::{WizardDefinition, WizardSettings};
use crate::engine::{self, ModelUpdate, Relation};
use crate::error::{WizardError, WizardResult};
use crate::hooks::{AdvanceHook, FinishHandler, StepResolver};
use crate::models::{FinishOutcome, ModelValidity, Step, WizardState};
use crate::notifications::{NotificationSink, NullSink};
use crate::renderer::RendererRegistry;

/// A live wizard instance.
///
/// The wizard has a single logical owner. `loading` on the published state
/// is advisory: hosts should not dispatch a new navigation while it is set.
/// Methods take `&self`, so the instance can sit in an `Arc` and be
/// [disposed](Wizard::dispose) from elsewhere while an operation is waiting
/// on a hook; the late result is then discarded.
///
/// # Example
///
/// ```
/// use wizard_engine::{FinishOutcome, HookError, Step, Wizard};
/// use serde_json::{json, Value};
///
/// # #[tokio::main]
/// # async fn main() {
/// let wizard = Wizard::new(|_model: Value| async { Ok::<_, HookError>(FinishOutcome::KeepOpen) });
///
/// wizard
///     .load_wizard("Signup", vec![Step::new("s1", "Name"), Step::new("s2", "Email")], None, json!({}))
///     .await
///     .unwrap();
/// wizard.advance(json!({ "name": "Ada" }), true, true.into(), None).await.unwrap();
///
/// assert_eq!(wizard.state().current_step_id.as_deref(), Some("s2"));
/// assert_eq!(wizard.collated_model(), json!({ "name": "Ada" }));
/// # }
/// ```
pub struct Wizard {
    instance_id: Uuid,
    state: watch::Sender<Arc<WizardState>>,
    version: AtomicU64,
    disposed: AtomicBool,
    finish_handler: Arc<dyn FinishHandler>,
    notifications: Arc<dyn NotificationSink>,
    renderers: RendererRegistry,
    settings: WizardSettings,
}

impl Wizard {
    /// Creates an empty wizard that reports completion to `finish_handler`.
    pub fn new<H>(finish_handler: H) -> Self
    where
        H: FinishHandler + 'static,
    {
        let (state, _) = watch::channel(Arc::new(WizardState::new()));
        Self {
            instance_id: Uuid::new_v4(),
            state,
            version: AtomicU64::new(0),
            disposed: AtomicBool::new(false),
            finish_handler: Arc::new(finish_handler),
            notifications: Arc::new(NullSink),
            renderers: RendererRegistry::new(),
            settings: WizardSettings::default(),
        }
    }

    /// Creates an empty wizard that uses the settings of `definition`.
    ///
    /// The steps are not loaded yet; call
    /// [`load_definition`](Wizard::load_definition) with the same definition.
    pub fn for_definition<H>(finish_handler: H, definition: &WizardDefinition) -> Self
    where
        H: FinishHandler + 'static,
    {
        Self::new(finish_handler).with_settings(definition.settings.clone())
    }

    /// Sends notifications to `sink`.
    pub fn with_notifications<S>(mut self, sink: S) -> Self
    where
        S: NotificationSink + 'static,
    {
        self.notifications = Arc::new(sink);
        self
    }

    /// Uses `renderers` to resolve step behavior by kind.
    pub fn with_renderers(mut self, renderers: RendererRegistry) -> Self {
        self.renderers = renderers;
        self
    }

    /// Overrides the runtime settings.
    pub fn with_settings(mut self, settings: WizardSettings) -> Self {
        self.settings = settings;
        self
    }

    /// Returns the id used to correlate this instance's log lines.
    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Returns the latest published state.
    pub fn state(&self) -> Arc<WizardState> {
        self.state.borrow().clone()
    }

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<Arc<WizardState>> {
        self.state.subscribe()
    }

    /// Returns how many state versions have been published.
    pub fn version(&self) -> u64 {
        self.version.load(Ordering::SeqCst)
    }

    /// Returns the runtime settings.
    pub fn settings(&self) -> &WizardSettings {
        &self.settings
    }

    /// Collates the models of all visited steps.
    pub fn collated_model(&self) -> Value {
        engine::collate(&self.state())
    }

    /// Ends this instance's life.
    ///
    /// Operations still waiting on a hook return [`WizardError::Disposed`]
    /// when they resume and publish nothing.
    pub fn dispose(&self) {
        if !self.disposed.swap(true, Ordering::SeqCst) {
            info!(instance_id = %self.instance_id, "Wizard disposed");
        }
    }

    /// Returns true once [`dispose`](Wizard::dispose) has been called.
    pub fn is_disposed(&self) -> bool {
        self.disposed.load(Ordering::SeqCst)
    }

    fn ensure_live(&self) -> WizardResult<()> {
        if self.is_disposed() {
            debug!(instance_id = %self.instance_id, "Discarding operation on disposed wizard");
            return Err(WizardError::Disposed);
        }
        Ok(())
    }

    /// Returns true once a finish has closed the wizard; navigation is then
    /// ignored and nothing is published.
    fn is_closed(&self, intent: &str) -> bool {
        let closed = self.state.borrow().finished;
        if closed {
            debug!(instance_id = %self.instance_id, intent, "Ignoring navigation on finished wizard");
        }
        closed
    }

    /// Applies `transition` to the current state and publishes the result.
    ///
    /// Returns false, and publishes nothing, when the transition is a no-op
    /// or the wizard has been disposed.
    fn transition<F>(&self, transition: F) -> bool
    where
        F: FnOnce(&WizardState) -> Option<WizardState>,
    {
        if self.is_disposed() {
            return false;
        }

        let changed = self.state.send_if_modified(|current| match transition(&**current) {
            Some(next) => {
                *current = Arc::new(next);
                true
            }
            None => false,
        });

        if changed {
            self.version.fetch_add(1, Ordering::SeqCst);
        }
        changed
    }

    fn publish<F>(&self, transition: F)
    where
        F: FnOnce(&WizardState) -> WizardState,
    {
        self.transition(|state| Some(transition(state)));
    }

    /// Reports a failed attempt: clears `loading`, emits the error once and
    /// hands it back.
    fn fail<T>(&self, error: WizardError) -> WizardResult<T> {
        if self.state().loading {
            self.publish(engine::transition_failed);
        }

        let message = error.user_message(&self.settings.messages.unexpected_error);
        warn!(
            instance_id = %self.instance_id,
            error = %error,
            "Wizard transition failed"
        );
        self.notifications.clear();
        self.notifications.error(&message);
        Err(error)
    }

    /// Loads the wizard's steps.
    ///
    /// Explicit non-empty `steps` win; otherwise `loader` is awaited. The
    /// first step becomes current.
    ///
    /// # Errors
    ///
    /// - [`WizardError::NoSteps`] when neither source yields a step; like
    ///   `Load`, it reports true from [`WizardError::is_load_failure`]
    /// - [`WizardError::Load`] when the loader fails
    /// - [`WizardError::Disposed`] when disposed while the loader ran
    pub async fn load_wizard(
        &self,
        title: impl Into<String>,
        steps: Vec<Step>,
        loader: Option<&dyn StepResolver>,
        extra_model: Value,
    ) -> WizardResult<()> {
        self.ensure_live()?;
        let title = title.into();
        info!(instance_id = %self.instance_id, title = %title, "Loading wizard");
        self.publish(|state| engine::begin_load(state, title));

        let resolved = if !steps.is_empty() {
            Ok(steps)
        } else if let Some(loader) = loader {
            let resolved = loader.resolve().await.map_err(WizardError::Load);
            self.ensure_live()?;
            resolved
        } else {
            Ok(Vec::new())
        };

        let loaded = resolved.and_then(|steps| engine::load_steps(&self.state(), steps, extra_model));
        match loaded {
            Ok(next) => {
                info!(
                    instance_id = %self.instance_id,
                    steps = next.step_count(),
                    "Wizard loaded"
                );
                self.publish(|_| next);
                Ok(())
            }
            Err(error) => {
                self.publish(engine::load_failed);
                self.fail(error)
            }
        }
    }

    /// Loads the title, steps and extra model of a parsed definition.
    ///
    /// The definition's `settings` are not applied here: settings belong to
    /// the instance and are fixed at construction, so pass them through
    /// [`with_settings`](Wizard::with_settings) (or build the instance with
    /// [`for_definition`](Wizard::for_definition)).
    pub async fn load_definition(&self, definition: &WizardDefinition) -> WizardResult<()> {
        self.load_wizard(
            definition.title.clone(),
            definition.steps.clone(),
            None,
            definition.extra_model.clone(),
        )
        .await
    }

    /// Commits the current step and moves to the next one.
    ///
    /// The step is valid only when `form_valid` holds and `model_valid` is
    /// [`ModelValidity::Valid`]. A valid step publishes `loading = true` and
    /// runs `on_advance` first; only when it succeeds is `model` stored on
    /// the current step, the step marked visited and the successor made
    /// current (the last step stays current).
    ///
    /// If the advance lands on a last step that was already visited, the
    /// wizard finishes and the finish outcome is returned. Once a finish has
    /// closed the wizard, advancing does nothing and returns `Ok(None)`.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Validation`] when the step is invalid
    /// - [`WizardError::Advance`] when `on_advance` fails
    /// - [`WizardError::Finish`] when the automatic finish fails; the advance
    ///   itself has been applied by then
    /// - [`WizardError::Disposed`] when disposed while a hook ran
    pub async fn advance(
        &self,
        model: Value,
        form_valid: bool,
        model_valid: ModelValidity,
        on_advance: Option<&dyn AdvanceHook>,
    ) -> WizardResult<Option<FinishOutcome>> {
        self.ensure_live()?;
        if self.is_closed("advance") {
            return Ok(None);
        }
        self.notifications.clear();

        let state = self.state();
        let step_message = state
            .current_step()
            .and_then(|step| step.error_message.as_deref());
        if let Err(message) = engine::check_validity(
            form_valid,
            &model_valid,
            step_message,
            &self.settings.messages.validation_default,
        ) {
            return self.fail(WizardError::Validation { message });
        }

        self.publish(engine::begin_transition);
        if let Some(hook) = on_advance {
            let result = hook.run().await;
            self.ensure_live()?;
            if let Err(error) = result {
                return self.fail(WizardError::Advance(error));
            }
        }

        let from = state.current_step_id.clone();
        self.publish(|state| engine::commit_and_move(state, model, None));
        self.notifications.clear();

        let next = self.state();
        info!(
            instance_id = %self.instance_id,
            from = ?from,
            to = ?next.current_step_id,
            "Advanced step"
        );

        if engine::should_auto_finish(&next) {
            debug!(instance_id = %self.instance_id, "Returned to completed last step; finishing");
            return self.finish().await.map(Some);
        }
        Ok(None)
    }

    /// Advances using the current step's registered renderer.
    ///
    /// The renderer for the step's kind supplies the model check and the
    /// advance hook; a step without one is treated as always valid.
    pub async fn advance_current(
        &self,
        model: Value,
        form_valid: bool,
    ) -> WizardResult<Option<FinishOutcome>> {
        let renderer = self
            .state()
            .current_step()
            .and_then(|step| self.renderers.resolve(step));

        let (model_valid, hook) = match &renderer {
            Some(renderer) => (renderer.is_model_valid(&model), renderer.on_advance(&model)),
            None => (ModelValidity::Valid, None),
        };

        self.advance(model, form_valid, model_valid, hook.as_deref())
            .await
    }

    /// Moves back one step.
    ///
    /// Does nothing on the first step, with no current step, or once the
    /// wizard has finished. The departing step's in-progress model is not
    /// stored and it is not marked visited.
    pub fn retreat(&self) -> WizardResult<()> {
        self.ensure_live()?;
        if self.is_closed("retreat") {
            return Ok(());
        }
        self.notifications.clear();

        let snapshot = self.state();
        if !self.transition(engine::retreat) {
            if snapshot.loading {
                self.publish(engine::transition_failed);
            }
            debug!(instance_id = %self.instance_id, "Nothing to go back to");
            return Ok(());
        }

        info!(
            instance_id = %self.instance_id,
            to = ?self.state().current_step_id,
            "Went back a step"
        );
        Ok(())
    }

    /// Moves back one step after running the current renderer's retreat hook.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Retreat`] when the hook fails
    /// - [`WizardError::Disposed`] when disposed while the hook ran
    pub async fn retreat_current(&self) -> WizardResult<()> {
        self.ensure_live()?;
        if self.is_closed("retreat") {
            return Ok(());
        }

        let hook = self
            .state()
            .current_step()
            .and_then(|step| self.renderers.resolve(step))
            .and_then(|renderer| renderer.on_retreat());

        if let Some(hook) = hook {
            self.notifications.clear();
            self.publish(engine::begin_transition);
            let result = hook.run().await;
            self.ensure_live()?;
            if let Err(error) = result {
                return self.fail(WizardError::Retreat(error));
            }
        }

        self.retreat()
    }

    /// Commits the current step and jumps to `step_id`.
    ///
    /// An id that is not in the step order behaves like a successful
    /// advance and moves to the successor of the current step. A finished
    /// wizard ignores the jump.
    pub fn go_to(&self, step_id: &str, model: Value) -> WizardResult<()> {
        self.ensure_live()?;
        if self.is_closed("go_to") {
            return Ok(());
        }
        self.publish(|state| engine::commit_and_move(state, model, Some(step_id)));
        info!(
            instance_id = %self.instance_id,
            requested = %step_id,
            to = ?self.state().current_step_id,
            "Jumped to step"
        );
        Ok(())
    }

    /// Hands the collated model to the finish handler.
    ///
    /// [`FinishOutcome::KeepOpen`] leaves the wizard open and unfinished;
    /// any other outcome marks it finished.
    ///
    /// # Errors
    ///
    /// - [`WizardError::Finish`] when the handler fails
    /// - [`WizardError::Disposed`] when disposed while the handler ran
    pub async fn finish(&self) -> WizardResult<FinishOutcome> {
        self.ensure_live()?;

        let collated = engine::collate(&self.state());
        self.publish(engine::begin_transition);
        info!(instance_id = %self.instance_id, "Finishing wizard");

        let result = self.finish_handler.finish(collated).await;
        self.ensure_live()?;

        match result {
            Ok(outcome) => {
                let at = Utc::now();
                self.publish(|state| engine::finish_succeeded(state, &outcome, at));
                self.notifications
                    .success(&self.settings.messages.finish_success);
                info!(
                    instance_id = %self.instance_id,
                    outcome = ?outcome,
                    "Wizard finish handled"
                );
                Ok(outcome)
            }
            Err(error) => self.fail(WizardError::Finish(error)),
        }
    }

    /// Appends `step`. Returns false when its id is already present.
    pub fn insert(&self, step: Step) -> bool {
        self.transition(|state| engine::insert(state, step))
    }

    /// Inserts `step` before `anchor`, appending if `anchor` is unknown.
    pub fn insert_before(&self, step: Step, anchor: &str) -> bool {
        self.transition(|state| engine::insert_before(state, step, anchor))
    }

    /// Inserts `step` after `anchor`, appending if `anchor` is unknown.
    pub fn insert_after(&self, step: Step, anchor: &str) -> bool {
        self.transition(|state| engine::insert_after(state, step, anchor))
    }

    /// Inserts `steps` as a contiguous block relative to `anchor`.
    pub fn insert_many(&self, steps: Vec<Step>, anchor: Option<&str>, relation: Relation) -> bool {
        self.transition(|state| engine::insert_many(state, steps, anchor, relation))
    }

    /// Removes the step with `id`. Returns false when it is not present.
    pub fn remove_by_id(&self, id: &str) -> bool {
        self.transition(|state| engine::remove_by_id(state, id))
    }

    /// Removes every step matching `predicate`.
    pub fn remove_by_filter<F>(&self, predicate: F) -> bool
    where
        F: FnMut(&Step) -> bool,
    {
        self.transition(|state| engine::remove_by_filter(state, predicate))
    }

    /// Replaces the model of step `id`.
    pub fn update_model(&self, id: &str, model: Value) -> bool {
        self.transition(|state| engine::update_model(state, id, model))
    }

    /// Replaces the models of several steps.
    pub fn update_models(&self, updates: Vec<ModelUpdate>) -> bool {
        self.transition(|state| engine::update_models(state, updates))
    }
}
