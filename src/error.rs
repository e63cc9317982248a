//! Error types for the Wizard Engine.
//!
//! This module provides strongly-typed errors using the `thiserror` crate
//! for every failure a navigation attempt or a configuration load can hit.
//! Structural edits (insert/remove on duplicate or missing ids) never fail;
//! they are silent no-ops and have no variant here.

use thiserror::Error;

/// An error raised by a collaborator hook (step resolver, advance hook or
/// finish handler).
///
/// A [`HookError::Message`] carries text meant for the user and is shown
/// verbatim; anything else is reported with the configured
/// "unexpected error" message.
#[derive(Debug, Error)]
pub enum HookError {
    /// A user-facing failure message.
    #[error("{0}")]
    Message(String),

    /// Any other upstream error.
    #[error("{0}")]
    Other(Box<dyn std::error::Error + Send + Sync>),
}

impl HookError {
    /// Creates a user-facing hook failure.
    pub fn message(message: impl Into<String>) -> Self {
        HookError::Message(message.into())
    }

    /// Wraps an arbitrary upstream error.
    pub fn other<E>(error: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        HookError::Other(Box::new(error))
    }

    /// Returns the text to show the user, if this error carries one.
    pub fn user_message(&self) -> Option<&str> {
        match self {
            HookError::Message(message) => Some(message),
            HookError::Other(_) => None,
        }
    }
}

/// The main error type for the Wizard Engine.
///
/// Every navigation error is local to one attempt: the wizard returns to
/// its ready state with `loading` cleared and its step order untouched.
///
/// # Example
///
/// ```
/// use wizard_engine::error::WizardError;
///
/// let error = WizardError::Validation {
///     message: "Please correct errors".to_string(),
/// };
/// assert_eq!(error.to_string(), "Validation failed: Please correct errors");
/// ```
#[derive(Debug, Error)]
pub enum WizardError {
    /// No steps were supplied directly or resolved by the loader.
    ///
    /// This is a load failure like [`WizardError::Load`]; match both with
    /// [`WizardError::is_load_failure`].
    #[error("No steps have been provided")]
    NoSteps,

    /// The step resolver failed.
    #[error("Failed to load wizard: {0}")]
    Load(#[source] HookError),

    /// The form or the step model did not validate.
    #[error("Validation failed: {message}")]
    Validation {
        /// The user-facing validation message.
        message: String,
    },

    /// The advance hook of the current step failed.
    #[error("Failed to advance: {0}")]
    Advance(#[source] HookError),

    /// Moving back a step failed.
    #[error("Failed to go back: {0}")]
    Retreat(#[source] HookError),

    /// The finish handler failed.
    #[error("Failed to finish wizard: {0}")]
    Finish(#[source] HookError),

    /// The wizard was disposed while the operation was in flight.
    #[error("Wizard instance has been disposed")]
    Disposed,

    /// A wizard definition file was not found at the specified path.
    #[error("Configuration file not found: {path}")]
    ConfigNotFound {
        /// The path that was not found.
        path: String,
    },

    /// A wizard definition file could not be parsed.
    #[error("Failed to parse configuration file '{path}': {message}")]
    ConfigParseError {
        /// The path to the file that failed to parse.
        path: String,
        /// A description of the parse error.
        message: String,
    },
}

impl WizardError {
    /// Returns true when loading the wizard failed, either because the
    /// resolver errored or because no steps came back.
    pub fn is_load_failure(&self) -> bool {
        matches!(self, WizardError::Load(_) | WizardError::NoSteps)
    }

    /// Returns the upstream hook error wrapped by this error, if any.
    pub fn hook_error(&self) -> Option<&HookError> {
        match self {
            WizardError::Load(err)
            | WizardError::Advance(err)
            | WizardError::Retreat(err)
            | WizardError::Finish(err) => Some(err),
            _ => None,
        }
    }

    /// Returns the message shown to the user for this error.
    ///
    /// Validation messages and user-facing hook messages are passed through;
    /// every other error collapses to `unexpected`.
    pub fn user_message(&self, unexpected: &str) -> String {
        match self {
            WizardError::Validation { message } => message.clone(),
            WizardError::NoSteps => self.to_string(),
            other => other
                .hook_error()
                .and_then(HookError::user_message)
                .unwrap_or(unexpected)
                .to_string(),
        }
    }
}

/// A type alias for Results that return WizardError.
pub type WizardResult<T> = Result<T, WizardError>;
