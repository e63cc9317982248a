//! Notification side channel.
//!
//! Wizard transitions emit [`Notification`] events (error, success, clear)
//! for a presentation layer to render however it likes. The engine never
//! depends on how, or whether, they are shown.

use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::debug;

use crate::models::Notification;

/// Receives notification events from a wizard.
pub trait NotificationSink: Send + Sync {
    /// Delivers one event.
    fn notify(&self, notification: Notification);

    /// Emits an error message.
    fn error(&self, message: &str) {
        self.notify(Notification::Error(message.to_string()));
    }

    /// Emits a success message.
    fn success(&self, message: &str) {
        self.notify(Notification::Success(message.to_string()));
    }

    /// Asks the presentation layer to dismiss current messages.
    fn clear(&self) {
        self.notify(Notification::Clear);
    }
}

impl<F> NotificationSink for F
where
    F: Fn(Notification) + Send + Sync,
{
    fn notify(&self, notification: Notification) {
        (self)(notification)
    }
}

/// A sink that drops every event.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl NotificationSink for NullSink {
    fn notify(&self, _notification: Notification) {}
}

/// A sink that forwards events over an unbounded tokio channel.
///
/// # Example
///
/// ```
/// use wizard_engine::notifications::{ChannelSink, NotificationSink};
/// use wizard_engine::models::Notification;
///
/// let (sink, mut events) = ChannelSink::new();
/// sink.error("Something broke");
/// assert_eq!(events.try_recv().unwrap(), Notification::Error("Something broke".to_string()));
/// ```
#[derive(Debug, Clone)]
pub struct ChannelSink {
    sender: UnboundedSender<Notification>,
}

impl ChannelSink {
    /// Creates a sink and the receiver its events arrive on.
    pub fn new() -> (Self, UnboundedReceiver<Notification>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        (Self { sender }, receiver)
    }
}

impl NotificationSink for ChannelSink {
    fn notify(&self, notification: Notification) {
        if self.sender.send(notification).is_err() {
            debug!("Notification receiver dropped; discarding event");
        }
    }
}
