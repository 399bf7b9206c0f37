use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender, unbounded_channel};
use tracing::debug;

use crate::engine::command::Notification;

/// Sending half of the host notification channel.
///
/// The host may not be listening (popup closed, receiver dropped); sends to
/// a missing receiver are dropped silently.
#[derive(Debug, Clone, Default)]
pub struct Notifier {
    tx: Option<UnboundedSender<Notification>>,
}

impl Notifier {
    pub fn channel() -> (Self, UnboundedReceiver<Notification>) {
        let (tx, rx) = unbounded_channel();
        (Self { tx: Some(tx) }, rx)
    }

    /// A notifier with nobody on the other end.
    pub fn detached() -> Self {
        Self::default()
    }

    /// Returns whether the notification was handed to a live receiver.
    pub fn notify(&self, notification: Notification) -> bool {
        let Some(tx) = &self.tx else {
            return false;
        };

        match tx.send(notification) {
            Ok(()) => true,
            Err(e) => {
                debug!("notification dropped, no receiver: {:?}", e.0);
                false
            }
        }
    }
}
