//! Broadcast bus carrying [`WorkflowEvent`]s to the presentation layer.
//!
//! # Guarantees
//!
//! - **At-most-once delivery**: slow receivers may miss events
//! - **No replay**: events emitted before `subscribe()` are not received
//!
//! The current state is always available from
//! [`WorkflowController::view`](crate::WorkflowController::view), so a receiver
//! that lagged can resynchronize from there.

use tokio::sync::broadcast;

use crate::types::{Notification, WorkflowEvent};

#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<WorkflowEvent>,
}

impl EventBus {
    pub fn with_capacity(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self { sender }
    }

    /// Emit an event to all subscribers (fire-and-forget).
    ///
    /// Returns the number of receivers that received the event.
    pub fn emit(&self, event: WorkflowEvent) -> usize {
        self.sender.send(event).unwrap_or(0)
    }

    pub fn notify(&self, notification: Notification) -> usize {
        tracing::debug!(
            title = %notification.title,
            severity = ?notification.severity,
            "{}",
            notification.message
        );
        self.emit(WorkflowEvent::Notify(notification))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<WorkflowEvent> {
        self.sender.subscribe()
    }

    pub fn subscriber_count(&self) -> usize {
        self.sender.receiver_count()
    }
}

impl std::fmt::Debug for EventBus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("subscriber_count", &self.subscriber_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Severity;

    #[tokio::test]
    async fn emit_without_subscribers_is_dropped() {
        let bus = EventBus::with_capacity(8);
        assert_eq!(bus.emit(WorkflowEvent::BusyChanged(true)), 0);
    }

    #[tokio::test]
    async fn all_subscribers_receive_notifications() {
        let bus = EventBus::with_capacity(8);
        let mut first = bus.subscribe();
        let mut second = bus.subscribe();

        let delivered = bus.notify(Notification::warning("Validation", "Enter page ranges"));
        assert_eq!(delivered, 2);

        for receiver in [&mut first, &mut second] {
            match receiver.recv().await.unwrap() {
                WorkflowEvent::Notify(n) => assert_eq!(n.severity, Severity::Warning),
                other => panic!("unexpected event: {:?}", other),
            }
        }
    }
}
