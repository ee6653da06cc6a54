//! Send lifecycle events and observer dispatch.

use mailbridge_mime::Message;

/// Outcome of a send, reported to observers after the attempt.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendOutcome {
    /// The provider accepted the message for delivery.
    Success,
    /// The provider did not accept the message.
    Failed,
}

/// Cancellable event dispatched before a send is attempted.
#[derive(Debug, Default)]
pub struct BeforeSendEvent {
    cancelled: bool,
}

impl BeforeSendEvent {
    /// Requests cancellation of the send.
    pub fn cancel(&mut self) {
        self.cancelled = true;
    }

    /// Whether any observer requested cancellation.
    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled
    }
}

/// Observer of send lifecycle events.
///
/// Both hooks default to no-ops so observers implement only what they
/// care about.
pub trait SendListener {
    /// Called before the send is attempted. Cancelling the event aborts
    /// the send with an accepted count of zero.
    fn before_send(&self, _message: &Message, _event: &mut BeforeSendEvent) {}

    /// Called after the send attempt with its outcome.
    fn send_performed(&self, _message: &Message, _outcome: SendOutcome) {}
}

/// Registry of send observers, notified in registration order.
#[derive(Default)]
pub struct EventDispatcher {
    listeners: Vec<Box<dyn SendListener>>,
}

impl std::fmt::Debug for EventDispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventDispatcher")
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl EventDispatcher {
    /// Creates an empty dispatcher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers an observer.
    pub fn register(&mut self, listener: Box<dyn SendListener>) {
        self.listeners.push(listener);
    }

    /// Dispatches the pre-send event; returns true if any observer
    /// cancelled the send.
    pub fn dispatch_before_send(&self, message: &Message) -> bool {
        let mut event = BeforeSendEvent::default();
        for listener in &self.listeners {
            listener.before_send(message, &mut event);
        }
        event.is_cancelled()
    }

    /// Dispatches the post-send event with the outcome.
    pub fn dispatch_send_performed(&self, message: &Message, outcome: SendOutcome) {
        for listener in &self.listeners {
            listener.send_performed(message, outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mailbridge_mime::ContentType;
    use std::cell::Cell;
    use std::rc::Rc;

    struct Cancelling;

    impl SendListener for Cancelling {
        fn before_send(&self, _message: &Message, event: &mut BeforeSendEvent) {
            event.cancel();
        }
    }

    struct Recording {
        outcome: Rc<Cell<Option<SendOutcome>>>,
    }

    impl SendListener for Recording {
        fn send_performed(&self, _message: &Message, outcome: SendOutcome) {
            self.outcome.set(Some(outcome));
        }
    }

    fn message() -> Message {
        Message::new("Hi", "Hi", ContentType::text_plain())
    }

    #[test]
    fn test_no_listeners_means_no_cancellation() {
        let dispatcher = EventDispatcher::new();
        assert!(!dispatcher.dispatch_before_send(&message()));
    }

    #[test]
    fn test_any_listener_can_cancel() {
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Box::new(Cancelling));
        assert!(dispatcher.dispatch_before_send(&message()));
    }

    #[test]
    fn test_outcome_reaches_listeners() {
        let outcome = Rc::new(Cell::new(None));
        let mut dispatcher = EventDispatcher::new();
        dispatcher.register(Box::new(Recording {
            outcome: Rc::clone(&outcome),
        }));

        dispatcher.dispatch_send_performed(&message(), SendOutcome::Failed);
        assert_eq!(outcome.get(), Some(SendOutcome::Failed));
    }
}
