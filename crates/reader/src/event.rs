//! Progress and result notifications emitted while scanning
//!
//! Events are notifications only; dispatching never blocks or influences
//! the scan. Handlers are closures (or any [`EventHandler`]) registered on
//! the scanner, and the worker forwards events over a channel in emission
//! order.

use crate::family::CardFamily;

/// A milestone emitted during a scan
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanEvent {
    /// Free-form progress message for the presentation layer
    Progress(String),
    /// A card was detected and classified
    CardDetected(CardFamily),
    /// Key load or sector authentication was rejected
    AuthenticationFailed,
    /// One block/page group was read
    BlockRead {
        /// Block index that was read
        index: u8,
    },
    /// The scan attempt finished
    Complete {
        /// Whether the card was read successfully
        success: bool,
        /// Outcome description
        message: String,
    },
}

/// A type that can receive scan events.
///
/// Implemented for any `FnMut(T)` closure.
pub trait EventHandler<T> {
    /// Handle one event
    fn handle(&mut self, event: T);
}

impl<T, F> EventHandler<T> for F
where
    F: FnMut(T),
{
    fn handle(&mut self, event: T) {
        self(event)
    }
}

/// Fan-out of events to registered handlers, in registration order.
///
/// Handlers must be `Send` so the dispatcher can move to the scan thread
/// with its scanner.
#[allow(missing_debug_implementations)]
pub struct EventDispatcher<T> {
    handlers: Vec<Box<dyn EventHandler<T> + Send>>,
}

impl<T> EventDispatcher<T> {
    /// Create an empty dispatcher
    pub fn new() -> Self {
        Self {
            handlers: Vec::new(),
        }
    }

    /// Register a handler
    pub fn add_handler<H>(&mut self, handler: H)
    where
        H: EventHandler<T> + Send + 'static,
    {
        self.handlers.push(Box::new(handler));
    }

    /// Deliver an event to every handler
    pub fn dispatch(&mut self, event: T)
    where
        T: Clone,
    {
        for handler in &mut self.handlers {
            handler.handle(event.clone());
        }
    }
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn dispatches_in_registration_order() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let mut dispatcher = EventDispatcher::new();
        for tag in ["first", "second"] {
            let seen = Arc::clone(&seen);
            dispatcher.add_handler(move |event: ScanEvent| {
                seen.lock().unwrap().push((tag, event));
            });
        }

        dispatcher.dispatch(ScanEvent::AuthenticationFailed);

        let seen = seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        assert_eq!(seen[0].0, "first");
        assert_eq!(seen[1].0, "second");
    }
}
