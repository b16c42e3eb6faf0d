//! Fire-and-forget outbound message sinks.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};

use crate::message::{Message, MessageKind};

/// Destination for outbound messages.
///
/// Sends never block and never report delivery. A sink whose connection has
/// gone away reports [`is_closed`](Self::is_closed), which simulated objects
/// check at the start of every tick to stop themselves.
pub trait MessageSink: Send + Sync {
    /// Queues `message` for delivery.
    fn send(&self, message: Message);

    /// Returns `true` once the receiving side is gone.
    fn is_closed(&self) -> bool {
        false
    }
}

/// A sink that records every message in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    messages: Mutex<Vec<Message>>,
    closed: AtomicBool,
}

impl RecordingSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a copy of every message recorded so far.
    #[must_use]
    pub fn messages(&self) -> Vec<Message> {
        self.lock().clone()
    }

    /// Removes and returns every message recorded so far.
    pub fn take(&self) -> Vec<Message> {
        std::mem::take(&mut *self.lock())
    }

    /// Returns the number of recorded messages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    /// Returns the number of recorded messages of `kind`.
    #[must_use]
    pub fn count(&self, kind: MessageKind) -> usize {
        self.lock().iter().filter(|m| m.kind() == kind).count()
    }

    /// Marks the sink closed. Later sends are dropped.
    pub fn close(&self) {
        self.closed.store(true, Ordering::Release);
    }

    fn lock(&self) -> MutexGuard<'_, Vec<Message>> {
        self.messages.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl MessageSink for RecordingSink {
    fn send(&self, message: Message) {
        if !self.is_closed() {
            self.lock().push(message);
        }
    }

    fn is_closed(&self) -> bool {
        self.closed.load(Ordering::Acquire)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::message::RemoveEntity;

    #[test]
    fn records_in_order() {
        let sink = RecordingSink::new();
        sink.send(RemoveEntity { unique_id: 1 }.into());
        sink.send(RemoveEntity { unique_id: 2 }.into());
        let messages = sink.messages();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0], Message::RemoveEntity(RemoveEntity { unique_id: 1 }));
        assert_eq!(sink.count(MessageKind::RemoveEntity), 2);
    }

    #[test]
    fn take_drains() {
        let sink = RecordingSink::new();
        sink.send(RemoveEntity { unique_id: 1 }.into());
        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn closed_sink_drops_messages() {
        let sink = RecordingSink::new();
        assert!(!sink.is_closed());
        sink.close();
        assert!(sink.is_closed());
        sink.send(RemoveEntity { unique_id: 1 }.into());
        assert!(sink.is_empty());
    }

    #[test]
    fn sink_is_object_safe() {
        let sink: std::sync::Arc<dyn MessageSink> = std::sync::Arc::new(RecordingSink::new());
        sink.send(RemoveEntity { unique_id: 1 }.into());
        assert!(!sink.is_closed());
    }
}
