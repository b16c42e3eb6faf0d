//! Shared collaborators of a session's simulated objects.

use std::sync::Arc;

use tokio::sync::mpsc;
use wire::{Message, MessageSink};
use world::{BlockGrid, BlockRegistry, EntityRegistry};

use crate::config::SimConfig;

/// Everything a simulated object needs from its session.
///
/// Cloning is cheap; all collaborators are shared.
#[derive(Clone)]
pub struct SimContext {
    pub config: Arc<SimConfig>,
    pub sink: Arc<dyn MessageSink>,
    pub grid: Arc<dyn BlockGrid>,
    pub blocks: Arc<BlockRegistry>,
    pub entities: Arc<dyn EntityRegistry>,
}

impl SimContext {
    #[must_use]
    pub fn new(
        config: SimConfig,
        sink: Arc<dyn MessageSink>,
        grid: Arc<dyn BlockGrid>,
        blocks: Arc<BlockRegistry>,
        entities: Arc<dyn EntityRegistry>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            sink,
            grid,
            blocks,
            entities,
        }
    }

    /// Sends a message through the session sink.
    pub fn send(&self, message: impl Into<Message>) {
        self.sink.send(message.into());
    }
}

impl std::fmt::Debug for SimContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SimContext")
            .field("config", &self.config)
            .field("sink_closed", &self.sink.is_closed())
            .finish_non_exhaustive()
    }
}

/// A sink that forwards messages into a tokio channel.
///
/// The sink reports itself closed once the receiver is dropped.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: mpsc::UnboundedSender<Message>,
}

impl ChannelSink {
    /// Creates a sink and the receiver that drains it.
    #[must_use]
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<Message>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }
}

impl MessageSink for ChannelSink {
    fn send(&self, message: Message) {
        // A closed receiver is reported through `is_closed`.
        let _ = self.tx.send(message);
    }

    fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}
