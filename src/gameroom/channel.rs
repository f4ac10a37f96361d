use super::*;
use tokio::sync::mpsc::UnboundedReceiver;
use tokio::sync::mpsc::UnboundedSender;
use tokio::sync::mpsc::unbounded_channel;

/// The orchestrator's single ordered inbox.
///
/// Producers hold clones of the sender; only the orchestrator receives.
/// Events from one producer keep their order; events from different
/// producers interleave but are each handled to completion before the next.
#[derive(Debug)]
pub struct Queue {
    tx: UnboundedSender<Event>,
    rx: UnboundedReceiver<Event>,
}

impl Default for Queue {
    fn default() -> Self {
        let (tx, rx) = unbounded_channel();
        Self { tx, rx }
    }
}

impl Queue {
    /// A new producer handle.
    pub fn sender(&self) -> UnboundedSender<Event> {
        self.tx.clone()
    }
    /// Never yields `None`: the queue holds a sender of its own.
    pub async fn next(&mut self) -> Option<Event> {
        self.rx.recv().await
    }
    /// An event already waiting, without suspending.
    pub fn ready(&mut self) -> Option<Event> {
        self.rx.try_recv().ok()
    }
}
