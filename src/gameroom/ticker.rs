use super::*;
use crate::Epoch;
use std::time::Duration;
use tokio::sync::mpsc::UnboundedSender;
use tokio::task::JoinHandle;

/// Emit 3, 2, 1, GO one `tick` apart, the first immediately.
/// Stops early if the queue is gone or the task is aborted.
pub fn countdown(tick: Duration, epoch: Epoch, queue: UnboundedSender<Event>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(tick);
        for beat in Tick::all() {
            interval.tick().await;
            if queue.send(Event::Tick { epoch, tick: beat }).is_err() {
                return;
            }
        }
    })
}
