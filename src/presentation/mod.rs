#[cfg(feature = "console")]
mod console;
mod frame;

#[cfg(feature = "console")]
pub use console::*;
pub use frame::*;

/// Passive consumer of orchestrator state. Receives a fresh immutable
/// [`Frame`] after every transition and must not block.
pub trait Sink: Send {
    fn render(&mut self, frame: &Frame);
}

/// Discards every frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl Sink for Silent {
    fn render(&mut self, _: &Frame) {}
}

/// Forwards frames to another task, e.g. a UI or a test harness.
impl Sink for tokio::sync::mpsc::UnboundedSender<Frame> {
    fn render(&mut self, frame: &Frame) {
        if self.send(frame.clone()).is_err() {
            log::trace!("[room] frame receiver gone");
        }
    }
}
