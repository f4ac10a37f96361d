mod manual;
mod poller;
mod sample;
mod scripted;

pub use manual::*;
pub use poller::*;
pub use sample::*;
pub use scripted::*;

/// Anything that can report how many fingers the human is showing.
///
/// Queried synchronously at the poll cadence. Implementations must return
/// promptly; "no hand" is reported as a sample, never as an error.
pub trait Capture: Send {
    fn sample(&mut self) -> Sample;
}

/// A capture adapter shared between the orchestrator and its poller tasks.
pub type Camera = std::sync::Arc<std::sync::Mutex<Box<dyn Capture>>>;

pub fn camera<C>(capture: C) -> Camera
where
    C: Capture + 'static,
{
    let capture: Box<dyn Capture> = Box::new(capture);
    std::sync::Arc::new(std::sync::Mutex::new(capture))
}
