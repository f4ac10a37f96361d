mod channel;
mod event;
mod orchestrator;
mod phase;
mod policy;
mod ticker;

pub use channel::*;
pub use event::*;
pub use orchestrator::*;
pub use phase::*;
pub use policy::*;
pub use ticker::*;
