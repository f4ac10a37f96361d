mod fingers;
mod outcome;
mod parity;
mod record;
mod session;
mod statistics;

pub use fingers::*;
pub use outcome::*;
pub use parity::*;
pub use record::*;
pub use session::*;
pub use statistics::*;
