mod archive;
mod store;

pub use archive::*;
pub use store::*;
