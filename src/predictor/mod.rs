mod features;
mod head;
mod prediction;
mod predictor;
mod window;

pub use features::*;
pub use head::*;
pub use prediction::*;
pub use predictor::*;
pub use window::*;
