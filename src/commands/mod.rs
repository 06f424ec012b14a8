pub mod authorization;
pub mod recording;

pub use authorization::*;
pub use recording::*;
