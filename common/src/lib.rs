pub mod config;
pub mod math;
pub mod softmax;

pub use config::*;
pub use math::*;
pub use softmax::*;
