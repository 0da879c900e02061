pub mod align;
pub mod metrics;
pub mod puzzles;

pub use crate::align::*;
pub use crate::metrics::*;
pub use crate::puzzles::*;
