pub mod error;
pub mod evaluator;
pub mod state;
pub mod values;

pub use crate::error::*;
pub use crate::evaluator::*;
pub use crate::state::*;
pub use crate::values::*;
