pub mod extractor;
pub mod parse;
pub mod position;
pub mod process;

pub use crate::extractor::*;
pub use crate::parse::*;
pub use crate::position::*;
pub use crate::process::*;
