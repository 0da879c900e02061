pub mod attributor;
pub mod formula;
pub mod map;
pub mod perturb;

#[cfg(test)]
pub(crate) mod testing;

pub use crate::attributor::*;
pub use crate::formula::*;
pub use crate::map::*;
pub use crate::perturb::*;
