pub mod squares;
pub mod state;

pub use crate::squares::*;
pub use crate::state::*;

pub use shakmaty::uci::UciMove;
pub use shakmaty::Square;
