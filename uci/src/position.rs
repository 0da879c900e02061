/// Renders a state as the FEN line sent to the engine with
/// `position fen ...`.
pub trait PositionFen {
    fn position_fen(&self) -> String;
}
