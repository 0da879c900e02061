use std::fmt;

use anyhow::{anyhow, Result};
use shakmaty::fen::Fen;
use shakmaty::uci::UciMove;
use shakmaty::{
    CastlingMode, Chess, EnPassantMode, FromSetup, Piece, Position, PositionError,
    PositionErrorKinds, Rank, Role, Setup, Square,
};

use engine::{DecisionState, Perturbable};
use uci::PositionFen;

use crate::squares::all_squares;

/// A chess position. Occupant edits always produce a fresh state; the
/// receiver is never modified. A state may be structurally invalid when
/// an edit left the non-moving king attacked; such a state has no
/// legal moves and reports [`DecisionState::is_illegal_position`].
#[derive(Clone, Debug)]
pub struct ChessState {
    setup: Setup,
    pos: Option<Chess>,
}

impl ChessState {
    pub fn initial() -> Self {
        let pos = Chess::default();

        Self {
            setup: pos.clone().into_setup(EnPassantMode::Legal),
            pos: Some(pos),
        }
    }

    pub fn from_fen(fen: &str) -> Result<Self> {
        let setup = fen
            .parse::<Fen>()
            .map_err(|err| anyhow!("invalid FEN {:?}: {}", fen, err))?
            .into_setup();

        Self::from_setup(setup)
    }

    fn from_setup(setup: Setup) -> Result<Self> {
        let result = Chess::from_setup(setup.clone(), CastlingMode::Standard)
            .or_else(PositionError::ignore_invalid_castling_rights)
            .or_else(PositionError::ignore_invalid_ep_square)
            .or_else(PositionError::ignore_too_much_material);

        match result {
            Ok(pos) => Ok(Self {
                // Re-derive the setup so dropped castling rights and
                // stale en passant squares do not leak into the FEN.
                setup: pos.clone().into_setup(EnPassantMode::Legal),
                pos: Some(pos),
            }),
            Err(err) if err.kinds().contains(PositionErrorKinds::OPPOSITE_CHECK) => {
                Ok(Self { setup, pos: None })
            }
            Err(err) => Err(anyhow!("invalid position: {}", err)),
        }
    }

    pub fn occupant(&self, square: Square) -> Option<Piece> {
        self.setup.board.piece_at(square)
    }

    pub fn fen(&self) -> String {
        Fen(self.setup.clone()).to_string()
    }
}

impl PartialEq for ChessState {
    fn eq(&self, other: &Self) -> bool {
        self.setup == other.setup
    }
}

impl Eq for ChessState {}

impl fmt::Display for ChessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.fen())
    }
}

impl PositionFen for ChessState {
    fn position_fen(&self) -> String {
        self.fen()
    }
}

impl DecisionState for ChessState {
    type Action = UciMove;

    fn legal_actions(&self) -> Vec<UciMove> {
        match &self.pos {
            Some(pos) => pos
                .legal_moves()
                .iter()
                .map(|m| m.to_uci(CastlingMode::Standard))
                .collect(),
            None => Vec::new(),
        }
    }

    fn is_action_legal(&self, action: &UciMove) -> bool {
        match &self.pos {
            Some(pos) => action.to_move(pos).is_ok(),
            None => false,
        }
    }

    fn is_illegal_position(&self) -> bool {
        self.pos.is_none()
    }
}

impl Perturbable for ChessState {
    type Location = Square;

    fn locations() -> Vec<Square> {
        all_squares()
    }

    fn remove_occupant(&self, location: Square) -> Option<Self> {
        let piece = self.occupant(location)?;

        // Removing a king has no well-defined game semantics.
        if piece.role == Role::King {
            return None;
        }

        let mut setup = self.setup.clone();
        setup.board.discard_piece_at(location);

        Self::from_setup(setup).ok()
    }

    fn add_occupant(&self, location: Square) -> Option<Self> {
        if self.occupant(location).is_some() {
            return None;
        }

        // A pawn on its back rank is not a legal chess configuration.
        if location.rank() == Rank::First || location.rank() == Rank::Eighth {
            return None;
        }

        let mut setup = self.setup.clone();
        setup
            .board
            .set_piece_at(location, Role::Pawn.of(setup.turn));

        Self::from_setup(setup).ok()
    }
}
