use std::fmt::{Debug, Display};
use std::hash::Hash;

/// An immutable snapshot of the domain being explained. Mutation never
/// happens in place; perturbed copies are produced through
/// [`Perturbable`].
pub trait DecisionState: Clone + Debug {
    type Action: Clone + Eq + Hash + Display + Debug;

    /// Every action legal in this state, in the state's canonical
    /// enumeration order.
    fn legal_actions(&self) -> Vec<Self::Action>;

    fn is_action_legal(&self, action: &Self::Action) -> bool;

    /// True when the snapshot is not a reachable configuration of the
    /// game (a perturbation left the non-moving side attacked). Such
    /// states have no legal actions.
    fn is_illegal_position(&self) -> bool;
}

/// Single-location structural edits. Both edits are pure functions of
/// (state, location): calling them twice yields behaviorally equal
/// states and the receiver is never modified.
pub trait Perturbable: DecisionState + Sized {
    type Location: Copy + Eq + Hash + Display + Debug;

    /// All locations of the domain, in the canonical order used for
    /// heatmap indexing.
    fn locations() -> Vec<Self::Location>;

    /// None when the location is empty or its occupant may not be
    /// removed under the domain rules.
    fn remove_occupant(&self, location: Self::Location) -> Option<Self>;

    /// None when the location is occupied or an occupant may not be
    /// placed there. The inserted occupant belongs to the side to move.
    fn add_occupant(&self, location: Self::Location) -> Option<Self>;
}
