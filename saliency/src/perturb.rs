use engine::Perturbable;

/// The two supported structural edits.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PerturbationKind {
    /// Take the occupant away from a location.
    Removal,
    /// Put a pawn-equivalent occupant of the side to move on an empty
    /// location.
    Addition,
}

/// Produces single-location perturbations of a base state, one attempt
/// per location in the canonical enumeration order. Perturbation is a
/// pure function of (state, location), so the sequence is restartable.
#[derive(Clone, Copy, Debug)]
pub struct PerturbationSource {
    kind: PerturbationKind,
    skip_exposed: bool,
}

impl PerturbationSource {
    pub fn removal() -> Self {
        Self {
            kind: PerturbationKind::Removal,
            skip_exposed: false,
        }
    }

    pub fn addition() -> Self {
        Self {
            kind: PerturbationKind::Addition,
            skip_exposed: false,
        }
    }

    /// When set, perturbations that leave the state in an illegal
    /// configuration are suppressed here instead of reaching the
    /// attribution guard, so the assembled map omits those locations
    /// rather than carrying explicit zeros.
    pub fn with_skip_exposed(mut self, skip_exposed: bool) -> Self {
        self.skip_exposed = skip_exposed;
        self
    }

    pub fn kind(&self) -> PerturbationKind {
        self.kind
    }

    pub fn perturb<S: Perturbable>(&self, state: &S, location: S::Location) -> Option<S> {
        let perturbed = match self.kind {
            PerturbationKind::Removal => state.remove_occupant(location),
            PerturbationKind::Addition => state.add_occupant(location),
        }?;

        if self.skip_exposed && perturbed.is_illegal_position() {
            return None;
        }

        Some(perturbed)
    }

    /// Lazily yields (perturbed state, location) for every location
    /// where the edit applies.
    pub fn process<'a, S: Perturbable>(
        &'a self,
        state: &'a S,
    ) -> impl Iterator<Item = (S, S::Location)> + 'a {
        S::locations()
            .into_iter()
            .filter_map(move |location| self.perturb(state, location).map(|s| (s, location)))
    }
}
