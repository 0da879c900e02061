use std::collections::HashMap;

/// Scores keyed by an action's canonical string token, all fixed to the
/// perspective of the side to move in the state they were computed for.
/// The map covers only the actions that were requested, not necessarily
/// the full legal set.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ActionValues {
    scores: HashMap<String, f32>,
}

impl ActionValues {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, token: impl Into<String>, score: f32) {
        self.scores.insert(token.into(), score);
    }

    pub fn get(&self, token: &str) -> Option<f32> {
        self.scores.get(token).copied()
    }

    pub fn contains(&self, token: &str) -> bool {
        self.scores.contains_key(token)
    }

    pub fn len(&self) -> usize {
        self.scores.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn tokens(&self) -> impl Iterator<Item = &str> {
        self.scores.keys().map(String::as_str)
    }

    /// A copy containing only the given tokens. Tokens absent from the
    /// map are ignored.
    pub fn restricted_to<'a>(&self, tokens: impl IntoIterator<Item = &'a str>) -> Self {
        let scores = tokens
            .into_iter()
            .filter_map(|token| self.get(token).map(|score| (token.to_string(), score)))
            .collect();

        Self { scores }
    }

    /// The highest-scoring token, walking `order` so that ties resolve
    /// to the first-seen entry. Tokens missing from the map score
    /// negative infinity.
    pub fn argmax_in_order<'a>(&self, order: impl IntoIterator<Item = &'a str>) -> Option<&'a str> {
        let mut best: Option<(&str, f32)> = None;

        for token in order {
            let score = self.get(token).unwrap_or(f32::NEG_INFINITY);
            match best {
                Some((_, best_score)) if score <= best_score => {}
                _ => best = Some((token, score)),
            }
        }

        best.map(|(token, _)| token)
    }
}

impl FromIterator<(String, f32)> for ActionValues {
    fn from_iter<I: IntoIterator<Item = (String, f32)>>(iter: I) -> Self {
        Self {
            scores: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn values(entries: &[(&str, f32)]) -> ActionValues {
        entries
            .iter()
            .map(|(token, score)| (token.to_string(), *score))
            .collect()
    }

    #[test]
    fn test_restricted_to_drops_other_tokens() {
        let all = values(&[("e2e4", 0.5), ("d2d4", 0.3), ("g1f3", 0.1)]);
        let restricted = all.restricted_to(["e2e4", "g1f3"]);

        assert_eq!(restricted.len(), 2);
        assert_eq!(restricted.get("e2e4"), Some(0.5));
        assert_eq!(restricted.get("d2d4"), None);
    }

    #[test]
    fn test_restricted_to_ignores_unknown_tokens() {
        let all = values(&[("e2e4", 0.5)]);
        let restricted = all.restricted_to(["e2e4", "a2a3"]);

        assert_eq!(restricted.len(), 1);
    }

    #[test]
    fn test_argmax_picks_highest() {
        let all = values(&[("e2e4", 0.5), ("d2d4", 0.3), ("g1f3", 0.1)]);

        assert_eq!(all.argmax_in_order(["g1f3", "d2d4", "e2e4"]), Some("e2e4"));
    }

    #[test]
    fn test_argmax_ties_resolve_first_seen() {
        let all = values(&[("a", 0.3), ("b", 0.3)]);

        assert_eq!(all.argmax_in_order(["b", "a"]), Some("b"));
        assert_eq!(all.argmax_in_order(["a", "b"]), Some("a"));
    }

    #[test]
    fn test_argmax_empty_order() {
        let all = values(&[("a", 0.3)]);

        assert_eq!(all.argmax_in_order([]), None);
    }
}
