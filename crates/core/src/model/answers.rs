use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

//
// ─── ANSWER SHEET ─────────────────────────────────────────────────────────────
//

/// Choices the candidate has made so far, keyed by question position.
///
/// Positions index into the session's sampled question list, not the pool.
/// Re-selecting a position overwrites the earlier choice, so the sheet holds
/// at most one entry per question and `attempted_count` is simply its size.
/// Choice indices are recorded as given; grading treats anything outside 0-3
/// as wrong, which is what a corrupted entry deserves.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerSheet(BTreeMap<usize, usize>);

impl AnswerSheet {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `choice` for the question at `position`, returning the choice
    /// it replaced when the candidate had already answered there.
    pub fn select(&mut self, position: usize, choice: usize) -> Option<usize> {
        self.0.insert(position, choice)
    }

    /// The recorded choice at `position`, if any.
    #[must_use]
    pub fn selected(&self, position: usize) -> Option<usize> {
        self.0.get(&position).copied()
    }

    /// Number of distinct questions answered.
    #[must_use]
    pub fn attempted_count(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Iterates `(position, choice)` pairs in position order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.0.iter().map(|(&p, &c)| (p, c))
    }
}

//
// ─── TESTS ────────────────────────────────────────────────────────────────────
//
