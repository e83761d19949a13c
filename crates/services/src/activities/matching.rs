use std::time::Duration;

use rand::rng;
use rand::seq::SliceRandom;

use lingo_core::model::WordPair;

/// How long a failed pair stays visibly selected before it clears.
pub const MISMATCH_DELAY: Duration = Duration::from_millis(500);
/// Pause between the last match and reporting the activity as done.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(500);

/// Outcome of tapping one word in the pool.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchAttempt {
    /// Word added to the working selection; waiting for a second.
    Selected,
    /// Tap had no effect (already matched, already selected, or selection
    /// full while a mismatch is still showing).
    Ignored,
    /// The two selected words form a pair; selection cleared.
    Matched,
    /// The two selected words do not pair. They stay visible; call
    /// `clear_selection` after `MISMATCH_DELAY`. Never an error — the
    /// attempt is silently retryable.
    Mismatch,
    /// The final pair matched. Reported exactly once; completion fires after
    /// `COMPLETION_DELAY`.
    Finished,
}

/// Matching exercise: pair up words from one shuffled pool.
///
/// The shuffle happens once at construction and stays stable for the life of
/// the activity instance.
#[derive(Debug, Clone)]
pub struct MatchingBoard {
    pairs: Vec<WordPair>,
    words: Vec<String>,
    matched: Vec<bool>,
    selected: Vec<String>,
    finished: bool,
}

impl MatchingBoard {
    #[must_use]
    pub fn new(pairs: Vec<WordPair>) -> Self {
        let mut board = Self::unshuffled(pairs);
        board.words.shuffle(&mut rng());
        board
    }

    /// Deterministic constructor for tests: pool order is pair order.
    #[must_use]
    pub fn unshuffled(pairs: Vec<WordPair>) -> Self {
        let words = pairs
            .iter()
            .flat_map(|pair| [pair.0.clone(), pair.1.clone()])
            .collect();
        let matched = vec![false; pairs.len()];
        Self {
            pairs,
            words,
            matched,
            selected: Vec::new(),
            finished: false,
        }
    }

    /// The shuffled word pool, stable across re-renders.
    #[must_use]
    pub fn words(&self) -> &[String] {
        &self.words
    }

    #[must_use]
    pub fn is_matched(&self, word: &str) -> bool {
        self.pairs
            .iter()
            .position(|pair| pair.contains(word))
            .is_some_and(|index| self.matched[index])
    }

    #[must_use]
    pub fn is_selected(&self, word: &str) -> bool {
        self.selected.iter().any(|selected| selected == word)
    }

    #[must_use]
    pub fn selection(&self) -> &[String] {
        &self.selected
    }

    /// Pairs not yet matched.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.matched.iter().filter(|done| !**done).count()
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.finished
    }

    /// Tap a word in the pool.
    ///
    /// Matched words and words already in the selection cannot be selected
    /// again, and nothing is selectable while a mismatched pair is waiting to
    /// clear.
    pub fn select(&mut self, word: &str) -> MatchAttempt {
        if self.finished
            || self.selected.len() >= 2
            || self.is_matched(word)
            || self.is_selected(word)
            || !self.words.iter().any(|candidate| candidate == word)
        {
            return MatchAttempt::Ignored;
        }

        self.selected.push(word.to_owned());
        if self.selected.len() < 2 {
            return MatchAttempt::Selected;
        }

        let (first, second) = (&self.selected[0], &self.selected[1]);
        let Some(index) = self.pairs.iter().position(|pair| pair.links(first, second)) else {
            return MatchAttempt::Mismatch;
        };

        self.matched[index] = true;
        self.selected.clear();
        if self.matched.iter().all(|done| *done) {
            self.finished = true;
            MatchAttempt::Finished
        } else {
            MatchAttempt::Matched
        }
    }

    /// Clear a mismatched selection so both words are tappable again.
    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }
}
