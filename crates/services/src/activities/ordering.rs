use std::time::Duration;

use rand::rng;
use rand::seq::SliceRandom;

/// Pause between a correct check and reporting the activity as done.
pub const COMPLETION_DELAY: Duration = Duration::from_millis(1000);

/// Result of checking the built sentence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderingCheck {
    /// Exact match with the target sentence; the board is now locked and
    /// completion fires after `COMPLETION_DELAY`.
    Correct,
    /// Not the target sentence. The build area is left as-is for the learner
    /// to keep adjusting.
    TryAgain,
}

/// Ordering exercise: rebuild the target sentence from shuffled word tokens.
#[derive(Debug, Clone)]
pub struct OrderingBoard {
    target: String,
    pool: Vec<String>,
    built: Vec<String>,
    solved: bool,
}

impl OrderingBoard {
    #[must_use]
    pub fn new(target: impl Into<String>, words: Vec<String>) -> Self {
        let mut board = Self::unshuffled(target, words);
        board.pool.shuffle(&mut rng());
        board
    }

    /// Deterministic constructor for tests: pool order is input order.
    #[must_use]
    pub fn unshuffled(target: impl Into<String>, words: Vec<String>) -> Self {
        Self {
            target: target.into(),
            pool: words,
            built: Vec::new(),
            solved: false,
        }
    }

    #[must_use]
    pub fn target(&self) -> &str {
        &self.target
    }

    /// Words still available to place.
    #[must_use]
    pub fn pool(&self) -> &[String] {
        &self.pool
    }

    /// Words placed so far, in order.
    #[must_use]
    pub fn built(&self) -> &[String] {
        &self.built
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.solved
    }

    /// Move the pool word at `index` to the end of the build area.
    /// Returns false when the index is stale or the board is locked.
    pub fn pick(&mut self, index: usize) -> bool {
        if self.solved || index >= self.pool.len() {
            return false;
        }
        let word = self.pool.remove(index);
        self.built.push(word);
        true
    }

    /// Remove the built word at `index` and return it to the pool.
    pub fn unpick(&mut self, index: usize) -> bool {
        if self.solved || index >= self.built.len() {
            return false;
        }
        let word = self.built.remove(index);
        self.pool.push(word);
        true
    }

    /// Check is only available once every word is placed.
    #[must_use]
    pub fn can_check(&self) -> bool {
        self.pool.is_empty() && !self.solved
    }

    /// The current attempt, words joined with single spaces.
    #[must_use]
    pub fn attempt(&self) -> String {
        self.built.join(" ")
    }

    /// Compare the attempt against the target sentence.
    /// Returns `None` while words remain in the pool or after a correct check.
    pub fn check(&mut self) -> Option<OrderingCheck> {
        if !self.can_check() {
            return None;
        }
        if self.attempt() == self.target {
            self.solved = true;
            Some(OrderingCheck::Correct)
        } else {
            Some(OrderingCheck::TryAgain)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board() -> OrderingBoard {
        OrderingBoard::unshuffled(
            "I like dogs",
            vec!["dogs".into(), "I".into(), "like".into()],
        )
    }

    #[test]
    fn check_requires_empty_pool() {
        let mut board = board();
        assert!(!board.can_check());
        assert_eq!(board.check(), None);

        board.pick(0);
        board.pick(0);
        board.pick(0);
        assert!(board.can_check());
    }

    #[test]
    fn correct_order_solves_and_locks_the_board() {
        let mut board = board();
        // pool: ["dogs", "I", "like"] → build "I like dogs"
        assert!(board.pick(1));
        assert!(board.pick(1));
        assert!(board.pick(0));
        assert_eq!(board.attempt(), "I like dogs");
        assert_eq!(board.check(), Some(OrderingCheck::Correct));
        assert!(board.is_complete());

        // Locked: no more movement, no second check.
        assert!(!board.unpick(0));
        assert_eq!(board.check(), None);
    }

    #[test]
    fn wrong_order_keeps_build_area_intact() {
        let mut board = board();
        board.pick(0);
        board.pick(0);
        board.pick(0);
        assert_eq!(board.attempt(), "dogs I like");
        assert_eq!(board.check(), Some(OrderingCheck::TryAgain));
        assert!(!board.is_complete());
        assert_eq!(board.built().len(), 3);

        // The learner adjusts by removing from an exact position.
        assert!(board.unpick(0));
        assert_eq!(board.built(), ["I", "like"]);
        assert_eq!(board.pool(), ["dogs"]);
        assert!(board.pick(0));
        assert_eq!(board.check(), Some(OrderingCheck::Correct));
    }

    #[test]
    fn attempt_equals_target_iff_correct() {
        let mut board = board();
        board.pick(2);
        board.pick(0);
        board.pick(0);
        let attempt = board.attempt();
        let verdict = board.check();
        assert_eq!(
            verdict == Some(OrderingCheck::Correct),
            attempt == board.target()
        );
    }

    #[test]
    fn stale_indexes_are_rejected() {
        let mut board = board();
        assert!(!board.pick(3));
        assert!(!board.unpick(0));
    }
}
