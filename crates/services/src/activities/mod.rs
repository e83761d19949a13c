//! The four exercise state machines.
//!
//! Each widget is a framework-free state machine: interaction steps return
//! event values the caller consumes, and the fixed UI delays are exported as
//! constants so the view layer schedules them without the machines ever
//! sleeping themselves.

pub mod listening;
pub mod matching;
pub mod ordering;
pub mod speaking;

pub use listening::{AnswerOutcome, ListeningExercise, fetch_and_play};
pub use matching::{MatchAttempt, MatchingBoard};
pub use ordering::{OrderingBoard, OrderingCheck};
pub use speaking::{SpeakingExercise, SpeakingOutcome, SpeakingPhase, grade_recording};
