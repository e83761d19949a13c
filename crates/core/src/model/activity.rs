use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ACTIVITY TYPES ────────────────────────────────────────────────────────────
//

/// One word pair in a matching exercise, e.g. an English word and its
/// translation. Serialized as a two-element array on the wire.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WordPair(pub String, pub String);

impl WordPair {
    #[must_use]
    pub fn new(left: impl Into<String>, right: impl Into<String>) -> Self {
        Self(left.into(), right.into())
    }

    /// Returns true if `word` is either side of this pair.
    #[must_use]
    pub fn contains(&self, word: &str) -> bool {
        self.0 == word || self.1 == word
    }

    /// Order-independent pair check.
    #[must_use]
    pub fn links(&self, first: &str, second: &str) -> bool {
        (self.0 == first && self.1 == second) || (self.0 == second && self.1 == first)
    }
}

/// Discriminant for the exercise variants, useful for dispatch and labels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActivityKind {
    Matching,
    Ordering,
    Listening,
    Speaking,
}

impl ActivityKind {
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            ActivityKind::Matching => "matching",
            ActivityKind::Ordering => "ordering",
            ActivityKind::Listening => "listening",
            ActivityKind::Speaking => "speaking",
        }
    }
}

/// One exercise unit within a lesson.
///
/// The wire representation is a tagged object (`"type": "MATCHING"` etc.)
/// matching the backend's lesson content JSON.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Activity {
    Matching {
        title: String,
        pairs: Vec<WordPair>,
    },
    Ordering {
        title: String,
        /// The target sentence the words must rebuild.
        prompt: String,
        words: Vec<String>,
    },
    Listening {
        title: String,
        prompt_audio_text: String,
        options: Vec<String>,
        correct_answer: String,
    },
    Speaking {
        title: String,
        prompt: String,
    },
}

impl Activity {
    #[must_use]
    pub fn title(&self) -> &str {
        match self {
            Activity::Matching { title, .. }
            | Activity::Ordering { title, .. }
            | Activity::Listening { title, .. }
            | Activity::Speaking { title, .. } => title,
        }
    }

    #[must_use]
    pub fn kind(&self) -> ActivityKind {
        match self {
            Activity::Matching { .. } => ActivityKind::Matching,
            Activity::Ordering { .. } => ActivityKind::Ordering,
            Activity::Listening { .. } => ActivityKind::Listening,
            Activity::Speaking { .. } => ActivityKind::Speaking,
        }
    }

    /// Validate the variant payload against its tag.
    ///
    /// A payload that cannot drive its exercise (no pairs, words that cannot
    /// rebuild the target sentence, an answer missing from the options) is an
    /// input error, not a state the widgets recover from.
    ///
    /// # Errors
    ///
    /// Returns `ActivityError` describing the first violation found.
    pub fn validate(&self) -> Result<(), ActivityError> {
        match self {
            Activity::Matching { pairs, .. } => {
                if pairs.is_empty() {
                    return Err(ActivityError::EmptyPairs);
                }
                if pairs
                    .iter()
                    .any(|pair| pair.0.trim().is_empty() || pair.1.trim().is_empty())
                {
                    return Err(ActivityError::BlankPairWord);
                }
                Ok(())
            }
            Activity::Ordering { prompt, words, .. } => {
                let mut given: Vec<&str> = words.iter().map(String::as_str).collect();
                let mut target: Vec<&str> = prompt.split_whitespace().collect();
                if target.is_empty() {
                    return Err(ActivityError::EmptyTarget);
                }
                given.sort_unstable();
                target.sort_unstable();
                if given != target {
                    return Err(ActivityError::WordsMismatch);
                }
                Ok(())
            }
            Activity::Listening {
                options,
                correct_answer,
                ..
            } => {
                if options.is_empty() {
                    return Err(ActivityError::EmptyOptions);
                }
                if !options.iter().any(|option| option == correct_answer) {
                    return Err(ActivityError::UnknownAnswer {
                        answer: correct_answer.clone(),
                    });
                }
                Ok(())
            }
            Activity::Speaking { prompt, .. } => {
                if prompt.trim().is_empty() {
                    return Err(ActivityError::EmptyPrompt);
                }
                Ok(())
            }
        }
    }
}

//
// ─── ACTIVITY VALIDATION ERRORS ────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ActivityError {
    #[error("matching activity has no word pairs")]
    EmptyPairs,

    #[error("matching activity has a blank word in a pair")]
    BlankPairWord,

    #[error("ordering activity has an empty target sentence")]
    EmptyTarget,

    #[error("ordering words cannot rebuild the target sentence")]
    WordsMismatch,

    #[error("listening activity has no answer options")]
    EmptyOptions,

    #[error("correct answer {answer:?} is not among the options")]
    UnknownAnswer { answer: String },

    #[error("speaking activity has an empty prompt")]
    EmptyPrompt,
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//

#[cfg(test)]
mod tests {
    use super::*;

    fn matching(pairs: &[(&str, &str)]) -> Activity {
        Activity::Matching {
            title: "Match the words".into(),
            pairs: pairs.iter().map(|(a, b)| WordPair::new(*a, *b)).collect(),
        }
    }

    #[test]
    fn matching_requires_pairs() {
        let err = matching(&[]).validate().unwrap_err();
        assert_eq!(err, ActivityError::EmptyPairs);
    }

    #[test]
    fn matching_rejects_blank_words() {
        let err = matching(&[("cat", "  ")]).validate().unwrap_err();
        assert_eq!(err, ActivityError::BlankPairWord);
    }

    #[test]
    fn ordering_accepts_word_permutations() {
        let activity = Activity::Ordering {
            title: "Build the sentence".into(),
            prompt: "I like dogs".into(),
            words: vec!["dogs".into(), "I".into(), "like".into()],
        };
        assert!(activity.validate().is_ok());
    }

    #[test]
    fn ordering_rejects_unbuildable_sentence() {
        let activity = Activity::Ordering {
            title: "Build the sentence".into(),
            prompt: "I like dogs".into(),
            words: vec!["I".into(), "like".into(), "cats".into()],
        };
        assert_eq!(
            activity.validate().unwrap_err(),
            ActivityError::WordsMismatch
        );
    }

    #[test]
    fn listening_answer_must_be_an_option() {
        let activity = Activity::Listening {
            title: "What did you hear?".into(),
            prompt_audio_text: "apple".into(),
            options: vec!["apple".into(), "apply".into()],
            correct_answer: "grape".into(),
        };
        assert!(matches!(
            activity.validate().unwrap_err(),
            ActivityError::UnknownAnswer { .. }
        ));
    }

    #[test]
    fn speaking_prompt_must_not_be_blank() {
        let activity = Activity::Speaking {
            title: "Say it".into(),
            prompt: "   ".into(),
        };
        assert_eq!(activity.validate().unwrap_err(), ActivityError::EmptyPrompt);
    }

    #[test]
    fn wire_format_uses_screaming_type_tag() {
        let json = r#"{
            "type": "MATCHING",
            "title": "Match the words",
            "pairs": [["cat", "chat"], ["dog", "chien"]]
        }"#;
        let activity: Activity = serde_json::from_str(json).unwrap();
        assert_eq!(activity.kind(), ActivityKind::Matching);
        assert_eq!(activity.title(), "Match the words");

        let back = serde_json::to_value(&activity).unwrap();
        assert_eq!(back["type"], "MATCHING");
        assert_eq!(back["pairs"][0][1], "chat");
    }
}
