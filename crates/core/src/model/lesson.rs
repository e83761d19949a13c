use thiserror::Error;

use crate::model::{Activity, ActivityError, LessonId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum LessonError {
    #[error("lesson has no activities")]
    NoActivities,

    #[error("invalid activity at index {index}: {source}")]
    InvalidActivity {
        index: usize,
        source: ActivityError,
    },
}

/// Read-only snapshot of a lesson as served by the backend.
///
/// The snapshot itself is plain data; `validate` is run before a lesson is
/// listed or a run is started, so malformed content is rejected up front
/// instead of surfacing mid-exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Lesson {
    id: LessonId,
    title: String,
    activities: Vec<Activity>,
    completed: bool,
}

impl Lesson {
    #[must_use]
    pub fn new(
        id: LessonId,
        title: impl Into<String>,
        activities: Vec<Activity>,
        completed: bool,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            activities,
            completed,
        }
    }

    /// Check the activity sequence against the data-model invariants.
    ///
    /// # Errors
    ///
    /// Returns `LessonError::NoActivities` for an empty lesson and
    /// `LessonError::InvalidActivity` for the first malformed payload.
    pub fn validate(&self) -> Result<(), LessonError> {
        if self.activities.is_empty() {
            return Err(LessonError::NoActivities);
        }
        for (index, activity) in self.activities.iter().enumerate() {
            activity
                .validate()
                .map_err(|source| LessonError::InvalidActivity { index, source })?;
        }
        Ok(())
    }

    #[must_use]
    pub fn id(&self) -> LessonId {
        self.id
    }

    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    #[must_use]
    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    #[must_use]
    pub fn activity(&self, index: usize) -> Option<&Activity> {
        self.activities.get(index)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.activities.is_empty()
    }

    #[must_use]
    pub fn completed(&self) -> bool {
        self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::WordPair;

    fn pairs_activity() -> Activity {
        Activity::Matching {
            title: "Match".into(),
            pairs: vec![WordPair::new("cat", "chat")],
        }
    }

    #[test]
    fn lesson_requires_activities() {
        let lesson = Lesson::new(LessonId::new(1), "Empty", Vec::new(), false);
        assert_eq!(lesson.validate().unwrap_err(), LessonError::NoActivities);
    }

    #[test]
    fn lesson_reports_invalid_activity_index() {
        let broken = Activity::Matching {
            title: "Match".into(),
            pairs: Vec::new(),
        };
        let lesson = Lesson::new(
            LessonId::new(1),
            "Unit 1",
            vec![pairs_activity(), broken],
            false,
        );
        assert_eq!(
            lesson.validate().unwrap_err(),
            LessonError::InvalidActivity {
                index: 1,
                source: ActivityError::EmptyPairs,
            }
        );
    }

    #[test]
    fn lesson_exposes_activity_sequence() {
        let lesson = Lesson::new(
            LessonId::new(7),
            "Unit 1",
            vec![pairs_activity(), pairs_activity()],
            true,
        );
        assert!(lesson.validate().is_ok());
        assert_eq!(lesson.len(), 2);
        assert!(lesson.completed());
        assert!(lesson.activity(1).is_some());
        assert!(lesson.activity(2).is_none());
    }
}
