use thiserror::Error;

use crate::model::ActivityError;
use crate::model::LessonError;

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Activity(#[from] ActivityError),
    #[error(transparent)]
    Lesson(#[from] LessonError),
}
