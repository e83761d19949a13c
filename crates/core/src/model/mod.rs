mod activity;
mod credential;
mod ids;
mod lesson;
mod progress;

pub use activity::{Activity, ActivityError, ActivityKind, WordPair};
pub use credential::Credential;
pub use ids::LessonId;
pub use lesson::{Lesson, LessonError};
pub use progress::{Progress, XP_PER_LEVEL};
