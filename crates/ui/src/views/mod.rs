mod activity_widgets;
mod chat;
mod components;
mod lesson;
mod lessons;
mod login;
mod score;
mod signup;
mod state;

pub use chat::ChatView;
pub use components::LevelBar;
pub use lesson::LessonView;
pub use lessons::LessonsView;
pub use login::LoginView;
pub use score::ScoreView;
pub use signup::SignUpView;
pub use state::{ViewError, ViewState, view_state_from_resource};
