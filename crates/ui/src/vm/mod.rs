mod auth_vm;
mod lesson_vm;

pub use auth_vm::{AuthState, force_sign_out};
pub use lesson_vm::{ActivityVm, LessonVm};
