/// Aggregated view of a lesson run, useful for the "Step i/n" header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LessonProgress {
    /// 1-based step for display.
    pub step: usize,
    pub total: usize,
    pub is_complete: bool,
}
