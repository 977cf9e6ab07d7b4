mod manager;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use manager::SessionManager;
pub use view::{PerformanceBand, SummaryView};
pub use workflow::{QuestionStep, QuizFlowService};
