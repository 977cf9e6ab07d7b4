#![forbid(unsafe_code)]

pub mod error;
pub mod quiz_api;
pub mod session;

pub use error::QuizApiError;
pub use quiz_api::{ApiEnvelope, QuestionResponse, QuestionSource, QuizApiClient, QuizApiConfig};
pub use session::{
    PerformanceBand, QuestionStep, QuizFlowService, SessionManager, SummaryView,
};
