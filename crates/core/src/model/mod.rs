mod answer;
mod ids;
mod question;
mod session;
mod topic;

pub use answer::{AnswerLog, AnswerRecord};
pub use ids::{OptionId, QuestionId, TopicId};
pub use question::{
    Language, LocalizedQuestion, Navigation, Question, QuestionLocales, QuestionOption,
};
pub use session::{QuizStats, SessionState, SessionStateError};
pub use topic::{Topic, TopicCatalog};
