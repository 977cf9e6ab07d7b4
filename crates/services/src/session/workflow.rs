use std::sync::Arc;

use quiz_core::model::{AnswerRecord, Navigation, OptionId, Question, TopicCatalog, TopicId};

use super::manager::SessionManager;
use super::view::SummaryView;
use crate::error::QuizApiError;
use crate::quiz_api::{QuestionResponse, QuestionSource};

/// One loaded question step: the content, its position within the topic,
/// and any prior answer so a revisited question renders pre-filled with its
/// result view shown immediately.
#[derive(Debug, Clone)]
pub struct QuestionStep {
    pub question: Question,
    pub navigation: Navigation,
    pub prior: Option<AnswerRecord>,
}

/// Orchestrates the page sequence over a question source and the session
/// manager: topic list, topic activation, question loading, answering,
/// restart, summary.
pub struct QuizFlowService {
    source: Arc<dyn QuestionSource>,
    manager: SessionManager,
}

impl QuizFlowService {
    #[must_use]
    pub fn new(source: Arc<dyn QuestionSource>, manager: SessionManager) -> Self {
        Self { source, manager }
    }

    #[must_use]
    pub fn manager(&self) -> &SessionManager {
        &self.manager
    }

    /// Fetch the topic catalog.
    ///
    /// # Errors
    ///
    /// Propagates `QuizApiError` so the caller can offer a retry.
    pub async fn topics(&self) -> Result<TopicCatalog, QuizApiError> {
        self.source.topics().await
    }

    /// Make a topic the active session: restore its saved progress, then
    /// purge every other topic's durable slot.
    pub async fn open_topic(&mut self, topic_id: TopicId) {
        self.manager.activate(topic_id).await;
        self.manager.clear_other_topics().await;
    }

    /// Load one question of the active topic by number.
    ///
    /// Returns `Ok(None)` when no topic is active, or when the response
    /// turned out to be stale for the session by the time it arrived.
    ///
    /// # Errors
    ///
    /// Propagates `QuizApiError` so the caller can offer a retry; no state
    /// is committed on failure.
    pub async fn load_question(
        &mut self,
        number: u32,
    ) -> Result<Option<QuestionStep>, QuizApiError> {
        let Some(topic_id) = self.manager.active_topic().cloned() else {
            return Ok(None);
        };

        let QuestionResponse {
            question,
            navigation,
        } = self.source.question(&topic_id, number).await?;

        if !self
            .manager
            .apply_fetched_question(&question, &navigation)
            .await
        {
            return Ok(None);
        }

        let prior = self.manager.question_answer(question.number).cloned();
        Ok(Some(QuestionStep {
            question,
            navigation,
            prior,
        }))
    }

    /// Record the user's selection for a question.
    ///
    /// Validation that at least one option is selected belongs to the
    /// presentation layer; an empty selection is recorded as-is.
    pub async fn submit_answer(
        &mut self,
        question: &Question,
        selected_answers: Vec<OptionId>,
    ) -> Option<AnswerRecord> {
        self.manager
            .record_answer(question.number, selected_answers, &question.correct_answers)
            .await
    }

    /// Restart the active topic's quiz from scratch.
    pub async fn restart(&mut self) {
        self.manager.reset().await;
    }

    /// Summary of the active session, all-zero when nothing is active.
    #[must_use]
    pub fn summary(&self) -> SummaryView {
        SummaryView::from_stats(&self.manager.stats())
    }
}
