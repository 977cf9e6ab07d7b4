use std::fmt;
use std::sync::Arc;

use quiz_core::model::{
    AnswerRecord, Navigation, OptionId, Question, QuizStats, SessionState, TopicId,
};
use storage::repository::SessionSlotRepository;

/// The single authority for the active topic's quiz progress.
///
/// Composes the answer log with the durable slot repository. Every mutation
/// is applied in memory first and then persisted before control returns, so
/// callers may treat statistics as durable immediately afterwards. Storage
/// failures are logged and absorbed here; in-memory state stays
/// authoritative for the rest of the process lifetime, and no storage error
/// ever reaches a caller.
///
/// Before the first activation the manager answers queries with empty
/// values (rendering may happen before the restore completes) and ignores
/// mutations.
pub struct SessionManager {
    slots: Arc<dyn SessionSlotRepository>,
    active: Option<ActiveSession>,
}

struct ActiveSession {
    topic_id: TopicId,
    state: SessionState,
}

impl SessionManager {
    #[must_use]
    pub fn new(slots: Arc<dyn SessionSlotRepository>) -> Self {
        Self {
            slots,
            active: None,
        }
    }

    /// The topic this manager currently serves, if any.
    #[must_use]
    pub fn active_topic(&self) -> Option<&TopicId> {
        self.active.as_ref().map(|session| &session.topic_id)
    }

    /// Make a topic the active session, restoring its persisted state.
    ///
    /// Activation is keyed on the topic id: re-activating the topic that is
    /// already active is a no-op, so in-memory mutations are never discarded
    /// by a redundant reload. A different topic drops the previous topic's
    /// in-memory state before its slot is read.
    pub async fn activate(&mut self, topic_id: TopicId) {
        if self
            .active
            .as_ref()
            .is_some_and(|session| session.topic_id == topic_id)
        {
            return;
        }

        self.active = None;
        let state = match self.slots.load(&topic_id).await {
            Ok(state) => state,
            Err(err) => {
                tracing::warn!(topic = %topic_id, error = %err, "session slot unavailable, starting fresh");
                SessionState::empty()
            }
        };
        self.active = Some(ActiveSession { topic_id, state });
    }

    /// Record (or replace) the answer for a question and persist the updated
    /// state before returning.
    ///
    /// Returns `None` before the first activation, otherwise the record.
    pub async fn record_answer(
        &mut self,
        question_number: u32,
        selected_answers: Vec<OptionId>,
        correct_answers: &[OptionId],
    ) -> Option<AnswerRecord> {
        let session = self.active.as_mut()?;
        let record = session
            .state
            .record_answer(question_number, selected_answers, correct_answers)
            .clone();

        if let Err(err) = self.slots.save(&session.topic_id, &session.state).await {
            tracing::warn!(topic = %session.topic_id, error = %err, "failed to persist session state");
        }

        Some(record)
    }

    /// Update the known total question count.
    ///
    /// Safe to call on every question fetch: an unchanged value is an
    /// idempotent no-op and writes nothing.
    pub async fn update_total_questions(&mut self, total: u32) {
        let Some(session) = self.active.as_mut() else {
            return;
        };
        if !session.state.set_total_questions(total) {
            return;
        }

        if let Err(err) = self.slots.save(&session.topic_id, &session.state).await {
            tracing::warn!(topic = %session.topic_id, error = %err, "failed to persist session state");
        }
    }

    /// Apply a fetched question's navigation data to the active session.
    ///
    /// A response originating from a topic other than the active one is
    /// stale — the user navigated away before the request resolved — and is
    /// discarded. Returns whether the response was applied.
    pub async fn apply_fetched_question(
        &mut self,
        question: &Question,
        navigation: &Navigation,
    ) -> bool {
        let Some(session) = self.active.as_ref() else {
            return false;
        };
        if session.topic_id != question.topic_id {
            tracing::debug!(
                active = %session.topic_id,
                response = %question.topic_id,
                "discarding stale question response"
            );
            return false;
        }

        self.update_total_questions(navigation.total).await;
        true
    }

    /// Aggregate statistics for the active topic; all-zero before the first
    /// activation.
    #[must_use]
    pub fn stats(&self) -> QuizStats {
        self.active
            .as_ref()
            .map(|session| session.state.stats())
            .unwrap_or_default()
    }

    /// Prior answer for a question, for pre-filling a revisited question's
    /// input and showing its result view immediately.
    #[must_use]
    pub fn question_answer(&self, question_number: u32) -> Option<&AnswerRecord> {
        self.active.as_ref()?.state.find_answer(question_number)
    }

    /// Clear the active topic's answers and its durable slot.
    ///
    /// The manager stays active for the same topic with empty data.
    pub async fn reset(&mut self) {
        let Some(session) = self.active.as_mut() else {
            return;
        };
        session.state.clear();

        if let Err(err) = self.slots.clear(&session.topic_id).await {
            tracing::warn!(topic = %session.topic_id, error = %err, "failed to clear session slot");
        }
    }

    /// Purge the durable slots of every topic except the active one.
    ///
    /// The only cross-topic mutation in the system; it never touches the
    /// active topic's slot.
    pub async fn clear_other_topics(&self) {
        let Some(session) = self.active.as_ref() else {
            return;
        };

        if let Err(err) = self.slots.clear_others(&session.topic_id).await {
            tracing::warn!(topic = %session.topic_id, error = %err, "failed to purge other session slots");
        }
    }
}

impl fmt::Debug for SessionManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionManager")
            .field("active_topic", &self.active_topic())
            .field("stats", &self.stats())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use storage::repository::{InMemorySessionStore, StorageError};

    fn ids(values: &[u32]) -> Vec<OptionId> {
        values.iter().copied().map(OptionId::new).collect()
    }

    fn manager_with_store() -> (SessionManager, InMemorySessionStore) {
        let store = InMemorySessionStore::new();
        (SessionManager::new(Arc::new(store.clone())), store)
    }

    fn question_for(topic: &str, number: u32) -> Question {
        let json = format!(
            r#"{{
                "id": "q-{number}",
                "topic_id": "{topic}",
                "number": {number},
                "correct_answers": [2],
                "locales": {{
                    "en": {{"question": "Q?", "options": [{{"id": 1, "text": "a"}}, {{"id": 2, "text": "b"}}], "explanation": ""}},
                    "es": {{"question": "¿Q?", "options": [{{"id": 1, "text": "a"}}, {{"id": 2, "text": "b"}}], "explanation": ""}}
                }},
                "createdAt": "2024-05-01T10:00:00Z",
                "updatedAt": "2024-05-01T10:00:00Z"
            }}"#
        );
        serde_json::from_str(&json).unwrap()
    }

    fn navigation(current: u32, total: u32) -> Navigation {
        Navigation {
            current,
            total,
            has_previous: current > 1,
            has_next: current < total,
            previous_number: current.saturating_sub(1).max(1),
            next_number: (current + 1).min(total),
        }
    }

    #[tokio::test]
    async fn uninitialized_manager_reports_zeros_and_ignores_mutations() {
        let (mut manager, store) = manager_with_store();

        assert_eq!(manager.stats(), QuizStats::default());
        assert!(manager.question_answer(1).is_none());

        let record = manager.record_answer(1, ids(&[2]), &ids(&[2])).await;
        assert!(record.is_none());
        manager.update_total_questions(5).await;
        manager.reset().await;
        manager.clear_other_topics().await;

        assert!(!store.contains(&TopicId::new("t1")).unwrap());
    }

    #[tokio::test]
    async fn fresh_activation_reports_zero_stats() {
        let (mut manager, _store) = manager_with_store();
        manager.activate(TopicId::new("t1")).await;

        let stats = manager.stats();
        assert_eq!(stats, QuizStats::default());
        assert_eq!(manager.active_topic(), Some(&TopicId::new("t1")));
    }

    #[tokio::test]
    async fn recording_updates_stats_and_persists_immediately() {
        let (mut manager, store) = manager_with_store();
        let topic = TopicId::new("t1");
        manager.activate(topic.clone()).await;
        manager.update_total_questions(5).await;

        let record = manager.record_answer(1, ids(&[2]), &ids(&[2])).await.unwrap();
        assert!(record.is_correct());

        let stats = manager.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.unanswered, 4);
        assert_eq!(stats.percentage, 20);

        // a second manager over the same store sees the durable state
        let mut other = SessionManager::new(Arc::new(store));
        other.activate(topic).await;
        assert_eq!(other.stats(), stats);
    }

    #[tokio::test]
    async fn re_answering_replaces_the_record() {
        let (mut manager, _store) = manager_with_store();
        manager.activate(TopicId::new("t1")).await;
        manager.update_total_questions(5).await;

        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;
        manager.record_answer(1, ids(&[3]), &ids(&[2])).await;

        let stats = manager.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.correct, 0);
        assert_eq!(stats.incorrect, 1);
    }

    #[tokio::test]
    async fn re_activation_of_same_topic_keeps_in_memory_state() {
        let (mut manager, store) = manager_with_store();
        let topic = TopicId::new("t1");
        manager.activate(topic.clone()).await;
        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;

        // storage changes behind the manager's back
        store.save(&topic, &SessionState::empty()).await.unwrap();

        manager.activate(topic).await;
        assert_eq!(manager.stats().answered, 1);
    }

    #[tokio::test]
    async fn switching_topics_isolates_and_restores_state() {
        let (mut manager, _store) = manager_with_store();
        let t1 = TopicId::new("t1");
        let t2 = TopicId::new("t2");

        manager.activate(t1.clone()).await;
        manager.update_total_questions(5).await;
        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;

        manager.activate(t2).await;
        assert_eq!(manager.stats(), QuizStats::default());

        manager.activate(t1).await;
        let stats = manager.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.total_questions, 5);
    }

    #[tokio::test]
    async fn stale_question_response_is_discarded() {
        let (mut manager, _store) = manager_with_store();
        manager.activate(TopicId::new("t1")).await;

        let stale = question_for("t2", 1);
        assert!(!manager.apply_fetched_question(&stale, &navigation(1, 9)).await);
        assert_eq!(manager.stats().total_questions, 0);

        let fresh = question_for("t1", 1);
        assert!(manager.apply_fetched_question(&fresh, &navigation(1, 9)).await);
        assert_eq!(manager.stats().total_questions, 9);
    }

    #[tokio::test]
    async fn reset_clears_memory_and_slot_but_stays_active() {
        let (mut manager, store) = manager_with_store();
        let topic = TopicId::new("t1");
        manager.activate(topic.clone()).await;
        manager.update_total_questions(5).await;
        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;
        assert!(store.contains(&topic).unwrap());

        manager.reset().await;

        assert_eq!(manager.stats(), QuizStats::default());
        assert_eq!(manager.active_topic(), Some(&topic));
        assert!(!store.contains(&topic).unwrap());

        // still usable after the reset
        manager.record_answer(1, ids(&[1]), &ids(&[2])).await;
        assert_eq!(manager.stats().incorrect, 1);
    }

    #[tokio::test]
    async fn clear_other_topics_spares_the_active_slot() {
        let (mut manager, store) = manager_with_store();

        manager.activate(TopicId::new("t1")).await;
        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;

        manager.activate(TopicId::new("t2")).await;
        manager.record_answer(1, ids(&[2]), &ids(&[2])).await;
        manager.clear_other_topics().await;

        assert!(!store.contains(&TopicId::new("t1")).unwrap());
        assert!(store.contains(&TopicId::new("t2")).unwrap());
    }

    /// A store whose every operation fails, for exercising absorption.
    #[derive(Clone, Default)]
    struct BrokenStore;

    #[async_trait]
    impl SessionSlotRepository for BrokenStore {
        async fn load(&self, _topic_id: &TopicId) -> Result<SessionState, StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }

        async fn save(
            &self,
            _topic_id: &TopicId,
            _state: &SessionState,
        ) -> Result<(), StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }

        async fn clear(&self, _topic_id: &TopicId) -> Result<(), StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }

        async fn clear_others(&self, _topic_id: &TopicId) -> Result<(), StorageError> {
            Err(StorageError::Connection("storage offline".into()))
        }
    }

    #[tokio::test]
    async fn storage_failures_never_reach_the_caller() {
        let mut manager = SessionManager::new(Arc::new(BrokenStore));
        manager.activate(TopicId::new("t1")).await;
        manager.update_total_questions(5).await;

        let record = manager.record_answer(1, ids(&[2]), &ids(&[2])).await.unwrap();
        assert!(record.is_correct());

        let stats = manager.stats();
        assert_eq!(stats.answered, 1);
        assert_eq!(stats.percentage, 20);

        manager.reset().await;
        assert_eq!(manager.stats(), QuizStats::default());
        manager.clear_other_topics().await;
    }

    #[test]
    fn debug_does_not_require_a_debug_store() {
        let manager = SessionManager::new(Arc::new(InMemorySessionStore::new()));
        let rendered = format!("{manager:?}");
        assert!(rendered.contains("SessionManager"));
    }
}
