use async_trait::async_trait;
use sqlx::Row;

use crate::repository::{SLOT_PREFIX, SessionSlotRepository, StorageError, slot_key};
use quiz_core::model::{SessionState, TopicId};

use super::SqliteSessionStore;

#[async_trait]
impl SessionSlotRepository for SqliteSessionStore {
    async fn load(&self, topic_id: &TopicId) -> Result<SessionState, StorageError> {
        let row = sqlx::query("SELECT payload FROM session_slots WHERE slot_key = ?1")
            .bind(slot_key(topic_id))
            .fetch_optional(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        let Some(row) = row else {
            return Ok(SessionState::empty());
        };

        let payload: String = row
            .try_get("payload")
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        Ok(decode_slot(topic_id, &payload))
    }

    async fn save(&self, topic_id: &TopicId, state: &SessionState) -> Result<(), StorageError> {
        let payload = serde_json::to_string(state)
            .map_err(|err| StorageError::Serialization(err.to_string()))?;

        sqlx::query(
            r"
            INSERT INTO session_slots (slot_key, payload)
            VALUES (?1, ?2)
            ON CONFLICT(slot_key) DO UPDATE SET
                payload = excluded.payload
            ",
        )
        .bind(slot_key(topic_id))
        .bind(payload)
        .execute(&self.pool)
        .await
        .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear(&self, topic_id: &TopicId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_slots WHERE slot_key = ?1")
            .bind(slot_key(topic_id))
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }

    async fn clear_others(&self, topic_id: &TopicId) -> Result<(), StorageError> {
        sqlx::query("DELETE FROM session_slots WHERE slot_key LIKE ?1 AND slot_key != ?2")
            .bind(format!("{SLOT_PREFIX}%"))
            .bind(slot_key(topic_id))
            .execute(&self.pool)
            .await
            .map_err(|err| StorageError::Connection(err.to_string()))?;

        Ok(())
    }
}

/// Decode a stored payload, falling back to an empty state when it no longer
/// parses or validates. Corrupt slots are a recoverable condition: the user
/// loses saved progress for that topic, nothing else.
fn decode_slot(topic_id: &TopicId, payload: &str) -> SessionState {
    let state = match serde_json::from_str::<SessionState>(payload) {
        Ok(state) => state,
        Err(err) => {
            tracing::warn!(topic = %topic_id, error = %err, "discarding unreadable session slot");
            return SessionState::empty();
        }
    };

    if let Err(err) = state.validate() {
        tracing::warn!(topic = %topic_id, error = %err, "discarding invalid session slot");
        return SessionState::empty();
    }

    state
}
