use async_trait::async_trait;
use quiz_core::model::{SessionState, TopicId};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by storage adapters.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum StorageError {
    #[error("connection error: {0}")]
    Connection(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Namespace prefix shared by all durable session slots.
pub const SLOT_PREFIX: &str = "quiz_state_";

/// Durable slot key for a topic: stable across restarts, collision-free
/// across topics.
#[must_use]
pub fn slot_key(topic_id: &TopicId) -> String {
    format!("{SLOT_PREFIX}{topic_id}")
}

/// Repository contract for per-topic quiz session slots.
///
/// Persistence is best-effort from the caller's point of view: a slot that
/// is absent, or whose payload no longer parses or validates, loads as an
/// empty `SessionState`. Errors are reserved for the storage medium itself
/// being unavailable.
#[async_trait]
pub trait SessionSlotRepository: Send + Sync {
    /// Read the slot for a topic, falling back to an empty state when the
    /// slot is absent or its payload is unusable.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` only when the medium cannot be reached.
    async fn load(&self, topic_id: &TopicId) -> Result<SessionState, StorageError>;

    /// Write the slot for a topic, overwriting any previous value.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the state cannot be stored.
    async fn save(&self, topic_id: &TopicId, state: &SessionState) -> Result<(), StorageError>;

    /// Remove the slot for a topic. Absence is not an error.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be reached.
    async fn clear(&self, topic_id: &TopicId) -> Result<(), StorageError>;

    /// Remove every slot in the namespace except the one for `topic_id`.
    ///
    /// # Errors
    ///
    /// Returns `StorageError` if the medium cannot be reached.
    async fn clear_others(&self, topic_id: &TopicId) -> Result<(), StorageError>;
}

/// Simple in-memory session store for testing and prototyping.
///
/// Keyed by the same namespaced slot keys as the durable backends so the
/// prefix semantics of `clear_others` hold here too.
#[derive(Clone, Default)]
pub struct InMemorySessionStore {
    slots: Arc<Mutex<HashMap<String, SessionState>>>,
}

impl InMemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a slot currently exists for the topic.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Connection` if the store lock is poisoned.
    pub fn contains(&self, topic_id: &TopicId) -> Result<bool, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard.contains_key(&slot_key(topic_id)))
    }
}

#[async_trait]
impl SessionSlotRepository for InMemorySessionStore {
    async fn load(&self, topic_id: &TopicId) -> Result<SessionState, StorageError> {
        let guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        Ok(guard
            .get(&slot_key(topic_id))
            .cloned()
            .unwrap_or_else(SessionState::empty))
    }

    async fn save(&self, topic_id: &TopicId, state: &SessionState) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.insert(slot_key(topic_id), state.clone());
        Ok(())
    }

    async fn clear(&self, topic_id: &TopicId) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        guard.remove(&slot_key(topic_id));
        Ok(())
    }

    async fn clear_others(&self, topic_id: &TopicId) -> Result<(), StorageError> {
        let mut guard = self
            .slots
            .lock()
            .map_err(|e| StorageError::Connection(e.to_string()))?;
        let keep = slot_key(topic_id);
        guard.retain(|key, _| !key.starts_with(SLOT_PREFIX) || *key == keep);
        Ok(())
    }
}

/// Aggregates the session repository behind a trait object for easy backend
/// swapping.
#[derive(Clone)]
pub struct Storage {
    pub sessions: Arc<dyn SessionSlotRepository>,
}

impl Storage {
    #[must_use]
    pub fn in_memory() -> Self {
        Self {
            sessions: Arc::new(InMemorySessionStore::new()),
        }
    }
}
