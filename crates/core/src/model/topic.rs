use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::TopicId;

/// A quiz topic as delivered by the topic-list endpoint.
///
/// The upstream API mixes naming styles (`image_url` next to `createdAt`);
/// the wire names are preserved exactly rather than normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Topic {
    pub id: TopicId,
    pub name: String,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub questions_count: Option<u32>,
    #[serde(rename = "createdAt", default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(rename = "updatedAt", default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Topic-list payload: all topics plus corpus-wide counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopicCatalog {
    pub topics: Vec<Topic>,
    pub total_topics: u32,
    pub total_questions: u32,
}
