use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use quiz_core::model::{Navigation, Question, TopicCatalog, TopicId};

use crate::error::QuizApiError;

#[derive(Clone, Debug)]
pub struct QuizApiConfig {
    pub base_url: String,
}

impl QuizApiConfig {
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    #[must_use]
    pub fn from_env() -> Self {
        let base_url =
            env::var("QUIZ_API_BASE_URL").unwrap_or_else(|_| "http://localhost:3001".into());
        Self { base_url }
    }
}

/// Envelope every quiz API endpoint wraps its payload in.
#[derive(Debug, Deserialize)]
#[serde(bound(deserialize = "T: Deserialize<'de>"))]
pub struct ApiEnvelope<T> {
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub data: Option<T>,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, honoring the `success` flag.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError::Rejected` with the server's message when
    /// `success` is false, or `QuizApiError::MissingData` when a successful
    /// envelope carries no payload.
    pub fn into_data(self) -> Result<T, QuizApiError> {
        if !self.success {
            return Err(QuizApiError::Rejected(self.message));
        }
        self.data.ok_or(QuizApiError::MissingData)
    }
}

/// Payload of the question-by-number endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct QuestionResponse {
    pub question: Question,
    pub navigation: Navigation,
}

/// Read-only source of quiz content.
///
/// The remote API is the production implementation; flows and tests inject
/// fakes through this seam.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Fetch all topics with their question counts.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures or a rejecting envelope.
    async fn topics(&self) -> Result<TopicCatalog, QuizApiError>;

    /// Fetch one question of a topic by its 1-based number.
    ///
    /// # Errors
    ///
    /// Returns `QuizApiError` on transport failures or a rejecting envelope.
    async fn question(
        &self,
        topic_id: &TopicId,
        number: u32,
    ) -> Result<QuestionResponse, QuizApiError>;
}

/// HTTP client for the remote quiz API.
#[derive(Clone)]
pub struct QuizApiClient {
    client: Client,
    config: QuizApiConfig,
}

impl QuizApiClient {
    #[must_use]
    pub fn from_env() -> Self {
        Self::new(QuizApiConfig::from_env())
    }

    #[must_use]
    pub fn new(config: QuizApiConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{path}", self.config.base_url.trim_end_matches('/'))
    }

    async fn get_enveloped<T: DeserializeOwned>(&self, url: String) -> Result<T, QuizApiError> {
        let response = self.client.get(url).send().await?;

        if !response.status().is_success() {
            return Err(QuizApiError::HttpStatus(response.status()));
        }

        let envelope: ApiEnvelope<T> = response.json().await?;
        envelope.into_data()
    }
}

#[async_trait]
impl QuestionSource for QuizApiClient {
    async fn topics(&self) -> Result<TopicCatalog, QuizApiError> {
        self.get_enveloped(self.endpoint("/api/topics/with-questions-count"))
            .await
    }

    async fn question(
        &self,
        topic_id: &TopicId,
        number: u32,
    ) -> Result<QuestionResponse, QuizApiError> {
        self.get_enveloped(self.endpoint(&format!(
            "/api/questions/topic/{topic_id}/navigate/{number}"
        )))
        .await
    }
}
