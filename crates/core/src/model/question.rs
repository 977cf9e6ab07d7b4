use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::{OptionId, QuestionId, TopicId};

/// Display language for question content.
///
/// Which language is shown is a presentation concern; both locales always
/// travel with the question.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    En,
    Es,
}

/// One selectable option in a localized question body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub text: String,
}

/// Question content in a single language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocalizedQuestion {
    pub question: String,
    pub options: Vec<QuestionOption>,
    pub explanation: String,
}

/// All localizations of a question's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionLocales {
    pub en: LocalizedQuestion,
    pub es: LocalizedQuestion,
}

/// A single quiz question as delivered by the navigate endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub topic_id: TopicId,
    pub number: u32,
    pub correct_answers: Vec<OptionId>,
    pub locales: QuestionLocales,
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
    #[serde(rename = "updatedAt")]
    pub updated_at: DateTime<Utc>,
}

impl Question {
    /// Content for the requested display language.
    #[must_use]
    pub fn locale(&self, language: Language) -> &LocalizedQuestion {
        match language {
            Language::En => &self.locales.en,
            Language::Es => &self.locales.es,
        }
    }

    /// Whether the consumer should offer multi-select input.
    #[must_use]
    pub fn is_multiple_choice(&self) -> bool {
        self.correct_answers.len() > 1
    }
}

/// Position of a question within its topic, as reported by the API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Navigation {
    pub current: u32,
    pub total: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub previous_number: u32,
    pub next_number: u32,
}
