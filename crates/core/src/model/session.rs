use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use thiserror::Error;

use crate::model::{AnswerLog, AnswerRecord, OptionId};

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SessionStateError {
    #[error("duplicate answer record for question {number}")]
    DuplicateQuestion { number: u32 },

    #[error("question number must be positive")]
    InvalidQuestionNumber,
}

/// Aggregate quiz state for one topic.
///
/// This is the durable unit: exactly one `SessionState` exists per topic id
/// in storage, serialized as `{"userAnswers": [...], "totalQuestions": n}`.
/// The total question count is supplied externally and may only become known
/// after the first question fetch, so it starts at zero.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionState {
    #[serde(rename = "userAnswers", default)]
    answers: AnswerLog,
    #[serde(rename = "totalQuestions", default)]
    total_questions: u32,
}

impl SessionState {
    /// A fresh state: no answers, unknown total.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn answers(&self) -> &AnswerLog {
        &self.answers
    }

    #[must_use]
    pub fn total_questions(&self) -> u32 {
        self.total_questions
    }

    /// Record (or replace) the answer for a question.
    pub fn record_answer(
        &mut self,
        question_number: u32,
        selected_answers: Vec<OptionId>,
        correct_answers: &[OptionId],
    ) -> &AnswerRecord {
        self.answers
            .record(question_number, selected_answers, correct_answers)
    }

    /// Set the known total question count.
    ///
    /// Returns `true` when the value actually changed, so callers can skip
    /// a persistence write on the common refetch path.
    pub fn set_total_questions(&mut self, total: u32) -> bool {
        if self.total_questions == total {
            return false;
        }
        self.total_questions = total;
        true
    }

    #[must_use]
    pub fn find_answer(&self, question_number: u32) -> Option<&AnswerRecord> {
        self.answers.find(question_number)
    }

    /// Drop all answers and forget the total.
    pub fn clear(&mut self) {
        *self = Self::default();
    }

    /// Check a restored payload for shapes the recording path can never
    /// produce.
    ///
    /// # Errors
    ///
    /// Returns `SessionStateError::DuplicateQuestion` if two records share a
    /// question number, or `SessionStateError::InvalidQuestionNumber` if a
    /// record carries question number zero.
    pub fn validate(&self) -> Result<(), SessionStateError> {
        let mut seen = BTreeSet::new();
        for record in self.answers.records() {
            let number = record.question_number();
            if number == 0 {
                return Err(SessionStateError::InvalidQuestionNumber);
            }
            if !seen.insert(number) {
                return Err(SessionStateError::DuplicateQuestion { number });
            }
        }
        Ok(())
    }

    /// Aggregate statistics, recomputed from the answer log on every call.
    #[must_use]
    pub fn stats(&self) -> QuizStats {
        let mut answered = 0_u32;
        let mut correct = 0_u32;
        let mut incorrect = 0_u32;

        for record in self.answers.records() {
            if !record.answered() {
                continue;
            }
            answered = answered.saturating_add(1);
            if record.is_correct() {
                correct = correct.saturating_add(1);
            } else {
                incorrect = incorrect.saturating_add(1);
            }
        }

        let percentage = if self.total_questions > 0 {
            (f64::from(correct) / f64::from(self.total_questions) * 100.0).round() as u32
        } else {
            0
        };

        QuizStats {
            total_questions: self.total_questions,
            answered,
            correct,
            incorrect,
            unanswered: self.total_questions.saturating_sub(answered),
            percentage,
        }
    }
}

/// Aggregated view of quiz progress, useful for UI.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct QuizStats {
    pub total_questions: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub percentage: u32,
}
