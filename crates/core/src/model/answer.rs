use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use crate::model::OptionId;

/// One recorded answer for a question within a topic session.
///
/// Records are created through [`AnswerLog::record`]; a record existing at
/// all means the question has been reviewed (`answered` is set at record
/// time and survives persistence round-trips).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnswerRecord {
    question_number: u32,
    selected_answers: Vec<OptionId>,
    is_correct: bool,
    answered: bool,
}

impl AnswerRecord {
    #[must_use]
    pub fn question_number(&self) -> u32 {
        self.question_number
    }

    /// The option ids the user chose, in selection order.
    #[must_use]
    pub fn selected_answers(&self) -> &[OptionId] {
        &self.selected_answers
    }

    #[must_use]
    pub fn is_correct(&self) -> bool {
        self.is_correct
    }

    #[must_use]
    pub fn answered(&self) -> bool {
        self.answered
    }
}

/// Insertion-ordered collection of answer records for one topic session.
///
/// Holds at most one record per question number. Re-recording a question
/// replaces the existing record in place, so the collection order reflects
/// the order questions were first answered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerLog {
    records: Vec<AnswerRecord>,
}

impl AnswerLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an answer for `question_number`, computing correctness as
    /// set-equality between the selected and correct option ids.
    ///
    /// Order and duplicates are irrelevant on both sides. An empty selection
    /// is legal and is correct only when the correct set is also empty.
    pub fn record(
        &mut self,
        question_number: u32,
        selected_answers: Vec<OptionId>,
        correct_answers: &[OptionId],
    ) -> &AnswerRecord {
        let is_correct = sets_equal(&selected_answers, correct_answers);

        if let Some(idx) = self
            .records
            .iter()
            .position(|record| record.question_number == question_number)
        {
            let record = &mut self.records[idx];
            record.selected_answers = selected_answers;
            record.is_correct = is_correct;
            record.answered = true;
            return &self.records[idx];
        }

        self.records.push(AnswerRecord {
            question_number,
            selected_answers,
            is_correct,
            answered: true,
        });
        &self.records[self.records.len() - 1]
    }

    /// Exact lookup by question number.
    #[must_use]
    pub fn find(&self, question_number: u32) -> Option<&AnswerRecord> {
        self.records
            .iter()
            .find(|record| record.question_number == question_number)
    }

    /// Ordered snapshot of all records.
    #[must_use]
    pub fn records(&self) -> &[AnswerRecord] {
        &self.records
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

fn sets_equal(selected: &[OptionId], correct: &[OptionId]) -> bool {
    let selected: BTreeSet<OptionId> = selected.iter().copied().collect();
    let correct: BTreeSet<OptionId> = correct.iter().copied().collect();
    selected == correct
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(values: &[u32]) -> Vec<OptionId> {
        values.iter().copied().map(OptionId::new).collect()
    }

    #[test]
    fn single_choice_correct() {
        let mut log = AnswerLog::new();
        let record = log.record(1, ids(&[2]), &ids(&[2]));
        assert!(record.is_correct());
        assert!(record.answered());
    }

    #[test]
    fn correctness_ignores_order() {
        let mut log = AnswerLog::new();
        let record = log.record(1, ids(&[4, 1]), &ids(&[1, 4]));
        assert!(record.is_correct());
    }

    #[test]
    fn correctness_ignores_duplicates() {
        let mut log = AnswerLog::new();
        // Duplicated selection of a correct option must not stand in for a
        // missing one.
        let record = log.record(1, ids(&[1, 1]), &ids(&[1, 4]));
        assert!(!record.is_correct());

        let record = log.record(2, ids(&[1, 1, 4]), &ids(&[1, 4]));
        assert!(record.is_correct());
    }

    #[test]
    fn partial_multi_select_is_incorrect() {
        let mut log = AnswerLog::new();
        let record = log.record(2, ids(&[1]), &ids(&[1, 4]));
        assert!(!record.is_correct());
    }

    #[test]
    fn superset_selection_is_incorrect() {
        let mut log = AnswerLog::new();
        let record = log.record(2, ids(&[1, 4, 5]), &ids(&[1, 4]));
        assert!(!record.is_correct());
    }

    #[test]
    fn empty_selection_is_incorrect_unless_correct_set_empty() {
        let mut log = AnswerLog::new();
        assert!(!log.record(1, ids(&[]), &ids(&[2])).is_correct());
        assert!(log.record(2, ids(&[]), &ids(&[])).is_correct());
    }

    #[test]
    fn re_recording_replaces_in_place() {
        let mut log = AnswerLog::new();
        log.record(1, ids(&[2]), &ids(&[2]));
        log.record(2, ids(&[3]), &ids(&[3]));
        log.record(1, ids(&[5]), &ids(&[2]));

        assert_eq!(log.len(), 2);
        let numbers: Vec<u32> = log
            .records()
            .iter()
            .map(AnswerRecord::question_number)
            .collect();
        assert_eq!(numbers, vec![1, 2]);

        let first = log.find(1).unwrap();
        assert_eq!(first.selected_answers(), ids(&[5]).as_slice());
        assert!(!first.is_correct());
    }

    #[test]
    fn find_is_exact() {
        let mut log = AnswerLog::new();
        log.record(12, ids(&[1]), &ids(&[1]));
        assert!(log.find(1).is_none());
        assert!(log.find(12).is_some());
    }

    #[test]
    fn record_serializes_with_wire_field_names() {
        let mut log = AnswerLog::new();
        log.record(1, ids(&[2]), &ids(&[2]));
        let json = serde_json::to_string(&log).unwrap();
        assert_eq!(
            json,
            r#"[{"questionNumber":1,"selectedAnswers":[2],"isCorrect":true,"answered":true}]"#
        );
    }
}
