use quiz_core::model::QuizStats;

/// Coarse performance banding for the summary screen, derived from the
/// score percentage. Thresholds follow the product's grading copy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PerformanceBand {
    Excellent,
    Strong,
    Solid,
    Pass,
    NeedsReview,
}

impl PerformanceBand {
    #[must_use]
    pub fn from_percentage(percentage: u32) -> Self {
        match percentage {
            90.. => Self::Excellent,
            80..=89 => Self::Strong,
            70..=79 => Self::Solid,
            60..=69 => Self::Pass,
            _ => Self::NeedsReview,
        }
    }
}

/// Presentation-agnostic summary of a quiz session.
///
/// This is intentionally **not** a UI view-model:
/// - no pre-formatted strings
/// - no localization assumptions
///
/// The UI picks wording and styling per band as needed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryView {
    pub total_questions: u32,
    pub answered: u32,
    pub correct: u32,
    pub incorrect: u32,
    pub unanswered: u32,
    pub percentage: u32,
    pub band: PerformanceBand,
}

impl SummaryView {
    #[must_use]
    pub fn from_stats(stats: &QuizStats) -> Self {
        Self {
            total_questions: stats.total_questions,
            answered: stats.answered,
            correct: stats.correct,
            incorrect: stats.incorrect,
            unanswered: stats.unanswered,
            percentage: stats.percentage,
            band: PerformanceBand::from_percentage(stats.percentage),
        }
    }
}
