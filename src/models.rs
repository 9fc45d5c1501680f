//! Data models for the survey dashboard.
//!
//! This module contains the core data structures used throughout
//! the application for representing responses, aggregates, and reports.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Labels for the five competency questions, in scan order (Q3..Q7).
///
/// The order is a contract: the top-competency selection scans this
/// array left to right and keeps the first maximum, so tied scores
/// always resolve to the same label across runs.
pub const COMPETENCY_LABELS: [&str; 5] = [
    "角色任務認知", // Q3 role & task awareness
    "劇本理解力",   // Q4 script comprehension
    "演出技巧",     // Q5 performance technique
    "回饋技巧",     // Q6 feedback technique
    "講師引導吸收", // Q7 instructor guidance uptake
];

/// One respondent's survey submission, with numeric fields already coerced.
///
/// `q3..q7` are competency scores on a 1-5 scale, `q8_pre`/`q8_post` are
/// confidence scores on a 1-10 scale, and `q10`/`q12`/`q13` are
/// satisfaction scores on a 1-5 scale. Any raw value that failed numeric
/// coercion arrives here as `0.0` (see [`crate::source`]).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SurveyRecord {
    /// Respondent number, unique per record. Assigned from source order
    /// when the endpoint omits it.
    pub id: u64,
    pub q3: f64,
    pub q4: f64,
    pub q5: f64,
    pub q6: f64,
    pub q7: f64,
    pub q8_pre: f64,
    pub q8_post: f64,
    pub q10: f64,
    pub q12: f64,
    pub q13: f64,
    /// Free-text answer to Q14 (touching moment), if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q14: Option<String>,
    /// Free-text answer to Q15 (suggestions), if given.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q15: Option<String>,
}

/// Per-question arithmetic means across all records.
///
/// Every field is rounded to exactly one fractional digit. The rounding
/// is part of the contract: these values feed user-visible numbers and
/// the insight selector directly.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AggregateMeans {
    pub q3: f64,
    pub q4: f64,
    pub q5: f64,
    pub q6: f64,
    pub q7: f64,
    pub q8_pre: f64,
    pub q8_post: f64,
    pub q10: f64,
    pub q12: f64,
    pub q13: f64,
}

impl AggregateMeans {
    /// Returns the five competency means paired with their labels,
    /// in the fixed Q3..Q7 scan order.
    pub fn competencies(&self) -> [(&'static str, f64); 5] {
        [
            (COMPETENCY_LABELS[0], self.q3),
            (COMPETENCY_LABELS[1], self.q4),
            (COMPETENCY_LABELS[2], self.q5),
            (COMPETENCY_LABELS[3], self.q6),
            (COMPETENCY_LABELS[4], self.q7),
        ]
    }
}

/// The competency with the strictly greatest mean.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompetencyInsight {
    /// Human-readable label of the question.
    pub name: String,
    /// The competency's mean score.
    pub score: f64,
}

/// Derived, human-readable facts computed from aggregate means.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Insights {
    /// Post-training minus pre-training confidence mean, one decimal.
    /// Negative values are legitimate and are surfaced verbatim.
    pub confidence_growth: f64,
    /// First-max-wins top competency across Q3..Q7.
    pub top_competency: CompetencyInsight,
}

/// One quote on the feedback wall.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WallEntry {
    /// Respondent number the quote belongs to.
    pub id: u64,
    pub text: String,
}

/// Free-text comments grouped by question, filtered for display.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct FeedbackWall {
    /// Q14 — touching moments.
    pub touching: Vec<WallEntry>,
    /// Q15 — suggestions.
    pub suggestions: Vec<WallEntry>,
}

impl FeedbackWall {
    /// Collects displayable comments from the records.
    ///
    /// A comment is skipped when it is absent, shorter than two
    /// characters, or a bare "nothing" answer (無 / 沒有).
    pub fn from_records(records: &[SurveyRecord]) -> Self {
        let mut wall = Self::default();

        for record in records {
            if let Some(text) = displayable(record.q14.as_deref()) {
                wall.touching.push(WallEntry {
                    id: record.id,
                    text: text.to_string(),
                });
            }
            if let Some(text) = displayable(record.q15.as_deref()) {
                wall.suggestions.push(WallEntry {
                    id: record.id,
                    text: text.to_string(),
                });
            }
        }

        wall
    }

    /// True when neither tab has anything to show.
    pub fn is_empty(&self) -> bool {
        self.touching.is_empty() && self.suggestions.is_empty()
    }
}

fn displayable(comment: Option<&str>) -> Option<&str> {
    let text = comment?;
    if text.chars().count() < 2 || text == "無" || text == "沒有" {
        return None;
    }
    Some(text)
}

/// Metadata about a generated report.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReportMetadata {
    /// URL the responses were fetched from.
    pub endpoint: String,
    /// Date and time of generation.
    pub generated_at: DateTime<Utc>,
    /// Number of responses received.
    pub record_count: usize,
    /// Total number of workshop trainees (configured, not fetched).
    pub total_trainees: usize,
    /// Response rate as a whole percentage.
    pub response_rate_percent: i64,
}

impl ReportMetadata {
    /// Creates metadata for a run, computing the response rate.
    ///
    /// `total_trainees` must be at least 1 (validated upstream).
    pub fn new(endpoint: String, record_count: usize, total_trainees: usize) -> Self {
        let rate = (record_count as f64 / total_trainees as f64 * 100.0).round() as i64;
        Self {
            endpoint,
            generated_at: Utc::now(),
            record_count,
            total_trainees,
            response_rate_percent: rate,
        }
    }
}

/// The complete dashboard report.
///
/// `means` and `insights` are `None` when the endpoint returned zero
/// records; the renderers special-case that instead of showing NaN.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    pub metadata: ReportMetadata,
    pub means: Option<AggregateMeans>,
    pub insights: Option<Insights>,
    pub wall: FeedbackWall,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record_with_comments(id: u64, q14: Option<&str>, q15: Option<&str>) -> SurveyRecord {
        SurveyRecord {
            id,
            q14: q14.map(String::from),
            q15: q15.map(String::from),
            ..SurveyRecord::default()
        }
    }

    #[test]
    fn test_competencies_scan_order() {
        let means = AggregateMeans {
            q3: 1.0,
            q4: 2.0,
            q5: 3.0,
            q6: 4.0,
            q7: 5.0,
            q8_pre: 0.0,
            q8_post: 0.0,
            q10: 0.0,
            q12: 0.0,
            q13: 0.0,
        };

        let competencies = means.competencies();
        assert_eq!(competencies[0], ("角色任務認知", 1.0));
        assert_eq!(competencies[4], ("講師引導吸收", 5.0));
    }

    #[test]
    fn test_wall_filters_empty_and_placeholder_comments() {
        let records = vec![
            record_with_comments(1, Some("講師的示範讓我印象深刻"), Some("無")),
            record_with_comments(2, Some("沒有"), Some("希望增加演練時間")),
            record_with_comments(3, None, Some("好")),
        ];

        let wall = FeedbackWall::from_records(&records);
        assert_eq!(wall.touching.len(), 1);
        assert_eq!(wall.touching[0].id, 1);
        assert_eq!(wall.suggestions.len(), 1);
        assert_eq!(wall.suggestions[0].text, "希望增加演練時間");
    }

    #[test]
    fn test_wall_keeps_two_character_comments() {
        // Exactly two characters passes the length filter.
        let records = vec![record_with_comments(1, Some("感動"), None)];
        let wall = FeedbackWall::from_records(&records);
        assert_eq!(wall.touching.len(), 1);
        assert!(wall.suggestions.is_empty());
    }

    #[test]
    fn test_response_rate_rounds_to_whole_percent() {
        let metadata = ReportMetadata::new("https://example.com".to_string(), 9, 11);
        assert_eq!(metadata.response_rate_percent, 82);

        let full = ReportMetadata::new("https://example.com".to_string(), 11, 11);
        assert_eq!(full.response_rate_percent, 100);
    }
}
