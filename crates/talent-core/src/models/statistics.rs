use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::questionnaire::QuestionnaireType;

/// Grades reported in distributions, best first.
pub const REPORTED_GRADES: [&str; 4] = ["A", "B", "C", "D"];

/// Minimum total score counted as a pass.
pub const PASS_SCORE: f64 = 60.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct StatisticsRow {
    pub id: u64,
    pub candidate_name: String,
    pub candidate_phone: String,
    pub total_score: Option<f64>,
    pub grade: Option<String>,
    pub submitted_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmissionStatistics {
    pub total_submissions: u32,
    pub average_score: f64,
    pub pass_rate: f64,
    pub grade_distribution: BTreeMap<String, u32>,
    #[serde(default)]
    pub grade_percentages: BTreeMap<String, f64>,
    pub submissions: Vec<StatisticsRow>,
}

impl SubmissionStatistics {
    pub fn empty() -> Self {
        Self {
            total_submissions: 0,
            average_score: 0.0,
            pass_rate: 0.0,
            grade_distribution: zeroed(0),
            grade_percentages: zeroed(0.0),
            submissions: Vec::new(),
        }
    }
}

fn zeroed<V: Copy>(zero: V) -> BTreeMap<String, V> {
    REPORTED_GRADES
        .iter()
        .map(|g| (g.to_string(), zero))
        .collect()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionOptionStat {
    pub index: u32,
    pub text: String,
    pub count: u32,
    pub percentage: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionStat {
    pub id: String,
    pub index: u32,
    pub text: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub total_answers: u32,
    pub options: Vec<QuestionOptionStat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DailyTrend {
    pub date: jiff::civil::Date,
    pub count: u32,
}

/// Per-question answer distribution for one questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct QuestionnaireQuestionStats {
    pub questionnaire_id: u64,
    pub questionnaire_name: String,
    pub questionnaire_type: QuestionnaireType,
    pub total_submissions: u32,
    pub average_score: Option<f64>,
    pub questions: Vec<QuestionStat>,
    pub daily_trend: Vec<DailyTrend>,
    pub grade_distribution: BTreeMap<String, u32>,
}
