use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::AnswerValue;
use super::question::QuestionKind;
use super::questionnaire::{Questionnaire, QuestionnaireType};
use crate::error::CoreError;

/// One MBTI preference pair, e.g. `EI`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MbtiDimension {
    pub code: String,
    /// Winning pole letter.
    pub tendency: String,
    pub label: String,
    /// Share of answers on the winning pole, 50-100.
    pub value: u32,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MbtiResult {
    pub mbti_type: String,
    pub description: String,
    pub dimensions: Vec<MbtiDimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscDimension {
    pub code: String,
    pub label: String,
    pub value: u32,
    pub raw_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DiscResult {
    pub disc_type: String,
    pub dominant: String,
    pub description: String,
    pub dimensions: Vec<DiscDimension>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub enum EpqLevel {
    #[serde(rename = "高")]
    High,
    #[serde(rename = "中")]
    Medium,
    #[serde(rename = "低")]
    Low,
}

impl EpqLevel {
    pub fn from_t_score(t: i32) -> Self {
        if t >= 60 {
            EpqLevel::High
        } else if t >= 40 {
            EpqLevel::Medium
        } else {
            EpqLevel::Low
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            EpqLevel::High => "高",
            EpqLevel::Medium => "中",
            EpqLevel::Low => "低",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EpqDimension {
    pub code: String,
    pub label: String,
    pub raw_score: u32,
    pub t_score: i32,
    pub level: EpqLevel,
    pub total_questions: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct EpqResult {
    pub personality_trait: String,
    pub dimensions: Vec<EpqDimension>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct AnswerScoring {
    pub earned_score: f64,
    pub max_score: f64,
    pub percentage: f64,
}

/// A custom-questionnaire answer as shown in reports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DetailedAnswer {
    pub question_id: String,
    pub question_text: String,
    pub question_kind: QuestionKind,
    pub answer: Option<AnswerValue>,
    /// Human-readable answer, option labels substituted for values.
    pub display: String,
    pub scoring: Option<AnswerScoring>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CustomResult {
    pub max_score: Option<f64>,
    pub score_percentage: Option<f64>,
    pub detailed_answers: Vec<DetailedAnswer>,
}

/// Instrument-specific result detail. The variant is fixed at scoring time
/// and drives report layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(tag = "kind", rename_all = "snake_case")]
#[ts(export)]
pub enum ResultDetails {
    Mbti(MbtiResult),
    Disc(DiscResult),
    Epq(EpqResult),
    Custom(CustomResult),
}

impl ResultDetails {
    pub fn questionnaire_type(&self) -> QuestionnaireType {
        match self {
            ResultDetails::Mbti(_) => QuestionnaireType::Mbti,
            ResultDetails::Disc(_) => QuestionnaireType::Disc,
            ResultDetails::Epq(_) => QuestionnaireType::Epq,
            ResultDetails::Custom(_) => QuestionnaireType::Custom,
        }
    }

    /// Dimension codes this result reports on.
    pub fn dimension_codes(&self) -> Vec<&str> {
        match self {
            ResultDetails::Mbti(r) => r.dimensions.iter().map(|d| d.code.as_str()).collect(),
            ResultDetails::Disc(r) => r.dimensions.iter().map(|d| d.code.as_str()).collect(),
            ResultDetails::Epq(r) => r.dimensions.iter().map(|d| d.code.as_str()).collect(),
            ResultDetails::Custom(_) => Vec::new(),
        }
    }

    /// Per-dimension scores on a 0-100 scale, used for job matching.
    /// EPQ reports T-scores.
    pub fn dimension_scores(&self) -> BTreeMap<String, f64> {
        match self {
            ResultDetails::Mbti(r) => r
                .dimensions
                .iter()
                .map(|d| (d.code.clone(), f64::from(d.value)))
                .collect(),
            ResultDetails::Disc(r) => r
                .dimensions
                .iter()
                .map(|d| (d.code.clone(), f64::from(d.value)))
                .collect(),
            ResultDetails::Epq(r) => r
                .dimensions
                .iter()
                .map(|d| (d.code.clone(), f64::from(d.t_score)))
                .collect(),
            ResultDetails::Custom(r) => r
                .score_percentage
                .map(|p| BTreeMap::from([("total".to_string(), p)]))
                .unwrap_or_default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoredResult {
    pub total_score: Option<f64>,
    pub grade: Option<String>,
    pub details: ResultDetails,
}

impl ScoredResult {
    /// Every dimension the result reports must be declared by `questionnaire`.
    pub fn check_dimensions(&self, questionnaire: &Questionnaire) -> Result<(), CoreError> {
        match self
            .details
            .dimension_codes()
            .into_iter()
            .find(|code| !questionnaire.declares_dimension(code))
        {
            Some(code) => Err(CoreError::UndeclaredDimension {
                questionnaire: questionnaire.code.clone(),
                dimension: code.to_string(),
            }),
            None => Ok(()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn details_are_tagged_by_kind() {
        let details = ResultDetails::Epq(EpqResult {
            personality_trait: "外向稳定型".into(),
            dimensions: vec![EpqDimension {
                code: "E".into(),
                label: "外向性".into(),
                raw_score: 18,
                t_score: 74,
                level: EpqLevel::High,
                total_questions: 21,
            }],
        });
        let json = serde_json::to_value(&details).unwrap();
        assert_eq!(json["kind"], "epq");
        assert_eq!(json["dimensions"][0]["level"], "高");

        let back: ResultDetails = serde_json::from_value(json).unwrap();
        assert_eq!(back.questionnaire_type(), QuestionnaireType::Epq);
        assert_eq!(back.dimension_scores().get("E"), Some(&74.0));
    }

    #[test]
    fn epq_level_bands() {
        assert_eq!(EpqLevel::from_t_score(60), EpqLevel::High);
        assert_eq!(EpqLevel::from_t_score(40), EpqLevel::Medium);
        assert_eq!(EpqLevel::from_t_score(39), EpqLevel::Low);
    }
}
