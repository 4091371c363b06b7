use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::grade::GradeScale;
use super::question::Question;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub enum QuestionnaireType {
    Mbti,
    Disc,
    Epq,
    Custom,
}

impl QuestionnaireType {
    pub const ALL: [QuestionnaireType; 4] = [
        QuestionnaireType::Mbti,
        QuestionnaireType::Disc,
        QuestionnaireType::Epq,
        QuestionnaireType::Custom,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            QuestionnaireType::Mbti => "MBTI",
            QuestionnaireType::Disc => "DISC",
            QuestionnaireType::Epq => "EPQ",
            QuestionnaireType::Custom => "CUSTOM",
        }
    }

    /// Lenient parse: any label that isn't a built-in instrument is custom.
    pub fn from_label(label: &str) -> Self {
        label.parse().unwrap_or(QuestionnaireType::Custom)
    }

    pub fn is_professional(self) -> bool {
        self != QuestionnaireType::Custom
    }
}

impl fmt::Display for QuestionnaireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for QuestionnaireType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "MBTI" => Ok(QuestionnaireType::Mbti),
            "DISC" => Ok(QuestionnaireType::Disc),
            "EPQ" => Ok(QuestionnaireType::Epq),
            "CUSTOM" => Ok(QuestionnaireType::Custom),
            _ => Err(CoreError::UnknownQuestionnaireType(s.to_string())),
        }
    }
}

/// Listing filter for the questionnaire library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionnaireCategory {
    Professional,
    Scored,
    Survey,
    Custom,
}

impl QuestionnaireCategory {
    pub fn matches(self, questionnaire: &Questionnaire) -> bool {
        let custom = questionnaire.kind == QuestionnaireType::Custom;
        match self {
            QuestionnaireCategory::Professional => !custom,
            QuestionnaireCategory::Scored => custom && questionnaire.is_scored(),
            QuestionnaireCategory::Survey => custom && !questionnaire.is_scored(),
            QuestionnaireCategory::Custom => custom,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionDef {
    pub code: String,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

impl DimensionDef {
    pub fn new(code: &str, name: &str, description: &str) -> Self {
        Self {
            code: code.to_string(),
            name: name.to_string(),
            description: description.to_string(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ScoringMethod {
    /// Each question carries its own `max_score`; answers earn a share of it.
    #[default]
    ByQuestion,
    /// Each option carries a score; the chosen option's score is earned.
    ByOption,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ScoringConfig {
    pub enabled: bool,
    #[serde(default)]
    pub method: ScoringMethod,
    #[serde(default = "default_total_score")]
    pub total_score: f64,
    #[serde(default)]
    pub grades: GradeScale,
}

fn default_total_score() -> f64 {
    100.0
}

impl Default for ScoringConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            method: ScoringMethod::ByQuestion,
            total_score: default_total_score(),
            grades: GradeScale::default(),
        }
    }
}

impl ScoringConfig {
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.total_score <= 0.0 {
            return Err(CoreError::InvalidScoringConfig(
                "total score must be positive".to_string(),
            ));
        }
        if self.grades.bands().is_empty() {
            return Err(CoreError::InvalidScoringConfig(
                "at least one grade band is required".to_string(),
            ));
        }
        if let Some(band) = self
            .grades
            .bands()
            .iter()
            .find(|b| b.min_score > b.max_score)
        {
            return Err(CoreError::InvalidScoringConfig(format!(
                "grade '{}' has min {} above max {}",
                band.name, band.min_score, band.max_score
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum QuestionnaireStatus {
    Draft,
    #[default]
    Active,
    Archived,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Questionnaire {
    pub id: u64,
    pub code: String,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: QuestionnaireType,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub dimensions: Vec<DimensionDef>,
    #[serde(default)]
    pub questions: Vec<Question>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scoring: Option<ScoringConfig>,
    #[serde(default)]
    pub status: QuestionnaireStatus,
    #[serde(default)]
    pub estimated_minutes: u32,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl Questionnaire {
    pub fn is_scored(&self) -> bool {
        self.kind.is_professional() || self.scoring.as_ref().is_some_and(|s| s.enabled)
    }

    pub fn declares_dimension(&self, code: &str) -> bool {
        self.dimensions.iter().any(|d| d.code == code)
    }

    pub fn dimension_name(&self, code: &str) -> Option<&str> {
        self.dimensions
            .iter()
            .find(|d| d.code == code)
            .map(|d| d.name.as_str())
    }

    pub fn question(&self, id: &str) -> Option<&Question> {
        self.questions.iter().find(|q| q.id == id)
    }

    pub fn question_count(&self) -> usize {
        self.questions.len()
    }
}
