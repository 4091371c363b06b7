//! Candidate portraits: one candidate's assessments, best job match and
//! derived strengths, assembled by the backend.

use std::fmt;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Depth of the AI analysis behind a portrait or resume parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum AnalysisLevel {
    #[default]
    Pro,
    Expert,
}

impl fmt::Display for AnalysisLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Pro => "pro",
            Self::Expert => "expert",
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortraitBasicInfo {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub phone: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<String>,
    pub created_at: jiff::Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortraitAssessment {
    pub submission_id: u64,
    pub assessment_name: String,
    pub questionnaire_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub score_percentage: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortraitDimensionScore {
    pub name: String,
    pub score: f64,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// `score * weight / 100`.
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortraitJobMatch {
    pub profile_id: u64,
    pub profile_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    pub match_score: f64,
    #[serde(default)]
    pub dimension_scores: Vec<PortraitDimensionScore>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub matched_at: Option<jiff::Timestamp>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CandidatePortrait {
    pub basic_info: PortraitBasicInfo,
    #[serde(default)]
    pub assessments: Vec<PortraitAssessment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub job_match: Option<PortraitJobMatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default)]
    pub strengths: Vec<String>,
    #[serde(default)]
    pub improvements: Vec<String>,
    pub portrait_version: String,
    pub generated_at: jiff::Timestamp,
}

/// A row of the portrait listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CandidatePortraitSummary {
    pub candidate_id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub overall_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub match_score: Option<f64>,
    pub assessment_count: u32,
    pub has_job_match: bool,
}

impl From<&CandidatePortrait> for CandidatePortraitSummary {
    fn from(portrait: &CandidatePortrait) -> Self {
        Self {
            candidate_id: portrait.basic_info.id,
            name: portrait.basic_info.name.clone(),
            target_position: portrait.basic_info.target_position.clone(),
            overall_score: portrait.overall_score,
            match_score: portrait.job_match.as_ref().map(|m| m.match_score),
            assessment_count: u32::try_from(portrait.assessments.len()).unwrap_or(u32::MAX),
            has_job_match: portrait.job_match.is_some(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct CachedLevels {
    pub pro: bool,
    pub expert: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PortraitCacheStatus {
    pub candidate_id: u64,
    /// Changes whenever the candidate's underlying data changes.
    pub data_version: String,
    pub cached_levels: CachedLevels,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn summary_reflects_job_match() {
        let now = jiff::Timestamp::UNIX_EPOCH;
        let mut portrait = CandidatePortrait {
            basic_info: PortraitBasicInfo {
                id: 7,
                name: "张伟".into(),
                phone: String::new(),
                email: None,
                gender: None,
                target_position: Some("产品经理".into()),
                created_at: now,
            },
            assessments: Vec::new(),
            job_match: None,
            overall_score: Some(80.0),
            strengths: Vec::new(),
            improvements: Vec::new(),
            portrait_version: "1.0".into(),
            generated_at: now,
        };
        assert!(!CandidatePortraitSummary::from(&portrait).has_job_match);

        portrait.job_match = Some(PortraitJobMatch {
            profile_id: 1,
            profile_name: "产品经理".into(),
            department: None,
            match_score: 72.5,
            dimension_scores: Vec::new(),
            ai_analysis: None,
            matched_at: None,
        });
        let summary = CandidatePortraitSummary::from(&portrait);
        assert!(summary.has_job_match);
        assert_eq!(summary.match_score, Some(72.5));
        assert_eq!(summary.candidate_id, 7);
    }

    #[test]
    fn analysis_level_displays_as_query_value() {
        assert_eq!(AnalysisLevel::Expert.to_string(), "expert");
        assert_eq!(
            serde_json::to_value(AnalysisLevel::Pro).unwrap(),
            serde_json::json!("pro")
        );
    }
}
