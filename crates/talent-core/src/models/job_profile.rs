use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionWeight {
    /// Dimension code as reported by a result, e.g. `E` or `D`.
    pub name: String,
    /// Weight in percent.
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum ProfileStatus {
    #[default]
    Active,
    Inactive,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobProfile {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub dimensions: Vec<DimensionWeight>,
    #[serde(default)]
    pub status: ProfileStatus,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

impl JobProfile {
    pub fn total_weight(&self) -> f64 {
        self.dimensions.iter().map(|d| d.weight).sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobProfileDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub dimensions: Vec<DimensionWeight>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct ProfileMatch {
    pub profile_id: u64,
    pub submission_id: u64,
    pub match_score: f64,
    #[serde(default)]
    pub dimension_scores: BTreeMap<String, f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct MatchResponse {
    pub matches: Vec<ProfileMatch>,
    pub total: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobPosition {
    pub id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub status: ProfileStatus,
}

/// Body of a job position create request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobPositionDraft {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProfileStatus>,
}

/// Partial update; absent fields are left unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobPositionUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub department: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<ProfileStatus>,
}

impl JobPosition {
    pub fn from_draft(id: u64, draft: &JobPositionDraft) -> Self {
        Self {
            id,
            name: draft.name.clone(),
            department: draft.department.clone(),
            level: draft.level.clone(),
            description: draft.description.clone(),
            status: draft.status.unwrap_or_default(),
        }
    }

    pub fn apply(&mut self, update: &JobPositionUpdate) {
        if let Some(name) = &update.name {
            self.name = name.clone();
        }
        if let Some(department) = &update.department {
            self.department = Some(department.clone());
        }
        if let Some(level) = &update.level {
            self.level = Some(level.clone());
        }
        if let Some(description) = &update.description {
            self.description = Some(description.clone());
        }
        if let Some(status) = update.status {
            self.status = status;
        }
    }
}

/// A dimension weight proposed for a position, keyed by dimension code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SuggestedDimension {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<u64>,
    pub dimension_code: String,
    pub dimension_name: String,
    pub weight: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ideal_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min_score: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&SuggestedDimension> for DimensionWeight {
    fn from(suggested: &SuggestedDimension) -> Self {
        Self {
            name: suggested.dimension_code.clone(),
            weight: suggested.weight,
            description: suggested.description.clone(),
        }
    }
}

/// A requirement profile attached to a job position.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PositionProfile {
    pub id: u64,
    pub job_position_id: u64,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub requirement_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ai_analysis: Option<serde_json::Value>,
    #[serde(default)]
    pub dimensions: Vec<SuggestedDimension>,
    pub created_at: jiff::Timestamp,
    pub updated_at: jiff::Timestamp,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct JobPositionDetail {
    #[serde(flatten)]
    pub position: JobPosition,
    #[serde(default)]
    pub profiles: Vec<PositionProfile>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct KeyAbility {
    pub name: String,
    /// Free-form, e.g. `高` or `必需`.
    pub importance: String,
}

/// AI reading of a free-text job requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RequirementAnalysis {
    #[serde(default)]
    pub key_abilities: Vec<KeyAbility>,
    #[serde(default)]
    pub personality_preferences: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub experience_requirements: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub education_requirements: Option<String>,
    #[serde(default)]
    pub summary: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct DimensionSuggestion {
    pub dimensions: Vec<SuggestedDimension>,
    #[serde(default)]
    pub explanation: String,
}

impl DimensionSuggestion {
    /// The suggestion as profile weights, ready for a [`JobProfileDraft`].
    pub fn weights(&self) -> Vec<DimensionWeight> {
        self.dimensions.iter().map(DimensionWeight::from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn update_touches_only_present_fields() {
        let mut position = JobPosition::from_draft(
            3,
            &JobPositionDraft {
                name: "后端工程师".into(),
                department: Some("研发部".into()),
                ..JobPositionDraft::default()
            },
        );
        assert_eq!(position.status, ProfileStatus::Active);

        position.apply(&JobPositionUpdate {
            level: Some("P6".into()),
            status: Some(ProfileStatus::Inactive),
            ..JobPositionUpdate::default()
        });
        assert_eq!(position.name, "后端工程师");
        assert_eq!(position.department.as_deref(), Some("研发部"));
        assert_eq!(position.level.as_deref(), Some("P6"));
        assert_eq!(position.status, ProfileStatus::Inactive);
    }

    #[test]
    fn position_detail_flattens_position_fields() {
        let detail: JobPositionDetail = serde_json::from_str(
            r#"{"id":5,"name":"销售代表","status":"active","profiles":[]}"#,
        )
        .unwrap();
        assert_eq!(detail.position.id, 5);
        assert!(detail.profiles.is_empty());
    }

    #[test]
    fn suggestion_converts_to_weights() {
        let suggestion = DimensionSuggestion {
            dimensions: vec![SuggestedDimension {
                id: None,
                dimension_code: "E".into(),
                dimension_name: "外向性".into(),
                weight: 40.0,
                ideal_score: Some(60.0),
                min_score: None,
                description: None,
            }],
            explanation: String::new(),
        };
        let weights = suggestion.weights();
        assert_eq!(weights[0].name, "E");
        assert_eq!(weights[0].weight, 40.0);
    }
}
