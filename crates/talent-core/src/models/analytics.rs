//! Dashboard aggregates. Field names are camelCase on the wire.

use serde::{Deserialize, Serialize};
use ts_rs::TS;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct NamedValue {
    pub name: String,
    pub value: f64,
}

impl NamedValue {
    pub fn new(name: &str, value: f64) -> Self {
        Self {
            name: name.to_string(),
            value,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RadarIndicator {
    pub name: String,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RadarSeries {
    pub name: String,
    pub value: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TrendSeries {
    pub name: String,
    pub data: Vec<f64>,
}

/// Minimum scores for the dashboard's A/B/C buckets.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "UPPERCASE")]
#[ts(export)]
pub struct GradeCutoffs {
    pub a: f64,
    pub b: f64,
    pub c: f64,
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct AnalyticsSummary {
    #[serde(default)]
    pub position_distribution: Vec<NamedValue>,
    #[serde(default)]
    pub match_distribution: Vec<NamedValue>,
    #[serde(default)]
    pub radar_indicators: Vec<RadarIndicator>,
    #[serde(default)]
    pub radar_series: Vec<RadarSeries>,
    #[serde(default)]
    pub personality_pie: Vec<NamedValue>,
    #[serde(default)]
    pub dimension_trend_labels: Vec<String>,
    #[serde(default)]
    pub dimension_trend_series: Vec<TrendSeries>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub grade_cutoffs: Option<GradeCutoffs>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub total_candidates: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_score: Option<f64>,
}
