use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use ts_rs::TS;

/// Grade returned when a score clears no cutoff, or when there is no score.
pub const NO_GRADE: &str = "N/A";

/// Minimum score per grade.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct GradeCutoffs(BTreeMap<String, f64>);

impl GradeCutoffs {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, grade: impl Into<String>, threshold: f64) {
        self.0.insert(grade.into(), threshold);
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Highest grade whose threshold is at or below `score`.
    ///
    /// Cutoffs are walked from the highest threshold down. Equal thresholds
    /// keep the map's key order, so the result is deterministic.
    pub fn grade_for(&self, score: f64) -> &str {
        let mut ordered: Vec<(&String, &f64)> = self.0.iter().collect();
        ordered.sort_by(|a, b| b.1.total_cmp(a.1));

        ordered
            .into_iter()
            .find(|(_, threshold)| **threshold <= score)
            .map(|(grade, _)| grade.as_str())
            .unwrap_or(NO_GRADE)
    }

    /// `grade_for` lifted over an optional score.
    pub fn grade_for_opt(&self, score: Option<f64>) -> String {
        score
            .map(|s| self.grade_for(s).to_string())
            .unwrap_or_else(|| NO_GRADE.to_string())
    }
}

impl<K: Into<String>> FromIterator<(K, f64)> for GradeCutoffs {
    fn from_iter<I: IntoIterator<Item = (K, f64)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v)).collect())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct GradeBand {
    pub name: String,
    pub label: String,
    pub min_score: f64,
    pub max_score: f64,
}

impl GradeBand {
    fn new(name: &str, label: &str, min_score: f64, max_score: f64) -> Self {
        Self {
            name: name.to_string(),
            label: label.to_string(),
            min_score,
            max_score,
        }
    }
}

/// Ordered grade bands configured on a scored questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(transparent)]
#[ts(export)]
pub struct GradeScale(pub Vec<GradeBand>);

impl Default for GradeScale {
    fn default() -> Self {
        Self(vec![
            GradeBand::new("A", "优秀", 90.0, 100.0),
            GradeBand::new("B", "良好", 75.0, 89.0),
            GradeBand::new("C", "合格", 60.0, 74.0),
            GradeBand::new("D", "不合格", 0.0, 59.0),
        ])
    }
}

impl GradeScale {
    pub fn bands(&self) -> &[GradeBand] {
        &self.0
    }

    pub fn cutoffs(&self) -> GradeCutoffs {
        self.0
            .iter()
            .map(|band| (band.name.clone(), band.min_score))
            .collect()
    }

    pub fn label_for(&self, grade: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|band| band.name == grade)
            .map(|band| band.label.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn abc() -> GradeCutoffs {
        [("A", 90.0), ("B", 75.0), ("C", 60.0)].into_iter().collect()
    }

    #[test]
    fn picks_highest_cleared_cutoff() {
        let cutoffs = abc();
        assert_eq!(cutoffs.grade_for(82.0), "B");
        assert_eq!(cutoffs.grade_for(90.0), "A");
        assert_eq!(cutoffs.grade_for(60.0), "C");
    }

    #[test]
    fn below_every_cutoff_is_no_grade() {
        assert_eq!(abc().grade_for(40.0), NO_GRADE);
        assert_eq!(GradeCutoffs::new().grade_for(100.0), NO_GRADE);
        assert_eq!(abc().grade_for_opt(None), NO_GRADE);
    }

    #[test]
    fn default_scale_covers_zero() {
        let scale = GradeScale::default();
        let cutoffs = scale.cutoffs();
        assert_eq!(cutoffs.grade_for(0.0), "D");
        assert_eq!(cutoffs.grade_for(76.5), "B");
        assert_eq!(scale.label_for("A"), Some("优秀"));
    }

    #[test]
    fn tied_thresholds_resolve_by_name() {
        let cutoffs: GradeCutoffs = [("Y", 50.0), ("X", 50.0)].into_iter().collect();
        assert_eq!(cutoffs.grade_for(55.0), "X");
    }
}
