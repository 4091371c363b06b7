use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::submission::SubmissionStatus;

/// How many earlier submissions a repeat check reports back.
const PREVIOUS_SUBMISSIONS_SHOWN: usize = 5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[serde(untagged)]
#[ts(export)]
pub enum FieldOption {
    Plain(String),
    Labeled { value: String, label: String },
}

impl FieldOption {
    pub fn value(&self) -> &str {
        match self {
            FieldOption::Plain(v) => v,
            FieldOption::Labeled { value, .. } => value,
        }
    }

    pub fn label(&self) -> &str {
        match self {
            FieldOption::Plain(v) => v,
            FieldOption::Labeled { label, .. } => label,
        }
    }
}

/// A candidate-information field shown before the questionnaire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct FormField {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default)]
    pub required: bool,
    #[serde(default = "enabled_by_default")]
    pub enabled: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FieldOption>,
    #[serde(default)]
    pub builtin: bool,
}

fn enabled_by_default() -> bool {
    true
}

impl FormField {
    fn builtin(id: &str, label: &str, kind: &str) -> Self {
        Self {
            id: id.to_string(),
            label: label.to_string(),
            kind: kind.to_string(),
            placeholder: None,
            required: true,
            enabled: true,
            options: Vec::new(),
            builtin: true,
        }
    }

    /// Name and phone, the two fields every assessment collects.
    pub fn defaults() -> Vec<FormField> {
        vec![
            FormField::builtin("name", "姓名", "text"),
            FormField::builtin("phone", "手机号", "tel"),
        ]
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[serde(rename_all = "camelCase")]
#[ts(export)]
pub struct PageTexts {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub welcome_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub intro_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guide_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub privacy_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub success_message: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_text: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum LinkType {
    #[default]
    Temporary,
    Permanent,
}

/// Which candidate fields identify "the same person" across submissions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum RepeatCheckBy {
    #[default]
    Phone,
    PhoneName,
}

/// Summary of an earlier submission by the same candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct PreviousSubmission {
    pub code: String,
    pub submitted_at: Option<jiff::Timestamp>,
    pub status: SubmissionStatus,
    pub total_score: Option<f64>,
    pub grade: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct SubmitCheck {
    pub can_submit: bool,
    pub reason: String,
    pub submission_number: u32,
    pub previous_submissions: Vec<PreviousSubmission>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct RepeatPolicy {
    #[serde(default = "enabled_by_default")]
    pub allow_repeat: bool,
    #[serde(default)]
    pub repeat_check_by: RepeatCheckBy,
    /// Minimum hours between submissions; 0 disables the check.
    #[serde(default)]
    pub repeat_interval_hours: u32,
    /// Upper bound on submissions per candidate; 0 means unlimited.
    #[serde(default)]
    pub max_submissions: u32,
}

impl Default for RepeatPolicy {
    fn default() -> Self {
        Self {
            allow_repeat: true,
            repeat_check_by: RepeatCheckBy::Phone,
            repeat_interval_hours: 0,
            max_submissions: 0,
        }
    }
}

impl RepeatPolicy {
    /// Decide whether a candidate with the given earlier submissions may
    /// submit again at `now`.
    ///
    /// Checks run in order: repeat allowed, minimum interval since the most
    /// recent submission, then the submission cap.
    pub fn check(&self, previous: &[PreviousSubmission], now: jiff::Timestamp) -> SubmitCheck {
        let mut ordered: Vec<&PreviousSubmission> = previous.iter().collect();
        ordered.sort_by(|a, b| b.submitted_at.cmp(&a.submitted_at));

        let count = u32::try_from(ordered.len()).unwrap_or(u32::MAX);
        let recent: Vec<PreviousSubmission> = ordered
            .iter()
            .take(PREVIOUS_SUBMISSIONS_SHOWN)
            .map(|s| (*s).clone())
            .collect();

        let blocked = |reason: String| SubmitCheck {
            can_submit: false,
            reason,
            submission_number: count,
            previous_submissions: recent.clone(),
        };

        if !self.allow_repeat && count > 0 {
            return blocked("该测评不允许重复提交".to_string());
        }

        if self.repeat_interval_hours > 0
            && let Some(last) = ordered.first().and_then(|s| s.submitted_at)
        {
            let hours_since = now.duration_since(last).as_secs_f64() / 3600.0;
            let interval = f64::from(self.repeat_interval_hours);
            if hours_since < interval {
                let remaining = interval - hours_since;
                let remaining_text = if remaining < 1.0 {
                    format!("{}分钟", (remaining * 60.0) as i64)
                } else {
                    format!("{}小时", remaining as i64)
                };
                return blocked(format!(
                    "距上次提交不足{}小时，请{remaining_text}后再试",
                    self.repeat_interval_hours
                ));
            }
        }

        if self.max_submissions > 0 && count >= self.max_submissions {
            return blocked(format!("已达到最大提交次数({}次)", self.max_submissions));
        }

        SubmitCheck {
            can_submit: true,
            reason: String::new(),
            submission_number: count.saturating_add(1),
            previous_submissions: recent,
        }
    }
}

/// A distributable, time-bounded instance of a questionnaire.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Assessment {
    pub id: u64,
    pub name: String,
    pub code: String,
    pub questionnaire_id: u64,
    pub valid_from: jiff::Timestamp,
    pub valid_until: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default = "FormField::defaults")]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub page_texts: PageTexts,
    #[serde(default)]
    pub link_type: LinkType,
    #[serde(flatten)]
    pub repeat: RepeatPolicy,
    pub created_at: jiff::Timestamp,
}

impl Assessment {
    pub fn is_open(&self, now: jiff::Timestamp) -> bool {
        self.valid_from <= now && now <= self.valid_until
    }

    pub fn is_expired(&self, now: jiff::Timestamp) -> bool {
        now > self.valid_until
    }

    pub fn enabled_fields(&self) -> impl Iterator<Item = &FormField> {
        self.form_fields.iter().filter(|f| f.enabled)
    }
}

#[cfg(test)]
mod tests {
    use jiff::{SignedDuration, Timestamp};

    use super::*;

    fn previous(code: &str, at: Timestamp) -> PreviousSubmission {
        PreviousSubmission {
            code: code.to_string(),
            submitted_at: Some(at),
            status: SubmissionStatus::Completed,
            total_score: Some(80.0),
            grade: Some("B".to_string()),
        }
    }

    fn now() -> Timestamp {
        "2025-12-01T12:00:00Z".parse().unwrap()
    }

    #[test]
    fn first_submission_is_number_one() {
        let check = RepeatPolicy::default().check(&[], now());
        assert!(check.can_submit);
        assert_eq!(check.submission_number, 1);
    }

    #[test]
    fn repeat_disallowed() {
        let policy = RepeatPolicy {
            allow_repeat: false,
            ..RepeatPolicy::default()
        };
        let earlier = previous("SUB_1", now() - SignedDuration::from_hours(48));
        let check = policy.check(&[earlier], now());
        assert!(!check.can_submit);
        assert_eq!(check.reason, "该测评不允许重复提交");
        assert_eq!(check.submission_number, 1);
    }

    #[test]
    fn interval_reports_remaining_minutes() {
        let policy = RepeatPolicy {
            repeat_interval_hours: 2,
            ..RepeatPolicy::default()
        };
        let earlier = previous("SUB_1", now() - SignedDuration::from_mins(90));
        let check = policy.check(&[earlier], now());
        assert!(!check.can_submit);
        assert_eq!(check.reason, "距上次提交不足2小时，请30分钟后再试");
    }

    #[test]
    fn cap_counts_all_previous() {
        let policy = RepeatPolicy {
            max_submissions: 2,
            ..RepeatPolicy::default()
        };
        let list: Vec<_> = (1..=2)
            .map(|i| previous(&format!("SUB_{i}"), now() - SignedDuration::from_hours(i)))
            .collect();
        let check = policy.check(&list, now());
        assert!(!check.can_submit);
        assert_eq!(check.reason, "已达到最大提交次数(2次)");
    }

    #[test]
    fn reports_at_most_five_most_recent() {
        let list: Vec<_> = (1..=7)
            .map(|i| previous(&format!("SUB_{i}"), now() - SignedDuration::from_hours(i)))
            .collect();
        let check = RepeatPolicy::default().check(&list, now());
        assert!(check.can_submit);
        assert_eq!(check.submission_number, 8);
        assert_eq!(check.previous_submissions.len(), 5);
        assert_eq!(check.previous_submissions[0].code, "SUB_1");
    }

    #[test]
    fn flattened_policy_and_default_fields() {
        let json = r#"{
            "id": 3, "name": "Q4 hiring", "code": "ASS_1", "questionnaire_id": 1,
            "valid_from": "2025-11-01T00:00:00Z", "valid_until": "2025-12-31T00:00:00Z",
            "allow_repeat": false, "repeat_check_by": "phone_name",
            "created_at": "2025-11-01T00:00:00Z"
        }"#;
        let assessment: Assessment = serde_json::from_str(json).unwrap();
        assert!(!assessment.repeat.allow_repeat);
        assert_eq!(assessment.repeat.repeat_check_by, RepeatCheckBy::PhoneName);
        assert_eq!(assessment.form_fields.len(), 2);
        assert!(assessment.is_open(now()));
        assert!(assessment.is_expired("2026-01-01T00:00:00Z".parse().unwrap()));
    }
}
