//! Candidate-facing endpoints. None of these send credentials.

use serde::{Deserialize, Serialize};
use talent_core::api_paths;
use talent_core::models::answer::Answers;
use talent_core::models::assessment::{FormField, RepeatCheckBy, RepeatPolicy, SubmitCheck};
use talent_core::models::question::Question;
use talent_core::models::submission::Candidate;

use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PublicAssessmentInfo {
    pub name: String,
    /// Questionnaire type label. The backend answers `UNKNOWN` for a
    /// missing assessment.
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub questions_count: u32,
    #[serde(default)]
    pub estimated_minutes: u32,
    pub valid: bool,
    #[serde(default)]
    pub expired: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub form_fields: Vec<FormField>,
    #[serde(default)]
    pub page_texts: serde_json::Value,
    #[serde(flatten)]
    pub repeat: RepeatPolicy,
}

impl PublicAssessmentInfo {
    fn not_found() -> Self {
        Self {
            name: "未找到测评".to_string(),
            kind: "UNKNOWN".to_string(),
            questions_count: 0,
            estimated_minutes: 0,
            valid: false,
            expired: false,
            description: Some("测评不存在".to_string()),
            form_fields: Vec::new(),
            page_texts: serde_json::Value::Null,
            repeat: RepeatPolicy::default(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StartResponse {
    pub submission_code: String,
    #[serde(default)]
    pub questions: Vec<Question>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitReceipt {
    #[serde(default)]
    pub success: bool,
    pub submission_code: String,
    #[serde(default)]
    pub submitted_at: Option<jiff::Timestamp>,
}

impl ApiClient {
    pub async fn public_assessment(&self, code: &str) -> Result<PublicAssessmentInfo, ApiError> {
        let now = jiff::Timestamp::now();
        let fallback = self
            .mock()
            .read(|data| {
                let assessment = data.assessment_by_code(code)?;
                let questionnaire = data.questionnaire(assessment.questionnaire_id)?;
                Some(PublicAssessmentInfo {
                    name: questionnaire.name.clone(),
                    kind: questionnaire.kind.to_string(),
                    questions_count: u32::try_from(questionnaire.question_count())
                        .unwrap_or(u32::MAX),
                    estimated_minutes: questionnaire.estimated_minutes,
                    valid: assessment.is_open(now),
                    expired: assessment.is_expired(now),
                    description: assessment
                        .description
                        .clone()
                        .or_else(|| Some(questionnaire.name.clone())),
                    form_fields: assessment.form_fields.clone(),
                    page_texts: serde_json::to_value(&assessment.page_texts)
                        .unwrap_or_default(),
                    repeat: assessment.repeat.clone(),
                })
            })
            .await
            .unwrap_or_else(PublicAssessmentInfo::not_found);
        self.get(api_paths::public_assessment(code))
            .fallback(fallback)
            .send()
            .await
    }

    /// Open a submission. Never falls back: a made-up submission code
    /// would make the later submit fail.
    pub async fn start_assessment(
        &self,
        code: &str,
        candidate: &Candidate,
    ) -> Result<StartResponse, ApiError> {
        let mut body = serde_json::to_value(candidate)?;
        if let Some(obj) = body.as_object_mut() {
            obj.insert("assessment_code".to_string(), code.into());
        }
        self.post(api_paths::public_start(code))
            .json(&body)
            .send()
            .await
    }

    /// Ask whether this candidate may submit again. Offline, the mock
    /// applies the assessment's own repeat policy to mock submissions.
    pub async fn check_submit(
        &self,
        code: &str,
        phone: &str,
        name: &str,
    ) -> Result<SubmitCheck, ApiError> {
        let now = jiff::Timestamp::now();
        let fallback = self
            .mock()
            .read(|data| {
                let Some(assessment) = data.assessment_by_code(code) else {
                    return RepeatPolicy::default().check(&[], now);
                };
                let previous: Vec<_> = data
                    .submissions
                    .iter()
                    .filter(|s| s.assessment_id == assessment.id && s.candidate.phone == phone)
                    .filter(|s| {
                        assessment.repeat.repeat_check_by != RepeatCheckBy::PhoneName
                            || s.candidate.name == name
                    })
                    .map(|s| s.summary())
                    .collect();
                assessment.repeat.check(&previous, now)
            })
            .await;
        self.post(api_paths::public_check_submit(code))
            .json(&serde_json::json!({ "phone": phone, "name": name }))
            .fallback(fallback)
            .send()
            .await
    }

    /// Submit an answer sheet. Failures always surface; with mock fallback
    /// enabled a failed submit is still recorded in the mock store.
    pub async fn submit_answers(
        &self,
        submission_code: &str,
        answers: &Answers,
    ) -> Result<SubmitReceipt, ApiError> {
        let result = self
            .post(api_paths::public_submit(submission_code))
            .json(&serde_json::json!({
                "submission_code": submission_code,
                "answers": answers,
            }))
            .send()
            .await;

        if let Err(e) = &result
            && e.is_recoverable()
            && self.config().mock_fallback
        {
            let now = jiff::Timestamp::now();
            let recorded = self
                .mock()
                .write(|data| data.submit(submission_code, answers.clone(), now))
                .await;
            tracing::warn!(
                code = submission_code,
                mock_id = recorded.id,
                error = %e,
                "submit failed, answers recorded in mock store"
            );
        }
        result
    }
}
