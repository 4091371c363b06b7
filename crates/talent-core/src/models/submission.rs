use serde::{Deserialize, Serialize};
use ts_rs::TS;

use super::answer::{AnswerValue, Answers};
use super::assessment::PreviousSubmission;
use super::questionnaire::{Questionnaire, QuestionnaireType};
use super::result::ScoredResult;
use crate::error::CoreError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, TS)]
#[serde(rename_all = "snake_case")]
#[ts(export)]
pub enum SubmissionStatus {
    #[default]
    Started,
    InProgress,
    Completed,
    Abandoned,
}

impl SubmissionStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, SubmissionStatus::Completed | SubmissionStatus::Abandoned)
    }

    pub fn can_transition_to(self, next: SubmissionStatus) -> bool {
        use SubmissionStatus::*;
        matches!(
            (self, next),
            (Started, InProgress) | (Started | InProgress, Completed) | (Started | InProgress, Abandoned)
        )
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Candidate {
    #[serde(rename = "candidate_name")]
    pub name: String,
    #[serde(rename = "candidate_phone")]
    pub phone: String,
    #[serde(rename = "candidate_email", default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_position: Option<String>,
}

/// One candidate's run through an assessment.
#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct Submission {
    pub id: u64,
    pub code: String,
    pub assessment_id: u64,
    pub questionnaire_id: u64,
    #[serde(default)]
    pub questionnaire_name: String,
    pub questionnaire_type: QuestionnaireType,
    #[serde(flatten)]
    pub candidate: Candidate,
    #[serde(default)]
    pub status: SubmissionStatus,
    #[serde(default)]
    pub answers: Answers,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ScoredResult>,
    pub started_at: jiff::Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub submitted_at: Option<jiff::Timestamp>,
}

impl Submission {
    pub fn start(
        id: u64,
        code: impl Into<String>,
        assessment_id: u64,
        questionnaire: &Questionnaire,
        candidate: Candidate,
        now: jiff::Timestamp,
    ) -> Self {
        Self {
            id,
            code: code.into(),
            assessment_id,
            questionnaire_id: questionnaire.id,
            questionnaire_name: questionnaire.name.clone(),
            questionnaire_type: questionnaire.kind,
            candidate,
            status: SubmissionStatus::Started,
            answers: Answers::new(),
            result: None,
            started_at: now,
            submitted_at: None,
        }
    }

    fn transition(&mut self, next: SubmissionStatus) -> Result<(), CoreError> {
        if !self.status.can_transition_to(next) {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: next,
            });
        }
        self.status = next;
        Ok(())
    }

    pub fn record_answer(
        &mut self,
        question_id: impl Into<String>,
        value: AnswerValue,
    ) -> Result<(), CoreError> {
        if self.status == SubmissionStatus::Started {
            self.transition(SubmissionStatus::InProgress)?;
        } else if self.status != SubmissionStatus::InProgress {
            return Err(CoreError::InvalidTransition {
                from: self.status,
                to: SubmissionStatus::InProgress,
            });
        }
        self.answers.insert(question_id, value);
        Ok(())
    }

    pub fn complete(&mut self, result: ScoredResult, now: jiff::Timestamp) -> Result<(), CoreError> {
        self.transition(SubmissionStatus::Completed)?;
        self.result = Some(result);
        self.submitted_at = Some(now);
        Ok(())
    }

    pub fn abandon(&mut self) -> Result<(), CoreError> {
        self.transition(SubmissionStatus::Abandoned)
    }

    pub fn total_score(&self) -> Option<f64> {
        self.result.as_ref().and_then(|r| r.total_score)
    }

    pub fn grade(&self) -> Option<&str> {
        self.result.as_ref().and_then(|r| r.grade.as_deref())
    }

    /// Every dimension the result reports must be declared by the questionnaire.
    pub fn check_dimensions(&self, questionnaire: &Questionnaire) -> Result<(), CoreError> {
        match &self.result {
            Some(result) => result.check_dimensions(questionnaire),
            None => Ok(()),
        }
    }

    pub fn summary(&self) -> PreviousSubmission {
        PreviousSubmission {
            code: self.code.clone(),
            submitted_at: self.submitted_at,
            status: self.status,
            total_score: self.total_score(),
            grade: self.grade().map(str::to_string),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::questionnaire::{DimensionDef, QuestionnaireStatus};
    use crate::models::result::{DiscDimension, DiscResult, ResultDetails};

    fn disc_questionnaire(dimensions: &[&str]) -> Questionnaire {
        let now = jiff::Timestamp::now();
        Questionnaire {
            id: 7,
            code: "DISC".into(),
            name: "DISC 行为风格".into(),
            kind: QuestionnaireType::Disc,
            description: String::new(),
            dimensions: dimensions
                .iter()
                .map(|c| DimensionDef::new(c, c, ""))
                .collect(),
            questions: Vec::new(),
            scoring: None,
            status: QuestionnaireStatus::Active,
            estimated_minutes: 10,
            created_at: now,
            updated_at: now,
        }
    }

    fn disc_result(codes: &[&str]) -> ScoredResult {
        ScoredResult {
            total_score: Some(80.0),
            grade: Some("B".into()),
            details: ResultDetails::Disc(DiscResult {
                disc_type: "D型".into(),
                dominant: "D".into(),
                description: String::new(),
                dimensions: codes
                    .iter()
                    .map(|c| DiscDimension {
                        code: c.to_string(),
                        label: c.to_string(),
                        value: 80,
                        raw_score: 28.0,
                    })
                    .collect(),
            }),
        }
    }

    fn candidate() -> Candidate {
        Candidate {
            name: "张三".into(),
            phone: "13800000000".into(),
            ..Candidate::default()
        }
    }

    #[test]
    fn lifecycle_runs_forward() {
        let q = disc_questionnaire(&["D", "I", "S", "C"]);
        let now = jiff::Timestamp::now();
        let mut sub = Submission::start(1, "SUB_1", 3, &q, candidate(), now);
        assert_eq!(sub.status, SubmissionStatus::Started);

        sub.record_answer("1", AnswerValue::Number(4.0)).unwrap();
        assert_eq!(sub.status, SubmissionStatus::InProgress);
        sub.record_answer("2", AnswerValue::Number(5.0)).unwrap();

        sub.complete(disc_result(&["D"]), now).unwrap();
        assert_eq!(sub.status, SubmissionStatus::Completed);
        assert_eq!(sub.grade(), Some("B"));
        assert_eq!(sub.summary().total_score, Some(80.0));
    }

    #[test]
    fn completed_submission_rejects_changes() {
        let q = disc_questionnaire(&["D"]);
        let now = jiff::Timestamp::now();
        let mut sub = Submission::start(1, "SUB_1", 3, &q, candidate(), now);
        sub.complete(disc_result(&["D"]), now).unwrap();

        assert!(matches!(
            sub.abandon(),
            Err(CoreError::InvalidTransition {
                from: SubmissionStatus::Completed,
                to: SubmissionStatus::Abandoned
            })
        ));
        assert!(sub.record_answer("1", AnswerValue::Bool(true)).is_err());
    }

    #[test]
    fn result_dimensions_must_be_declared() {
        let q = disc_questionnaire(&["D", "I"]);
        let now = jiff::Timestamp::now();
        let mut sub = Submission::start(1, "SUB_1", 3, &q, candidate(), now);
        sub.complete(disc_result(&["D", "X"]), now).unwrap();

        match sub.check_dimensions(&q) {
            Err(CoreError::UndeclaredDimension { dimension, .. }) => assert_eq!(dimension, "X"),
            other => panic!("expected undeclared dimension, got {other:?}"),
        }
    }

    #[test]
    fn candidate_fields_flatten_with_prefix() {
        let q = disc_questionnaire(&["D"]);
        let sub = Submission::start(1, "SUB_1", 3, &q, candidate(), jiff::Timestamp::now());
        let json = serde_json::to_value(&sub).unwrap();
        assert_eq!(json["candidate_name"], "张三");
        assert_eq!(json["questionnaire_type"], "DISC");
    }
}
