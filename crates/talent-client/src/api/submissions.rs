use talent_core::api_paths;
use talent_core::models::page::Page;
use talent_core::models::questionnaire::QuestionnaireCategory;
use talent_core::models::statistics::SubmissionStatistics;
use talent_core::models::submission::{Submission, SubmissionStatus};
use talent_instruments::statistics::submission_statistics;

use super::Paging;
use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, Copy, Default)]
pub struct SubmissionQuery {
    pub paging: Paging,
    pub status: Option<SubmissionStatus>,
    pub category: Option<QuestionnaireCategory>,
    pub questionnaire_id: Option<u64>,
}

impl SubmissionQuery {
    fn params(&self) -> Vec<(&'static str, Option<String>)> {
        let mut params = self.paging.params().to_vec();
        params.push(("status", self.status.and_then(label)));
        params.push(("category", self.category.and_then(label)));
        params.push(("questionnaire_id", self.questionnaire_id.map(|id| id.to_string())));
        params
    }

    /// Mock-side filter. Professional means a built-in instrument; every
    /// other category means a custom questionnaire.
    fn matches(&self, submission: &Submission) -> bool {
        let professional = submission.questionnaire_type.is_professional();
        self.status.is_none_or(|s| submission.status == s)
            && self.questionnaire_id.is_none_or(|id| submission.questionnaire_id == id)
            && self.category.is_none_or(|c| match c {
                QuestionnaireCategory::Professional => professional,
                _ => !professional,
            })
    }
}

fn label<T: serde::Serialize>(value: T) -> Option<String> {
    serde_json::to_value(value)
        .ok()
        .and_then(|v| v.as_str().map(str::to_string))
}

impl ApiClient {
    pub async fn list_submissions(
        &self,
        query: SubmissionQuery,
    ) -> Result<Page<Submission>, ApiError> {
        let path = api_paths::with_query(api_paths::SUBMISSIONS, &query.params());
        let fallback = self
            .mock()
            .read(|data| {
                let matching: Vec<Submission> = data
                    .submissions
                    .iter()
                    .filter(|s| query.matches(s))
                    .cloned()
                    .collect();
                Page {
                    items: query.paging.window(&matching),
                    total: matching.len() as u64,
                }
            })
            .await;
        self.get(path).fallback(fallback).send().await
    }

    pub async fn get_submission(&self, id: u64) -> Result<Submission, ApiError> {
        let fallback = self
            .mock()
            .read(|data| data.submissions.iter().find(|s| s.id == id).cloned())
            .await;
        self.get(api_paths::submission(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    pub async fn delete_submission(&self, id: u64) -> Result<(), ApiError> {
        let fetched = self
            .delete(api_paths::submission(id))
            .fallback(())
            .send_fetched()
            .await?;
        if fetched.is_fallback() {
            self.mock()
                .write(|data| data.submissions.retain(|s| s.id != id))
                .await;
        }
        Ok(())
    }

    /// Score summary. On fallback this is computed from mock submissions,
    /// which is all zeros until something has been submitted.
    pub async fn submission_statistics(
        &self,
        category: Option<QuestionnaireCategory>,
        questionnaire_id: Option<u64>,
    ) -> Result<SubmissionStatistics, ApiError> {
        let query = SubmissionQuery {
            category,
            questionnaire_id,
            ..SubmissionQuery::default()
        };
        let path = api_paths::with_query(
            api_paths::STATISTICS,
            &[
                ("category", category.and_then(label)),
                ("questionnaire_id", questionnaire_id.map(|id| id.to_string())),
            ],
        );
        let fallback = self
            .mock()
            .read(|data| {
                let matching: Vec<Submission> = data
                    .submissions
                    .iter()
                    .filter(|s| query.matches(s))
                    .cloned()
                    .collect();
                submission_statistics(&matching)
            })
            .await;
        self.get(path).fallback(fallback).send().await
    }
}
