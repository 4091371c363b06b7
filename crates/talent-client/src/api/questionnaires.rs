use serde::{Deserialize, Serialize};
use talent_core::api_paths;
use talent_core::models::page::Page;
use talent_core::models::questionnaire::{Questionnaire, QuestionnaireCategory};
use talent_core::models::statistics::QuestionnaireQuestionStats;
use talent_instruments::catalog::filter_by_category;
use talent_instruments::statistics::question_stats;

use super::Paging;
use crate::client::{ApiClient, Fetched};
use crate::error::ApiError;
use crate::transport::FilePart;

#[derive(Debug, Clone, Copy, Default)]
pub struct QuestionnaireQuery {
    pub paging: Paging,
    pub category: Option<QuestionnaireCategory>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ImportMetadata {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub estimated_minutes: Option<u32>,
}

/// Server-side parse of an uploaded questionnaire file. Questions keep the
/// server's loose shape; `talent_export::questionnaire_text::import_json`
/// normalises them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImportResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub metadata: ImportMetadata,
    #[serde(default)]
    pub questions: Vec<serde_json::Value>,
}

impl ApiClient {
    pub async fn list_questionnaires(
        &self,
        query: QuestionnaireQuery,
    ) -> Result<Page<Questionnaire>, ApiError> {
        let category = query.category.and_then(|c| {
            serde_json::to_value(c)
                .ok()
                .and_then(|v| v.as_str().map(str::to_string))
        });
        let mut params = query.paging.params().to_vec();
        params.push(("category", category));
        let path = api_paths::with_query(api_paths::QUESTIONNAIRES, &params);

        let fallback = self
            .mock()
            .read(|data| {
                let matching: Vec<Questionnaire> =
                    filter_by_category(&data.questionnaires, query.category)
                        .into_iter()
                        .cloned()
                        .collect();
                Page::of(matching)
            })
            .await;
        self.get(path).fallback(fallback).send().await
    }

    pub async fn get_questionnaire(&self, id: u64) -> Result<Questionnaire, ApiError> {
        let fallback = self.mock().read(|data| data.questionnaire(id).cloned()).await;
        self.get(api_paths::questionnaire(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    pub async fn create_questionnaire(
        &self,
        questionnaire: &Questionnaire,
    ) -> Result<Questionnaire, ApiError> {
        let fetched = self
            .post(api_paths::QUESTIONNAIRES)
            .json(questionnaire)
            .fallback(questionnaire.clone())
            .send_fetched()
            .await?;
        match fetched {
            Fetched::Live(created) => Ok(created),
            Fetched::Fallback(mut created) => Ok(self
                .mock()
                .write(|data| {
                    created.id = data.next_id();
                    data.questionnaires.push(created.clone());
                    created
                })
                .await),
        }
    }

    pub async fn update_questionnaire(
        &self,
        id: u64,
        questionnaire: &Questionnaire,
    ) -> Result<Questionnaire, ApiError> {
        let mut updated = questionnaire.clone();
        updated.id = id;
        let fetched = self
            .put(api_paths::questionnaire(id))
            .json(questionnaire)
            .fallback(updated)
            .send_fetched()
            .await?;
        if let Fetched::Fallback(updated) = &fetched {
            self.mock()
                .write(|data| {
                    if let Some(slot) = data.questionnaires.iter_mut().find(|q| q.id == id) {
                        *slot = updated.clone();
                    }
                })
                .await;
        }
        Ok(fetched.into_inner())
    }

    pub async fn delete_questionnaire(&self, id: u64) -> Result<(), ApiError> {
        let fetched = self
            .delete(api_paths::questionnaire(id))
            .fallback(())
            .send_fetched()
            .await?;
        if fetched.is_fallback() {
            self.mock()
                .write(|data| data.questionnaires.retain(|q| q.id != id))
                .await;
        }
        Ok(())
    }

    /// Per-question answer distribution, computed locally from mock
    /// submissions on fallback.
    pub async fn questionnaire_question_stats(
        &self,
        id: u64,
    ) -> Result<QuestionnaireQuestionStats, ApiError> {
        let fallback = self
            .mock()
            .read(|data| {
                data.questionnaire(id)
                    .map(|q| question_stats(q, &data.submissions))
            })
            .await;
        self.get(api_paths::questionnaire_question_stats(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    /// Upload a questionnaire file for server-side parsing. No fallback.
    pub async fn import_questionnaire(
        &self,
        file: FilePart,
        use_ai: bool,
    ) -> Result<ImportResponse, ApiError> {
        let path = api_paths::with_query(
            api_paths::QUESTIONNAIRE_IMPORT,
            &[("use_ai", Some(use_ai.to_string()))],
        );
        tracing::info!(file = %file.file_name, bytes = file.bytes.len(), "importing questionnaire file");
        self.post(path).file(file).send().await
    }
}
