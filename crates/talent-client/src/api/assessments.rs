use serde::{Deserialize, Serialize};
use talent_core::api_paths;
use talent_core::codes;
use talent_core::models::assessment::{Assessment, FormField, LinkType, PageTexts, RepeatPolicy};
use talent_core::models::page::Page;

use super::Paging;
use crate::client::{ApiClient, Fetched};
use crate::error::ApiError;

/// Body of an assessment create or update.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AssessmentDraft {
    pub name: String,
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
}

impl AssessmentDraft {
    pub fn new(
        name: impl Into<String>,
        questionnaire_id: u64,
        valid_from: jiff::Timestamp,
        valid_until: jiff::Timestamp,
    ) -> Self {
        Self {
            name: name.into(),
            questionnaire_id,
            valid_from,
            valid_until,
            description: None,
            form_fields: FormField::defaults(),
            page_texts: PageTexts::default(),
            link_type: LinkType::default(),
            repeat: RepeatPolicy::default(),
        }
    }

    fn into_assessment(self, id: u64, code: String, now: jiff::Timestamp) -> Assessment {
        Assessment {
            id,
            name: self.name,
            code,
            questionnaire_id: self.questionnaire_id,
            valid_from: self.valid_from,
            valid_until: self.valid_until,
            description: self.description,
            form_fields: self.form_fields,
            page_texts: self.page_texts,
            link_type: self.link_type,
            repeat: self.repeat,
            created_at: now,
        }
    }
}

impl ApiClient {
    pub async fn list_assessments(&self, paging: Paging) -> Result<Page<Assessment>, ApiError> {
        let path = api_paths::with_query(api_paths::ASSESSMENTS, &paging.params());
        let fallback = self
            .mock()
            .read(|data| Page {
                items: paging.window(&data.assessments),
                total: data.assessments.len() as u64,
            })
            .await;
        self.get(path).fallback(fallback).send().await
    }

    pub async fn get_assessment(&self, id: u64) -> Result<Assessment, ApiError> {
        let fallback = self
            .mock()
            .read(|data| data.assessments.iter().find(|a| a.id == id).cloned())
            .await;
        self.get(api_paths::assessment(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    /// Create a distribution link. On fallback the mock store mints the id
    /// and public code.
    pub async fn create_assessment(&self, draft: &AssessmentDraft) -> Result<Assessment, ApiError> {
        let now = jiff::Timestamp::now();
        let provisional = draft.clone().into_assessment(0, codes::assessment_code(), now);
        let fetched = self
            .post(api_paths::ASSESSMENTS)
            .json(draft)
            .fallback(provisional)
            .send_fetched()
            .await?;
        match fetched {
            Fetched::Live(created) => Ok(created),
            Fetched::Fallback(mut created) => Ok(self
                .mock()
                .write(|data| {
                    created.id = data.next_id();
                    data.assessments.push(created.clone());
                    created
                })
                .await),
        }
    }

    pub async fn update_assessment(
        &self,
        id: u64,
        draft: &AssessmentDraft,
    ) -> Result<Assessment, ApiError> {
        let fallback = self
            .mock()
            .read(|data| {
                data.assessments.iter().find(|a| a.id == id).map(|existing| {
                    draft
                        .clone()
                        .into_assessment(id, existing.code.clone(), existing.created_at)
                })
            })
            .await;
        let fetched = self
            .put(api_paths::assessment(id))
            .json(draft)
            .fallback_opt(fallback)
            .send_fetched()
            .await?;
        if let Fetched::Fallback(updated) = &fetched {
            self.mock()
                .write(|data| {
                    if let Some(slot) = data.assessments.iter_mut().find(|a| a.id == id) {
                        *slot = updated.clone();
                    }
                })
                .await;
        }
        Ok(fetched.into_inner())
    }

    /// Delete a distribution link. `force` also removes its submissions.
    pub async fn delete_assessment(&self, id: u64, force: bool) -> Result<(), ApiError> {
        let path = api_paths::with_query(
            &api_paths::assessment(id),
            &[("force", force.then(|| "true".to_string()))],
        );
        let fetched = self.delete(path).fallback(()).send_fetched().await?;
        if fetched.is_fallback() {
            self.mock()
                .write(|data| {
                    data.assessments.retain(|a| a.id != id);
                    if force {
                        data.submissions.retain(|s| s.assessment_id != id);
                    }
                })
                .await;
        }
        Ok(())
    }
}
