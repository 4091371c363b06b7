use talent_core::api_paths;
use talent_core::models::job_profile::{
    DimensionSuggestion, JobPosition, JobPositionDetail, JobPositionDraft, JobPositionUpdate,
    RequirementAnalysis,
};
use talent_core::models::page::Page;

use crate::client::{ApiClient, Fetched};
use crate::error::ApiError;
use crate::transport::FilePart;

impl ApiClient {
    pub async fn list_job_positions(&self) -> Result<Page<JobPosition>, ApiError> {
        let fallback = self
            .mock()
            .read(|data| Page::of(data.job_positions.clone()))
            .await;
        self.get(api_paths::JOB_POSITIONS)
            .fallback(fallback)
            .send()
            .await
    }

    /// A position with its requirement profiles. Offline, mock positions
    /// carry no profiles.
    pub async fn get_job_position(&self, id: u64) -> Result<JobPositionDetail, ApiError> {
        let fallback = self
            .mock()
            .read(|data| {
                data.job_positions
                    .iter()
                    .find(|p| p.id == id)
                    .map(|position| JobPositionDetail {
                        position: position.clone(),
                        profiles: Vec::new(),
                    })
            })
            .await;
        self.get(api_paths::job_position(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    pub async fn create_job_position(
        &self,
        draft: &JobPositionDraft,
    ) -> Result<JobPosition, ApiError> {
        let fetched = self
            .post(api_paths::JOB_POSITIONS)
            .json(draft)
            .fallback(JobPosition::from_draft(0, draft))
            .send_fetched()
            .await?;
        match fetched {
            Fetched::Live(created) => Ok(created),
            Fetched::Fallback(mut created) => Ok(self
                .mock()
                .write(|data| {
                    created.id = data.next_id();
                    data.job_positions.push(created.clone());
                    created
                })
                .await),
        }
    }

    pub async fn update_job_position(
        &self,
        id: u64,
        update: &JobPositionUpdate,
    ) -> Result<JobPosition, ApiError> {
        let fallback = self
            .mock()
            .read(|data| {
                data.job_positions.iter().find(|p| p.id == id).map(|existing| {
                    let mut updated = existing.clone();
                    updated.apply(update);
                    updated
                })
            })
            .await;
        let fetched = self
            .put(api_paths::job_position(id))
            .json(update)
            .fallback_opt(fallback)
            .send_fetched()
            .await?;
        if let Fetched::Fallback(updated) = &fetched {
            self.mock()
                .write(|data| {
                    if let Some(slot) = data.job_positions.iter_mut().find(|p| p.id == id) {
                        *slot = updated.clone();
                    }
                })
                .await;
        }
        Ok(fetched.into_inner())
    }

    pub async fn delete_job_position(&self, id: u64) -> Result<(), ApiError> {
        let fetched = self
            .delete(api_paths::job_position(id))
            .fallback(())
            .send_fetched()
            .await?;
        if fetched.is_fallback() {
            self.mock()
                .write(|data| data.job_positions.retain(|p| p.id != id))
                .await;
        }
        Ok(())
    }

    /// AI reading of a free-text requirement. No offline fallback.
    pub async fn analyze_requirement(
        &self,
        requirement_text: &str,
    ) -> Result<RequirementAnalysis, ApiError> {
        self.post(api_paths::REQUIREMENT_ANALYSIS)
            .json(&serde_json::json!({ "requirement_text": requirement_text }))
            .send()
            .await
    }

    /// Dimension weights proposed for a position, optionally guided by an
    /// earlier [`ApiClient::analyze_requirement`].
    pub async fn suggest_dimensions(
        &self,
        position_id: u64,
        analysis: Option<&RequirementAnalysis>,
    ) -> Result<DimensionSuggestion, ApiError> {
        self.post(api_paths::job_position_dimensions(position_id))
            .json(&serde_json::json!({
                "job_position_id": position_id,
                "requirement_analysis": analysis,
            }))
            .send()
            .await
    }

    /// Upload a job description for AI extraction of requirements.
    pub async fn parse_job_description(
        &self,
        file: FilePart,
    ) -> Result<serde_json::Value, ApiError> {
        self.post(api_paths::JD_PARSE).file(file).send().await
    }
}
