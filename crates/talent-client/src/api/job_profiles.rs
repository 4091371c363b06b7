use talent_core::api_paths;
use talent_core::models::job_profile::{
    JobProfile, JobProfileDraft, MatchRequest, MatchResponse, ProfileStatus,
};
use talent_core::models::page::Page;
use talent_instruments::matching::rank_matches;

use super::Paging;
use crate::client::{ApiClient, Fetched};
use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct JobProfileQuery {
    pub paging: Paging,
    pub department: Option<String>,
    pub status: Option<ProfileStatus>,
}

impl JobProfileQuery {
    fn matches(&self, profile: &JobProfile) -> bool {
        self.department
            .as_ref()
            .is_none_or(|d| profile.department.as_ref() == Some(d))
            && self.status.is_none_or(|s| profile.status == s)
    }
}

impl ApiClient {
    pub async fn list_job_profiles(
        &self,
        query: &JobProfileQuery,
    ) -> Result<Page<JobProfile>, ApiError> {
        let mut params = query.paging.params().to_vec();
        params.push(("department", query.department.clone()));
        // The backend names this parameter `status_filter`.
        params.push((
            "status_filter",
            query.status.map(|s| match s {
                ProfileStatus::Active => "active".to_string(),
                ProfileStatus::Inactive => "inactive".to_string(),
            }),
        ));
        let path = api_paths::with_query(api_paths::JOB_PROFILES, &params);

        let fallback = self
            .mock()
            .read(|data| {
                let matching: Vec<JobProfile> = data
                    .job_profiles
                    .iter()
                    .filter(|p| query.matches(p))
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

    pub async fn get_job_profile(&self, id: u64) -> Result<JobProfile, ApiError> {
        let fallback = self
            .mock()
            .read(|data| data.job_profiles.iter().find(|p| p.id == id).cloned())
            .await;
        self.get(api_paths::job_profile(id))
            .fallback_opt(fallback)
            .send()
            .await
    }

    pub async fn create_job_profile(&self, draft: &JobProfileDraft) -> Result<JobProfile, ApiError> {
        let now = jiff::Timestamp::now();
        let provisional = profile_from_draft(0, draft, now, now);
        let fetched = self
            .post(api_paths::JOB_PROFILES)
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
                    data.job_profiles.push(created.clone());
                    created
                })
                .await),
        }
    }

    pub async fn update_job_profile(
        &self,
        id: u64,
        draft: &JobProfileDraft,
    ) -> Result<JobProfile, ApiError> {
        let now = jiff::Timestamp::now();
        let fallback = self
            .mock()
            .read(|data| {
                data.job_profiles
                    .iter()
                    .find(|p| p.id == id)
                    .map(|existing| {
                        let mut updated = profile_from_draft(id, draft, existing.created_at, now);
                        updated.status = existing.status;
                        updated
                    })
            })
            .await;
        let fetched = self
            .put(api_paths::job_profile(id))
            .json(draft)
            .fallback_opt(fallback)
            .send_fetched()
            .await?;
        if let Fetched::Fallback(updated) = &fetched {
            self.mock()
                .write(|data| {
                    if let Some(slot) = data.job_profiles.iter_mut().find(|p| p.id == id) {
                        *slot = updated.clone();
                    }
                })
                .await;
        }
        Ok(fetched.into_inner())
    }

    pub async fn delete_job_profile(&self, id: u64) -> Result<(), ApiError> {
        let fetched = self
            .delete(api_paths::job_profile(id))
            .fallback(())
            .send_fetched()
            .await?;
        if fetched.is_fallback() {
            self.mock()
                .write(|data| data.job_profiles.retain(|p| p.id != id))
                .await;
        }
        Ok(())
    }

    /// Rank scored submissions against a profile. Offline, the ranking is
    /// computed locally over mock submissions.
    pub async fn match_candidates(
        &self,
        profile_id: u64,
        request: &MatchRequest,
    ) -> Result<MatchResponse, ApiError> {
        let fallback = self
            .mock()
            .read(|data| {
                data.job_profiles
                    .iter()
                    .find(|p| p.id == profile_id)
                    .map(|profile| rank_matches(profile, &data.submissions, request))
            })
            .await;
        self.post(api_paths::job_profile_match(profile_id))
            .json(request)
            .fallback_opt(fallback)
            .send()
            .await
    }

    /// Matches stored by earlier runs of [`ApiClient::match_candidates`].
    pub async fn profile_matches(
        &self,
        profile_id: u64,
        request: &MatchRequest,
    ) -> Result<MatchResponse, ApiError> {
        let path = api_paths::with_query(
            &api_paths::job_profile_matches(profile_id),
            &[
                ("min_score", request.min_score.map(|s| s.to_string())),
                ("limit", request.limit.map(|l| l.to_string())),
            ],
        );
        self.get(path).send().await
    }
}

fn profile_from_draft(
    id: u64,
    draft: &JobProfileDraft,
    created_at: jiff::Timestamp,
    updated_at: jiff::Timestamp,
) -> JobProfile {
    JobProfile {
        id,
        name: draft.name.clone(),
        department: draft.department.clone(),
        description: draft.description.clone(),
        tags: draft.tags.clone(),
        dimensions: draft.dimensions.clone(),
        status: ProfileStatus::Active,
        created_at,
        updated_at,
    }
}
