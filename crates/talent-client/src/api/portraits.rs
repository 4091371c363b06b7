use talent_core::api_paths;
use talent_core::models::page::Page;
use talent_core::models::portrait::{
    AnalysisLevel, CandidatePortrait, CandidatePortraitSummary, PortraitCacheStatus,
};

use super::Paging;
use crate::client::ApiClient;
use crate::error::ApiError;

#[derive(Debug, Clone, Default)]
pub struct PortraitQuery {
    pub paging: Paging,
    pub target_position: Option<String>,
}

impl ApiClient {
    /// One candidate's portrait. `refresh` asks the backend to rebuild it
    /// instead of serving its cache. Offline, the portrait is assembled
    /// from the mock pool.
    pub async fn candidate_portrait(
        &self,
        candidate_id: u64,
        refresh: bool,
        level: AnalysisLevel,
    ) -> Result<CandidatePortrait, ApiError> {
        let path = api_paths::with_query(
            &api_paths::candidate_portrait(candidate_id),
            &[
                ("refresh", refresh.then(|| "true".to_string())),
                ("analysis_level", Some(level.to_string())),
            ],
        );
        let now = jiff::Timestamp::now();
        let fallback = self
            .mock()
            .read(|data| data.portrait(candidate_id, now))
            .await;
        self.get(path).fallback_opt(fallback).send().await
    }

    pub async fn candidate_portraits(
        &self,
        query: &PortraitQuery,
    ) -> Result<Page<CandidatePortraitSummary>, ApiError> {
        let mut params = query.paging.params().to_vec();
        params.push((
            "target_position",
            query.target_position.clone().filter(|p| !p.is_empty()),
        ));
        let path = api_paths::with_query(api_paths::CANDIDATE_PORTRAITS, &params);

        let now = jiff::Timestamp::now();
        let fallback = self
            .mock()
            .read(|data| {
                let rows = data.portrait_summaries(query.target_position.as_deref(), now);
                Page {
                    items: query.paging.window(&rows),
                    total: rows.len() as u64,
                }
            })
            .await;
        self.get(path).fallback(fallback).send().await
    }

    /// Which analysis levels the backend has cached for a candidate.
    pub async fn portrait_cache_status(
        &self,
        candidate_id: u64,
    ) -> Result<PortraitCacheStatus, ApiError> {
        self.get(api_paths::portrait_cache_status(candidate_id))
            .send()
            .await
    }
}
