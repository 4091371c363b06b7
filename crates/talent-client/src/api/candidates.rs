use talent_core::api_paths;
use talent_core::models::candidate::{CandidatePage, CandidateQuery, CandidateSummary};

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::FilePart;

impl ApiClient {
    /// Talent pool listing. Authenticated, with mock fallback.
    pub async fn list_candidates(&self, query: &CandidateQuery) -> Result<CandidatePage, ApiError> {
        let path = api_paths::with_query(
            api_paths::CANDIDATES,
            &[
                ("page", query.page.map(|p| p.to_string())),
                ("page_size", query.page_size.map(|p| p.to_string())),
                ("keyword", query.keyword.clone().filter(|k| !k.is_empty())),
                ("position", query.position.clone().filter(|p| !p.is_empty())),
                ("status", query.status.clone().filter(|s| !s.is_empty())),
            ],
        );
        let fallback = self.mock().read(|data| data.candidate_page(query)).await;
        self.get(path)
            .authenticated()
            .fallback(fallback)
            .send()
            .await
    }

    pub async fn get_candidate(&self, id: u64) -> Result<CandidateSummary, ApiError> {
        let fallback = self
            .mock()
            .read(|data| data.candidates.iter().find(|c| c.id == id).cloned())
            .await;
        self.get(api_paths::candidate(id))
            .authenticated()
            .fallback_opt(fallback)
            .send()
            .await
    }

    /// Upload a resume for AI extraction. The parsed fields are returned
    /// as the backend produced them.
    pub async fn parse_resume(&self, file: FilePart) -> Result<serde_json::Value, ApiError> {
        tracing::info!(file = %file.file_name, "uploading resume");
        self.post(api_paths::RESUME_PARSE)
            .authenticated()
            .file(file)
            .send()
            .await
    }
}
