//! Resumes stored against a pool candidate. Payloads are passed through as
//! the backend returns them.

use talent_core::api_paths;
use talent_core::models::portrait::AnalysisLevel;

use crate::client::ApiClient;
use crate::error::ApiError;
use crate::transport::FilePart;

impl ApiClient {
    pub async fn upload_resume(
        &self,
        candidate_id: u64,
        file: FilePart,
    ) -> Result<serde_json::Value, ApiError> {
        tracing::info!(candidate_id, file = %file.file_name, "uploading candidate resume");
        self.post(api_paths::candidate_resume_upload(candidate_id))
            .authenticated()
            .file(file)
            .send()
            .await
    }

    pub async fn resume_info(&self, candidate_id: u64) -> Result<serde_json::Value, ApiError> {
        self.get(api_paths::candidate_resume(candidate_id))
            .authenticated()
            .send()
            .await
    }

    pub async fn delete_resume(&self, candidate_id: u64) -> Result<(), ApiError> {
        self.delete(api_paths::candidate_resume(candidate_id))
            .authenticated()
            .send()
            .await
    }

    /// Re-run AI extraction on a stored resume.
    pub async fn reparse_resume(
        &self,
        candidate_id: u64,
        level: AnalysisLevel,
    ) -> Result<serde_json::Value, ApiError> {
        let path = api_paths::with_query(
            &api_paths::candidate_resume_parse(candidate_id),
            &[("analysis_level", Some(level.to_string()))],
        );
        self.post(path).authenticated().send().await
    }

    /// Absolute URL the stored resume can be downloaded from.
    pub fn resume_download_url(&self, candidate_id: u64) -> String {
        self.config()
            .url(&api_paths::candidate_resume_download(candidate_id))
    }
}
