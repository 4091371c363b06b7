use talent_core::api_paths;
use talent_core::models::analytics::AnalyticsSummary;

use crate::client::ApiClient;
use crate::error::ApiError;

impl ApiClient {
    /// Dashboard aggregates. Authenticated; offline they are computed over
    /// the mock pool.
    pub async fn analytics_summary(&self) -> Result<AnalyticsSummary, ApiError> {
        let fallback = self.mock().read(|data| data.analytics_summary()).await;
        self.get(api_paths::ANALYTICS_SUMMARY)
            .authenticated()
            .fallback(fallback)
            .send()
            .await
    }
}
