//! Endpoint wrappers, one module per backend area. Each adds methods to
//! [`ApiClient`](crate::client::ApiClient) and supplies the mock fallback
//! its endpoint is allowed to use.

pub mod analytics;
pub mod assessments;
pub mod auth;
pub mod candidates;
pub mod job_positions;
pub mod job_profiles;
pub mod portraits;
pub mod public;
pub mod questionnaires;
pub mod resumes;
pub mod submissions;

/// `skip`/`limit` paging shared by the list endpoints.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Paging {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
}

impl Paging {
    pub(crate) fn params(&self) -> [(&'static str, Option<String>); 2] {
        [
            ("skip", self.skip.filter(|s| *s > 0).map(|s| s.to_string())),
            ("limit", self.limit.map(|l| l.to_string())),
        ]
    }

    /// Apply the same window to mock data.
    pub(crate) fn window<T: Clone>(&self, items: &[T]) -> Vec<T> {
        items
            .iter()
            .skip(self.skip.unwrap_or(0) as usize)
            .take(self.limit.map_or(usize::MAX, |l| l as usize))
            .cloned()
            .collect()
    }
}
