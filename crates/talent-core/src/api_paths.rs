//! REST path conventions.
//!
//! Pure string functions with no HTTP dependency. These define the canonical
//! layout of the assessment backend's endpoints.

pub const LOGIN: &str = "/auth/login";

pub const REFRESH: &str = "/auth/refresh";

pub const QUESTIONNAIRES: &str = "/api/assessments/questionnaires";

pub const QUESTIONNAIRE_IMPORT: &str = "/api/assessments/questionnaires/import";

pub const ASSESSMENTS: &str = "/api/assessments";

pub const SUBMISSIONS: &str = "/api/assessments/submissions";

pub const STATISTICS: &str = "/api/assessments/statistics";

pub const CANDIDATES: &str = "/api/candidates";

pub const RESUME_PARSE: &str = "/api/resumes/parse";

pub const JOB_POSITIONS: &str = "/api/job-positions";

pub const JD_PARSE: &str = "/api/job-positions/parse";

pub const JOB_PROFILES: &str = "/api/job-profiles";

pub const REQUIREMENT_ANALYSIS: &str = "/api/job-positions/analyze-requirement";

pub const CANDIDATE_PORTRAITS: &str = "/api/candidates/portraits";

pub const ANALYTICS_SUMMARY: &str = "/analytics/summary";

pub fn questionnaire(id: u64) -> String {
    format!("{QUESTIONNAIRES}/{id}")
}

pub fn questionnaire_question_stats(id: u64) -> String {
    format!("{QUESTIONNAIRES}/{id}/question-stats")
}

pub fn assessment(id: u64) -> String {
    format!("{ASSESSMENTS}/{id}")
}

pub fn submission(id: u64) -> String {
    format!("{SUBMISSIONS}/{id}")
}

pub fn candidate(id: u64) -> String {
    format!("{CANDIDATES}/{id}")
}

pub fn candidate_portrait(id: u64) -> String {
    format!("{CANDIDATES}/{id}/portrait")
}

pub fn portrait_cache_status(id: u64) -> String {
    format!("{CANDIDATES}/{id}/portrait-cache-status")
}

pub fn candidate_resume(id: u64) -> String {
    format!("/api/resumes/candidates/{id}")
}

pub fn candidate_resume_upload(id: u64) -> String {
    format!("/api/resumes/candidates/{id}/upload")
}

pub fn candidate_resume_parse(id: u64) -> String {
    format!("/api/resumes/candidates/{id}/parse")
}

pub fn candidate_resume_download(id: u64) -> String {
    format!("/api/resumes/candidates/{id}/download")
}

pub fn job_position(id: u64) -> String {
    format!("{JOB_POSITIONS}/{id}")
}

pub fn job_position_dimensions(id: u64) -> String {
    format!("{JOB_POSITIONS}/{id}/suggest-dimensions")
}

pub fn job_profile(id: u64) -> String {
    format!("{JOB_PROFILES}/{id}")
}

pub fn job_profile_match(id: u64) -> String {
    format!("{JOB_PROFILES}/{id}/match")
}

pub fn job_profile_matches(id: u64) -> String {
    format!("{JOB_PROFILES}/{id}/matches")
}

pub fn public_assessment(code: &str) -> String {
    format!("/api/public/assessment/{code}")
}

pub fn public_start(code: &str) -> String {
    format!("/api/public/assessment/{code}/start")
}

pub fn public_check_submit(code: &str) -> String {
    format!("/api/public/assessment/{code}/check-submit")
}

pub fn public_submit(submission_code: &str) -> String {
    format!("/api/public/assessment/submission/{submission_code}/submit")
}

/// Append `key=value` pairs to a path, skipping `None` values.
pub fn with_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let pairs: Vec<String> = params
        .iter()
        .filter_map(|(key, value)| value.as_ref().map(|v| format!("{key}={v}")))
        .collect();
    if pairs.is_empty() {
        path.to_string()
    } else {
        format!("{path}?{}", pairs.join("&"))
    }
}
