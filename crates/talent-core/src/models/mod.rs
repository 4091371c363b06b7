pub mod analytics;
pub mod answer;
pub mod assessment;
pub mod candidate;
pub mod grade;
pub mod job_profile;
pub mod page;
pub mod portrait;
pub mod question;
pub mod questionnaire;
pub mod result;
pub mod statistics;
pub mod submission;
