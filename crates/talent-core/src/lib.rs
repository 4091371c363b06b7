//! talent-core
//!
//! Pure domain types and REST path conventions. No I/O; this is the shared
//! vocabulary of the assessment system: questionnaires, assessments,
//! submissions, scored results, and job profiles.

pub mod api_paths;
pub mod codes;
pub mod error;
pub mod models;
