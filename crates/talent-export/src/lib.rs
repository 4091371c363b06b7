//! talent-export
//!
//! HTML report rendering from scored submissions, and questionnaire
//! import/export in plain text and JSON.

pub mod error;
pub mod questionnaire_text;
pub mod render;
