use thiserror::Error;

use crate::models::submission::SubmissionStatus;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("unknown questionnaire type: {0}")]
    UnknownQuestionnaireType(String),

    #[error("invalid submission transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: SubmissionStatus,
        to: SubmissionStatus,
    },

    #[error("dimension '{dimension}' is not declared by questionnaire '{questionnaire}'")]
    UndeclaredDimension {
        questionnaire: String,
        dimension: String,
    },

    #[error("invalid scoring config: {0}")]
    InvalidScoringConfig(String),

    #[error("missing required field: {0}")]
    MissingField(String),
}
