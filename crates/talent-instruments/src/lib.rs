//! talent-instruments
//!
//! Built-in personality instruments (MBTI, DISC, EPQ), the scoring pipeline
//! that turns raw answers into dimension scores and grades, candidate/job
//! matching, and submission statistics. Pure computation; no I/O.

pub mod catalog;
pub mod custom;
pub mod error;
pub mod instruments;
pub mod matching;
pub mod scoring;
pub mod statistics;

use talent_core::models::answer::Answers;
use talent_core::models::grade::GradeScale;
use talent_core::models::question::Question;
use talent_core::models::questionnaire::{
    DimensionDef, Questionnaire, QuestionnaireStatus, QuestionnaireType, ScoringConfig,
};
use talent_core::models::result::ScoredResult;

/// Trait implemented by each built-in personality instrument.
pub trait Instrument: Send + Sync {
    /// Questionnaire type this instrument scores.
    fn kind(&self) -> QuestionnaireType;

    /// Human-readable name (e.g., "MBTI 职业性格测试").
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    fn estimated_minutes(&self) -> u32;

    /// The dimensions this instrument reports on.
    fn dimensions(&self) -> &[DimensionDef];

    /// The standard item bank, in presentation order.
    fn questions(&self) -> &[Question];

    /// Score `answers` against `questions`. Callers pass the questionnaire's
    /// own question list when it has one and the standard bank otherwise.
    fn score(&self, questions: &[Question], answers: &Answers) -> ScoredResult;

    /// Grade scale applied to the instrument's total score.
    fn grades(&self) -> GradeScale {
        GradeScale::default()
    }

    /// Build the published questionnaire for this instrument.
    fn questionnaire(&self, id: u64, now: jiff::Timestamp) -> Questionnaire {
        Questionnaire {
            id,
            code: self.kind().as_str().to_string(),
            name: self.name().to_string(),
            kind: self.kind(),
            description: self.description().to_string(),
            dimensions: self.dimensions().to_vec(),
            questions: self.questions().to_vec(),
            scoring: Some(ScoringConfig {
                enabled: true,
                grades: self.grades(),
                ..ScoringConfig::default()
            }),
            status: QuestionnaireStatus::Active,
            estimated_minutes: self.estimated_minutes(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Return all registered instruments.
pub fn all_instruments() -> Vec<Box<dyn Instrument>> {
    vec![
        Box::new(instruments::mbti::Mbti),
        Box::new(instruments::disc::Disc),
        Box::new(instruments::epq::Epq),
    ]
}

/// Look up an instrument by questionnaire type. Custom questionnaires have none.
pub fn get_instrument(kind: QuestionnaireType) -> Option<Box<dyn Instrument>> {
    all_instruments().into_iter().find(|i| i.kind() == kind)
}
