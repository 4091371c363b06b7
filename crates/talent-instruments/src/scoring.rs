use serde::{Deserialize, Serialize};
use talent_core::models::answer::Answers;
use talent_core::models::questionnaire::{Questionnaire, QuestionnaireType};
use talent_core::models::result::ScoredResult;
use ts_rs::TS;

use crate::error::InstrumentError;
use crate::{custom, get_instrument};

/// Linear raw-to-T rescale.
///
/// For a dimension with `n` answered items the expected raw score is
/// `n * mean_ratio` with spread `n * sd_ratio`; the T-score is
/// `center + scale * (raw - mean) / sd`, truncated and clamped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct TScoreScale {
    pub center: f64,
    pub scale: f64,
    pub mean_ratio: f64,
    pub sd_ratio: f64,
    pub min: i32,
    pub max: i32,
}

impl Default for TScoreScale {
    fn default() -> Self {
        Self {
            center: 50.0,
            scale: 10.0,
            mean_ratio: 0.5,
            sd_ratio: 0.25,
            min: 20,
            max: 80,
        }
    }
}

impl TScoreScale {
    pub fn t_score(&self, raw: u32, answered: u32) -> i32 {
        if answered == 0 {
            return (self.center as i32).clamp(self.min, self.max);
        }
        let n = f64::from(answered);
        let mean = n * self.mean_ratio;
        let sd = n * self.sd_ratio;
        let t = if sd > 0.0 {
            (self.center + self.scale * (f64::from(raw) - mean) / sd) as i32
        } else {
            self.center as i32
        };
        t.clamp(self.min, self.max)
    }
}

/// Score a submission's answers against its questionnaire.
///
/// Built-in instruments score against the questionnaire's own questions when
/// it carries any, and against the standard item bank otherwise. Anything
/// else, including types no instrument claims, is scored as a custom
/// questionnaire.
///
/// A questionnaire that declares dimensions must declare every dimension the
/// instrument reports; one that declares none takes the instrument's own.
pub fn score_submission(
    questionnaire: &Questionnaire,
    answers: &Answers,
) -> Result<ScoredResult, InstrumentError> {
    let Some(instrument) = get_instrument(questionnaire.kind) else {
        tracing::debug!(
            questionnaire = %questionnaire.code,
            kind = %questionnaire.kind,
            answers = answers.len(),
            "scoring as custom questionnaire"
        );
        return custom::score(questionnaire, answers);
    };

    let questions = if questionnaire.questions.is_empty() {
        instrument.questions()
    } else {
        questionnaire.questions.as_slice()
    };

    tracing::debug!(
        questionnaire = %questionnaire.code,
        kind = %questionnaire.kind,
        questions = questions.len(),
        answers = answers.len(),
        "scoring with built-in instrument"
    );
    let result = instrument.score(questions, answers);
    if !questionnaire.dimensions.is_empty() {
        result.check_dimensions(questionnaire)?;
    }
    Ok(result)
}

/// Score by type label alone, against the standard item bank.
pub fn score_by_label(label: &str, answers: &Answers) -> Result<ScoredResult, InstrumentError> {
    let kind: QuestionnaireType = label.parse()?;
    let instrument =
        get_instrument(kind).ok_or_else(|| InstrumentError::UnknownInstrument(label.to_string()))?;
    Ok(instrument.score(instrument.questions(), answers))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn t_score_defaults() {
        let scale = TScoreScale::default();
        assert_eq!(scale.t_score(0, 0), 50);
        // 21 items: mean 10.5, sd 5.25 -> 50 + 10 * 7.5 / 5.25 = 64.28
        assert_eq!(scale.t_score(18, 21), 64);
        assert_eq!(scale.t_score(21, 21), 70);
        assert_eq!(scale.t_score(0, 21), 30);
    }

    #[test]
    fn t_score_clamps() {
        let wide = TScoreScale {
            scale: 40.0,
            ..TScoreScale::default()
        };
        assert_eq!(wide.t_score(20, 20), 80);
        assert_eq!(wide.t_score(0, 20), 20);
    }
}
