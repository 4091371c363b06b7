//! Scoring for custom questionnaires.
//!
//! Each answered question earns a share of its `max_score` according to its
//! kind and the questionnaire's scoring method. Free-form questions are never
//! scored. Questionnaires without scoring enabled only collect answers.

use talent_core::models::answer::{AnswerValue, Answers};
use talent_core::models::question::{Question, QuestionKind};
use talent_core::models::questionnaire::{Questionnaire, ScoringConfig, ScoringMethod};
use talent_core::models::result::{
    AnswerScoring, CustomResult, DetailedAnswer, ResultDetails, ScoredResult,
};

use crate::error::InstrumentError;

/// Earned and available points for one answered question.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct QuestionScore {
    pub earned: f64,
    pub max: f64,
}

impl QuestionScore {
    const UNSCORED: QuestionScore = QuestionScore {
        earned: 0.0,
        max: 0.0,
    };
}

pub fn score(questionnaire: &Questionnaire, answers: &Answers) -> Result<ScoredResult, InstrumentError> {
    let config = match &questionnaire.scoring {
        Some(config) if config.enabled => config,
        _ => return Ok(unscored(questionnaire, answers)),
    };
    config.validate()?;

    let mut total_earned = 0.0;
    let mut detailed_answers = Vec::new();

    for question in &questionnaire.questions {
        let Some(answer) = answers.lookup(&question.id) else {
            continue;
        };
        let points = score_question(question, answer, config.method);
        total_earned += points.earned;

        let scoring = (points.max > 0.0).then(|| AnswerScoring {
            earned_score: round1(points.earned),
            max_score: points.max,
            percentage: round1(points.earned / points.max * 100.0),
        });
        detailed_answers.push(detailed(question, answer, scoring));
    }

    let total = round1(total_earned);
    let grade = config.grades.cutoffs().grade_for(total).to_string();

    Ok(ScoredResult {
        total_score: Some(total),
        grade: Some(grade),
        details: ResultDetails::Custom(CustomResult {
            max_score: Some(config.total_score),
            score_percentage: Some(percentage(total_earned, config)),
            detailed_answers,
        }),
    })
}

/// Points earned by one answer.
pub fn score_question(question: &Question, answer: &AnswerValue, method: ScoringMethod) -> QuestionScore {
    let max = question.max_score.unwrap_or(0.0);

    match question.kind {
        QuestionKind::ShortText | QuestionKind::LongText | QuestionKind::Date => {
            QuestionScore::UNSCORED
        }
        QuestionKind::Scale | QuestionKind::Nps => {
            let scale_max = question.scale_max();
            let earned = match answer.as_number() {
                // Out-of-range answers earn between nothing and full marks.
                Some(value) if scale_max > 0.0 => (value / scale_max * max).min(max).max(0.0),
                _ => 0.0,
            };
            QuestionScore { earned, max }
        }
        QuestionKind::YesNo => {
            let yes = answer.is_affirmative();
            let earned = match method {
                ScoringMethod::ByOption => option_score(question, answer)
                    .or_else(|| option_score_for(question, if yes { "yes" } else { "no" }))
                    .unwrap_or(0.0),
                ScoringMethod::ByQuestion if yes => max,
                ScoringMethod::ByQuestion => 0.0,
            };
            QuestionScore { earned, max }
        }
        QuestionKind::SingleChoice | QuestionKind::Choice => {
            let earned = match method {
                ScoringMethod::ByOption => option_score(question, answer).unwrap_or(0.0),
                ScoringMethod::ByQuestion => max,
            };
            QuestionScore { earned, max }
        }
        QuestionKind::MultipleChoice => {
            let selected = answer.choices();
            let earned = match method {
                ScoringMethod::ByOption => selected
                    .iter()
                    .filter_map(|value| option_score_for(question, value))
                    .sum(),
                ScoringMethod::ByQuestion if !question.options.is_empty() => {
                    selected.len() as f64 / question.options.len() as f64 * max
                }
                ScoringMethod::ByQuestion => 0.0,
            };
            QuestionScore {
                earned: earned.min(max),
                max,
            }
        }
    }
}

fn option_score(question: &Question, answer: &AnswerValue) -> Option<f64> {
    answer
        .as_text()
        .and_then(|value| option_score_for(question, &value))
}

fn option_score_for(question: &Question, value: &str) -> Option<f64> {
    question.option(value).and_then(|o| o.score)
}

fn percentage(earned: f64, config: &ScoringConfig) -> f64 {
    if config.total_score > 0.0 {
        round1(earned / config.total_score * 100.0)
    } else {
        0.0
    }
}

/// Information-collection questionnaire: answers only, no total, no grade.
fn unscored(questionnaire: &Questionnaire, answers: &Answers) -> ScoredResult {
    let detailed_answers = questionnaire
        .questions
        .iter()
        .filter_map(|q| answers.lookup(&q.id).map(|a| detailed(q, a, None)))
        .collect();

    ScoredResult {
        total_score: None,
        grade: None,
        details: ResultDetails::Custom(CustomResult {
            max_score: None,
            score_percentage: None,
            detailed_answers,
        }),
    }
}

fn detailed(question: &Question, answer: &AnswerValue, scoring: Option<AnswerScoring>) -> DetailedAnswer {
    DetailedAnswer {
        question_id: question.id.clone(),
        question_text: question.text.clone(),
        question_kind: question.kind,
        answer: Some(answer.clone()),
        display: display_answer(question, answer),
        scoring,
    }
}

/// Human-readable answer text, with option labels substituted for values.
pub fn display_answer(question: &Question, answer: &AnswerValue) -> String {
    match (question.kind, answer) {
        (QuestionKind::YesNo, _) => {
            let text = if answer.is_affirmative() { "是" } else { "否" };
            text.to_string()
        }
        (_, AnswerValue::Choices(values)) => values
            .iter()
            .map(|v| question.display_value(v))
            .collect::<Vec<_>>()
            .join("、"),
        (QuestionKind::Scale | QuestionKind::Nps, _) => answer
            .as_text()
            .map(|v| format!("{v} / {}", question.scale_max()))
            .unwrap_or_default(),
        _ => answer
            .as_text()
            .map(|v| question.display_value(&v))
            .unwrap_or_default(),
    }
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}
