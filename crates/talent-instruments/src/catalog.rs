//! Questionnaire catalog: built-in question banks by type label.

use talent_core::models::question::{Question, QuestionKind, QuestionOption};
use talent_core::models::questionnaire::{
    Questionnaire, QuestionnaireCategory, QuestionnaireType,
};

use crate::{all_instruments, get_instrument};

/// Ordered questions for a questionnaire type label.
///
/// Labels are matched case-insensitively. Custom and unrecognised labels get
/// a two-question sample instead of an error, so a candidate page always has
/// something to render.
pub fn questions_for_type(label: &str) -> Vec<Question> {
    match get_instrument(QuestionnaireType::from_label(label)) {
        Some(instrument) => instrument.questions().to_vec(),
        None => {
            tracing::debug!(label, "no built-in question bank, using sample questions");
            placeholder_questions()
        }
    }
}

pub fn placeholder_questions() -> Vec<Question> {
    (1..=2)
        .map(|n| {
            Question::new(n.to_string(), n, QuestionKind::SingleChoice, format!("示例题目{n}"))
                .with_options(
                    ["A", "B", "C"]
                        .iter()
                        .map(|v| QuestionOption::new(*v, format!("选项{v}")))
                        .collect(),
                )
        })
        .collect()
}

/// The published questionnaire for a built-in type. Custom has none.
pub fn questionnaire_for_type(
    kind: QuestionnaireType,
    id: u64,
    now: jiff::Timestamp,
) -> Option<Questionnaire> {
    get_instrument(kind).map(|i| i.questionnaire(id, now))
}

/// Every built-in questionnaire, numbered from 1.
pub fn builtin_questionnaires(now: jiff::Timestamp) -> Vec<Questionnaire> {
    all_instruments()
        .iter()
        .zip(1u64..)
        .map(|(instrument, id)| instrument.questionnaire(id, now))
        .collect()
}

pub fn filter_by_category(
    questionnaires: &[Questionnaire],
    category: Option<QuestionnaireCategory>,
) -> Vec<&Questionnaire> {
    questionnaires
        .iter()
        .filter(|q| category.is_none_or(|c| c.matches(q)))
        .collect()
}
