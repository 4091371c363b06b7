use talent_core::models::question::{Polarity, QuestionKind};
use talent_core::models::questionnaire::{QuestionnaireCategory, QuestionnaireType};
use talent_instruments::catalog::{
    builtin_questionnaires, filter_by_category, questionnaire_for_type, questions_for_type,
};
use talent_instruments::{all_instruments, get_instrument};

fn count(kind: QuestionnaireType, dimension: &str) -> usize {
    get_instrument(kind)
        .unwrap()
        .questions()
        .iter()
        .filter(|q| q.dimension.as_deref() == Some(dimension))
        .count()
}

#[test]
fn builtin_bank_sizes() {
    assert_eq!(questions_for_type("EPQ").len(), 88);
    assert_eq!(questions_for_type("DISC").len(), 28);
    assert_eq!(questions_for_type("MBTI").len(), 93);
}

#[test]
fn labels_are_case_insensitive() {
    assert_eq!(questions_for_type("mbti").len(), 93);
    assert_eq!(questions_for_type(" disc ").len(), 28);
}

#[test]
fn unknown_and_custom_types_get_placeholders() {
    for label in ["CUSTOM", "BIG5", ""] {
        let questions = questions_for_type(label);
        assert_eq!(questions.len(), 2, "{label:?}");
        assert!(questions.iter().all(|q| q.kind == QuestionKind::SingleChoice));
        assert_eq!(questions[0].options.len(), 3);
    }
}

#[test]
fn epq_dimension_split() {
    assert_eq!(count(QuestionnaireType::Epq, "E"), 21);
    assert_eq!(count(QuestionnaireType::Epq, "N"), 23);
    assert_eq!(count(QuestionnaireType::Epq, "P"), 20);
    assert_eq!(count(QuestionnaireType::Epq, "L"), 24);

    let negatives = questions_for_type("EPQ")
        .iter()
        .filter(|q| q.polarity == Some(Polarity::Negative))
        .count();
    assert_eq!(negatives, 5);
}

#[test]
fn disc_has_seven_items_per_style() {
    for style in ["D", "I", "S", "C"] {
        assert_eq!(count(QuestionnaireType::Disc, style), 7, "{style}");
    }
}

#[test]
fn mbti_items_are_two_option_choices() {
    let questions = questions_for_type("MBTI");
    assert!(questions.iter().all(|q| q.kind == QuestionKind::Choice));
    assert!(questions.iter().all(|q| q.options.len() == 2));
    assert_eq!(questions[0].id, "mbti_1");
    assert_eq!(questions[92].order, 93);
}

#[test]
fn questions_are_ordered() {
    for instrument in all_instruments() {
        let orders: Vec<u32> = instrument.questions().iter().map(|q| q.order).collect();
        let mut sorted = orders.clone();
        sorted.sort_unstable();
        assert_eq!(orders, sorted, "{}", instrument.name());
    }
}

#[test]
fn builtin_questionnaires_declare_their_dimensions() {
    let now = jiff::Timestamp::now();
    let questionnaires = builtin_questionnaires(now);
    assert_eq!(questionnaires.len(), 3);

    for questionnaire in &questionnaires {
        assert!(questionnaire.is_scored());
        for question in &questionnaire.questions {
            let dimension = question.dimension.as_deref().unwrap();
            assert!(questionnaire.declares_dimension(dimension));
        }
    }

    assert!(questionnaire_for_type(QuestionnaireType::Custom, 9, now).is_none());
    let professional = filter_by_category(&questionnaires, Some(QuestionnaireCategory::Professional));
    assert_eq!(professional.len(), 3);
    assert!(filter_by_category(&questionnaires, Some(QuestionnaireCategory::Survey)).is_empty());
    assert_eq!(filter_by_category(&questionnaires, None).len(), 3);
}
