use talent_core::error::CoreError;
use talent_core::models::answer::{AnswerValue, Answers};
use talent_core::models::grade::{GradeBand, GradeScale};
use talent_core::models::question::{Question, QuestionKind, QuestionOption, ScaleRange};
use talent_core::models::questionnaire::{
    DimensionDef, Questionnaire, QuestionnaireStatus, QuestionnaireType, ScoringConfig,
    ScoringMethod,
};
use talent_core::models::result::{EpqLevel, ResultDetails};
use talent_instruments::catalog::{questionnaire_for_type, questions_for_type};
use talent_instruments::error::InstrumentError;
use talent_instruments::instruments::epq::Epq;
use talent_instruments::scoring::{TScoreScale, score_by_label, score_submission};

fn text(s: &str) -> AnswerValue {
    AnswerValue::Text(s.to_string())
}

fn builtin(kind: QuestionnaireType) -> Questionnaire {
    questionnaire_for_type(kind, 1, jiff::Timestamp::now()).unwrap()
}

fn answer_all(kind: &str, pick: impl Fn(&Question) -> AnswerValue) -> Answers {
    questions_for_type(kind)
        .iter()
        .map(|q| (q.id.clone(), pick(q)))
        .collect()
}

#[test]
fn mbti_type_from_majorities() {
    let answers = answer_all("MBTI", |q| {
        if q.dimension.as_deref() == Some("EI") {
            text("A")
        } else {
            text("b")
        }
    });
    let result = score_submission(&builtin(QuestionnaireType::Mbti), &answers).unwrap();

    let ResultDetails::Mbti(mbti) = &result.details else {
        panic!("expected MBTI details, got {:?}", result.details);
    };
    assert_eq!(mbti.mbti_type, "ENFP");
    assert!(mbti.description.starts_with("竞选者"));
    assert!(mbti.dimensions.iter().all(|d| d.value == 100));
    assert_eq!(result.total_score, Some(100.0));
    assert_eq!(result.grade.as_deref(), Some("A"));
}

#[test]
fn mbti_unanswered_dimensions_default_to_fifty() {
    let result = score_submission(&builtin(QuestionnaireType::Mbti), &Answers::new()).unwrap();
    let ResultDetails::Mbti(mbti) = &result.details else {
        panic!("expected MBTI details");
    };
    // An even split does not favour the A pole.
    assert_eq!(mbti.mbti_type, "INFP");
    assert!(mbti.dimensions.iter().all(|d| d.value == 50));
    assert_eq!(result.total_score, Some(50.0));
    assert_eq!(result.grade.as_deref(), Some("D"));
}

#[test]
fn mbti_accepts_bare_numeric_keys() {
    let answers: Answers = (1..=23).map(|n| (n.to_string(), text("A"))).collect();
    let result = score_by_label("mbti", &answers).unwrap();
    let ResultDetails::Mbti(mbti) = &result.details else {
        panic!("expected MBTI details");
    };
    assert_eq!(&mbti.mbti_type[..1], "E");
}

#[test]
fn disc_dominant_style() {
    let answers = answer_all("DISC", |q| {
        let value = if q.dimension.as_deref() == Some("D") { 5.0 } else { 1.0 };
        AnswerValue::Number(value)
    });
    let result = score_submission(&builtin(QuestionnaireType::Disc), &answers).unwrap();

    let ResultDetails::Disc(disc) = &result.details else {
        panic!("expected DISC details");
    };
    assert_eq!(disc.dominant, "D");
    assert_eq!(disc.disc_type, "D型");
    assert_eq!(disc.dimensions[0].value, 100);
    assert_eq!(disc.dimensions[1].value, 20);
    assert_eq!(disc.dimensions[1].raw_score, 7.0);
    assert_eq!(result.total_score, Some(100.0));
}

#[test]
fn disc_ties_resolve_in_style_order() {
    let answers = answer_all("DISC", |_| AnswerValue::Number(3.0));
    let result = score_by_label("DISC", &answers).unwrap();
    let ResultDetails::Disc(disc) = &result.details else {
        panic!("expected DISC details");
    };
    assert_eq!(disc.dominant, "D");
    assert_eq!(result.total_score, Some(60.0));
    assert_eq!(result.grade.as_deref(), Some("C"));
}

#[test]
fn disc_letter_answers_count_toward_mapped_style() {
    let answers: Answers = (1..=28).map(|n| (format!("disc_{n}"), text("c"))).collect();
    let result = score_by_label("DISC", &answers).unwrap();
    let ResultDetails::Disc(disc) = &result.details else {
        panic!("expected DISC details");
    };
    assert_eq!(disc.dominant, "S");
    assert_eq!(disc.dimensions[2].raw_score, 28.0);
    assert_eq!(disc.dimensions[2].value, 80);
}

#[test]
fn epq_all_yes() {
    let answers = answer_all("EPQ", |_| text("是"));
    let result = score_submission(&builtin(QuestionnaireType::Epq), &answers).unwrap();

    let ResultDetails::Epq(epq) = &result.details else {
        panic!("expected EPQ details");
    };
    let t: Vec<i32> = epq.dimensions.iter().map(|d| d.t_score).collect();
    assert_eq!(t, vec![60, 70, 70, 70]);
    assert_eq!(epq.dimensions[0].raw_score, 16);
    assert_eq!(epq.dimensions[0].level, EpqLevel::High);
    assert_eq!(epq.personality_trait, "外向不稳定型");
    assert_eq!(result.total_score, Some(67.0));
    assert_eq!(result.grade.as_deref(), Some("C"));
}

#[test]
fn epq_all_no() {
    let answers = answer_all("EPQ", |_| AnswerValue::Bool(false));
    let result = score_by_label("EPQ", &answers).unwrap();
    let ResultDetails::Epq(epq) = &result.details else {
        panic!("expected EPQ details");
    };
    let t: Vec<i32> = epq.dimensions.iter().map(|d| d.t_score).collect();
    assert_eq!(t, vec![39, 30, 30, 30]);
    assert_eq!(epq.personality_trait, "内向稳定型");
    assert_eq!(result.total_score, Some(32.0));
}

#[test]
fn epq_unanswered_is_average() {
    let result = score_by_label("EPQ", &Answers::new()).unwrap();
    let ResultDetails::Epq(epq) = &result.details else {
        panic!("expected EPQ details");
    };
    assert!(epq.dimensions.iter().all(|d| d.t_score == 50 && d.total_questions == 0));
    assert!(epq.dimensions.iter().all(|d| d.level == EpqLevel::Medium));
    assert_eq!(epq.personality_trait, "内向不稳定型");
}

#[test]
fn epq_rescale_is_configurable() {
    let answers = answer_all("EPQ", |_| text("yes"));
    let steep = TScoreScale {
        scale: 20.0,
        ..TScoreScale::default()
    };
    let result = Epq.score_with(&questions_for_type("EPQ"), &answers, &steep);
    let ResultDetails::Epq(epq) = &result.details else {
        panic!("expected EPQ details");
    };
    assert_eq!(epq.dimensions[1].t_score, 80);
}

#[test]
fn result_dimensions_are_declared() {
    for kind in [QuestionnaireType::Mbti, QuestionnaireType::Disc, QuestionnaireType::Epq] {
        let questionnaire = builtin(kind);
        let result = score_submission(&questionnaire, &Answers::new()).unwrap();
        for code in result.details.dimension_codes() {
            assert!(questionnaire.declares_dimension(code), "{kind}: {code}");
        }
    }
}

#[test]
fn undeclared_result_dimension_is_rejected() {
    let mut questionnaire = builtin(QuestionnaireType::Mbti);
    questionnaire
        .dimensions
        .retain(|d| d.code == "EI" || d.code == "SN");
    let answers: Answers = [("mbti_1", text("A"))].into_iter().collect();

    let err = score_submission(&questionnaire, &answers).unwrap_err();
    assert!(
        matches!(
            &err,
            InstrumentError::Core(CoreError::UndeclaredDimension { dimension, .. }) if dimension == "TF"
        ),
        "got {err:?}"
    );
}

#[test]
fn questionnaire_without_declared_dimensions_uses_instrument_dimensions() {
    let mut questionnaire = builtin(QuestionnaireType::Disc);
    questionnaire.dimensions.clear();
    let result = score_submission(&questionnaire, &Answers::new()).unwrap();
    assert_eq!(result.details.dimension_codes(), vec!["D", "I", "S", "C"]);
}

fn custom_questionnaire(scoring: Option<ScoringConfig>) -> Questionnaire {
    let now = jiff::Timestamp::now();
    let mut rating = Question::new("q1", 1, QuestionKind::Scale, "Rate the onboarding").with_scale(
        ScaleRange {
            min: 1,
            max: 5,
            ..ScaleRange::default()
        },
    );
    rating.max_score = Some(50.0);

    let mut pick = Question::new("q2", 2, QuestionKind::SingleChoice, "Preferred team").with_options(
        vec![
            QuestionOption {
                value: "A".into(),
                label: "Platform".into(),
                score: Some(30.0),
            },
            QuestionOption {
                value: "B".into(),
                label: "Product".into(),
                score: Some(10.0),
            },
        ],
    );
    pick.max_score = Some(30.0);

    let comments = Question::new("q3", 3, QuestionKind::LongText, "Anything else?");

    Questionnaire {
        id: 42,
        code: "ONBOARD".into(),
        name: "Onboarding survey".into(),
        kind: QuestionnaireType::Custom,
        description: String::new(),
        dimensions: vec![DimensionDef::new("total", "总分", "")],
        questions: vec![rating, pick, comments],
        scoring,
        status: QuestionnaireStatus::Active,
        estimated_minutes: 3,
        created_at: now,
        updated_at: now,
    }
}

fn custom_answers() -> Answers {
    [
        ("q1", AnswerValue::Number(4.0)),
        ("q2", text("B")),
        ("q3", text("Great mentors")),
    ]
    .into_iter()
    .collect()
}

#[test]
fn custom_scored_by_option() {
    let config = ScoringConfig {
        enabled: true,
        method: ScoringMethod::ByOption,
        total_score: 80.0,
        grades: GradeScale(vec![
            GradeBand {
                name: "A".into(),
                label: "优秀".into(),
                min_score: 60.0,
                max_score: 80.0,
            },
            GradeBand {
                name: "B".into(),
                label: "良好".into(),
                min_score: 40.0,
                max_score: 59.9,
            },
        ]),
    };
    let result = score_submission(&custom_questionnaire(Some(config)), &custom_answers()).unwrap();

    // 4/5 of 50 plus option B's 10.
    assert_eq!(result.total_score, Some(50.0));
    assert_eq!(result.grade.as_deref(), Some("B"));

    let ResultDetails::Custom(custom) = &result.details else {
        panic!("expected custom details");
    };
    assert_eq!(custom.max_score, Some(80.0));
    assert_eq!(custom.score_percentage, Some(62.5));
    assert_eq!(custom.detailed_answers.len(), 3);
    assert_eq!(custom.detailed_answers[1].display, "Product");
    assert!(custom.detailed_answers[2].scoring.is_none());
}

#[test]
fn custom_without_scoring_has_no_total_or_grade() {
    let result = score_submission(&custom_questionnaire(None), &custom_answers()).unwrap();
    assert_eq!(result.total_score, None);
    assert_eq!(result.grade, None);

    let ResultDetails::Custom(custom) = &result.details else {
        panic!("expected custom details");
    };
    assert_eq!(custom.detailed_answers.len(), 3);
    assert!(custom.detailed_answers.iter().all(|a| a.scoring.is_none()));
}

#[test]
fn custom_with_invalid_config_is_rejected() {
    let config = ScoringConfig {
        enabled: true,
        total_score: 0.0,
        ..ScoringConfig::default()
    };
    assert!(score_submission(&custom_questionnaire(Some(config)), &custom_answers()).is_err());
}

#[test]
fn unknown_label_is_not_an_instrument() {
    assert!(score_by_label("BIG5", &Answers::new()).is_err());
    assert!(score_by_label("CUSTOM", &Answers::new()).is_err());
}
