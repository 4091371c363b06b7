use talent_core::models::answer::{AnswerValue, Answers};
use talent_core::models::question::{Question, QuestionKind, QuestionOption, ScaleRange};
use talent_core::models::questionnaire::{
    DimensionDef, Questionnaire, QuestionnaireStatus, QuestionnaireType,
};
use talent_core::models::result::{CustomResult, ResultDetails, ScoredResult};
use talent_core::models::submission::{Candidate, Submission};
use talent_instruments::statistics::{question_stats, submission_statistics};

fn survey() -> Questionnaire {
    let now = jiff::Timestamp::now();
    Questionnaire {
        id: 11,
        code: "EXIT".into(),
        name: "Exit interview".into(),
        kind: QuestionnaireType::Custom,
        description: String::new(),
        dimensions: vec![DimensionDef::new("total", "总分", "")],
        questions: vec![
            Question::new("q1", 1, QuestionKind::SingleChoice, "Would you return?").with_options(
                vec![QuestionOption::new("A", "Yes"), QuestionOption::new("B", "No")],
            ),
            Question::new("q2", 2, QuestionKind::Scale, "Rate your manager"),
            Question::new("q3", 3, QuestionKind::LongText, "Anything else?"),
        ],
        scoring: None,
        status: QuestionnaireStatus::Active,
        estimated_minutes: 5,
        created_at: now,
        updated_at: now,
    }
}

fn submission(id: u64, answers: Answers, score: Option<(f64, &str)>, completed: bool) -> Submission {
    let at: jiff::Timestamp = "2026-03-02T08:30:00Z".parse().unwrap();
    let candidate = Candidate {
        name: format!("Candidate {id}"),
        phone: format!("139{id:08}"),
        ..Candidate::default()
    };
    let mut submission = Submission::start(id, format!("SUB_{id}"), 5, &survey(), candidate, at);
    submission.answers = answers;
    if completed {
        let result = ScoredResult {
            total_score: score.map(|(s, _)| s),
            grade: score.map(|(_, g)| g.to_string()),
            details: ResultDetails::Custom(CustomResult {
                max_score: None,
                score_percentage: None,
                detailed_answers: Vec::new(),
            }),
        };
        let done = at.checked_add(jiff::Span::new().hours(i64::try_from(id).unwrap() * 24)).unwrap();
        submission.complete(result, done).unwrap();
    }
    submission
}

fn answers(pairs: &[(&str, AnswerValue)]) -> Answers {
    pairs.iter().cloned().collect()
}

#[test]
fn empty_input_is_all_zero() {
    let stats = submission_statistics(&[]);
    assert_eq!(stats.total_submissions, 0);
    assert_eq!(stats.average_score, 0.0);
    assert_eq!(stats.grade_distribution.len(), 4);
    assert!(stats.grade_distribution.values().all(|c| *c == 0));
    assert!(stats.submissions.is_empty());
}

#[test]
fn aggregates_completed_submissions_only() {
    let submissions = vec![
        submission(1, Answers::new(), Some((92.0, "A")), true),
        submission(2, Answers::new(), Some((71.5, "C")), true),
        submission(3, Answers::new(), Some((40.0, "N/A")), true),
        submission(4, Answers::new(), None, false),
    ];
    let stats = submission_statistics(&submissions);

    assert_eq!(stats.total_submissions, 3);
    assert_eq!(stats.average_score, 67.83);
    assert_eq!(stats.pass_rate, 66.67);
    assert_eq!(stats.grade_distribution["A"], 1);
    assert_eq!(stats.grade_distribution["B"], 0);
    assert_eq!(stats.grade_distribution["C"], 1);
    // Ungraded results land in the lowest band.
    assert_eq!(stats.grade_distribution["D"], 1);
    assert_eq!(stats.grade_percentages["A"], 33.3);
    assert_eq!(stats.submissions.len(), 3);
    assert_eq!(stats.submissions[0].candidate_name, "Candidate 1");
}

#[test]
fn per_question_distribution() {
    let submissions = vec![
        submission(
            1,
            answers(&[
                ("q1", AnswerValue::Text("A".into())),
                ("q2", AnswerValue::Number(4.0)),
                ("q3", AnswerValue::Text("Great team".into())),
            ]),
            None,
            true,
        ),
        submission(
            2,
            answers(&[
                ("q1", AnswerValue::Text("Yes".into())),
                ("q2", AnswerValue::Number(5.0)),
            ]),
            None,
            true,
        ),
        submission(3, answers(&[("q1", AnswerValue::Text("B".into()))]), None, true),
        submission(4, answers(&[("q1", AnswerValue::Text("B".into()))]), None, false),
    ];
    let stats = question_stats(&survey(), &submissions);

    assert_eq!(stats.questionnaire_id, 11);
    assert_eq!(stats.total_submissions, 3);
    assert_eq!(stats.average_score, None);

    let choice = &stats.questions[0];
    assert_eq!(choice.kind, "single_choice");
    assert_eq!(choice.total_answers, 3);
    // Answers given as the label count toward the option.
    assert_eq!(choice.options[0].count, 2);
    assert_eq!(choice.options[0].percentage, 66.7);
    assert_eq!(choice.options[1].count, 1);

    let scale = &stats.questions[1];
    assert_eq!(scale.index, 2);
    assert_eq!(scale.options.len(), 5);
    assert_eq!(scale.options[3].text, "4分");
    assert_eq!(scale.options[3].count, 1);

    let text = &stats.questions[2];
    assert_eq!(text.options.len(), 1);
    assert_eq!(text.options[0].text, "Great team");

    assert_eq!(stats.daily_trend.len(), 3);
    assert_eq!(stats.daily_trend[0].date, jiff::civil::date(2026, 3, 3));
    assert_eq!(stats.daily_trend[0].count, 1);
}

#[test]
fn oversized_scale_lists_only_answered_points() {
    let mut questionnaire = survey();
    questionnaire.questions[1].scale = Some(ScaleRange {
        min: i32::MIN,
        max: i32::MAX,
        ..ScaleRange::default()
    });
    let submissions = vec![
        submission(1, answers(&[("q2", AnswerValue::Number(10.0))]), None, true),
        submission(2, answers(&[("q2", AnswerValue::Number(7.0))]), None, true),
        submission(3, answers(&[("q2", AnswerValue::Number(10.0))]), None, true),
    ];
    let stats = question_stats(&questionnaire, &submissions);

    let scale = &stats.questions[1];
    let rows: Vec<(&str, u32)> = scale
        .options
        .iter()
        .map(|o| (o.text.as_str(), o.count))
        .collect();
    assert_eq!(rows, vec![("7分", 1), ("10分", 2)]);
}

#[test]
fn inverted_scale_lists_only_answered_points() {
    let mut questionnaire = survey();
    questionnaire.questions[1].scale = Some(ScaleRange {
        min: 5,
        max: 1,
        ..ScaleRange::default()
    });
    let stats = question_stats(
        &questionnaire,
        &[submission(1, answers(&[("q2", AnswerValue::Number(3.0))]), None, true)],
    );
    assert_eq!(stats.questions[1].options.len(), 1);
    assert_eq!(stats.questions[1].options[0].text, "3分");
}
