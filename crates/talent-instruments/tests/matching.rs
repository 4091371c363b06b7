use talent_core::models::answer::{AnswerValue, Answers};
use talent_core::models::job_profile::{DimensionWeight, JobProfile, MatchRequest, ProfileStatus};
use talent_core::models::questionnaire::QuestionnaireType;
use talent_core::models::submission::{Candidate, Submission};
use talent_instruments::catalog::{questionnaire_for_type, questions_for_type};
use talent_instruments::matching::{match_submission, rank_matches};
use talent_instruments::scoring::score_submission;

fn profile(weights: &[(&str, f64)]) -> JobProfile {
    let now = jiff::Timestamp::now();
    JobProfile {
        id: 3,
        name: "Account manager".into(),
        department: Some("Sales".into()),
        description: None,
        tags: vec!["client-facing".into()],
        dimensions: weights
            .iter()
            .map(|(name, weight)| DimensionWeight {
                name: name.to_string(),
                weight: *weight,
                description: None,
            })
            .collect(),
        status: ProfileStatus::Active,
        created_at: now,
        updated_at: now,
    }
}

/// Completed DISC submission answering `high` on one style and 1 elsewhere.
fn disc_submission(id: u64, style: &str, high: f64) -> Submission {
    let now = jiff::Timestamp::now();
    let questionnaire = questionnaire_for_type(QuestionnaireType::Disc, 2, now).unwrap();
    let candidate = Candidate {
        name: format!("Candidate {id}"),
        phone: format!("1380000000{id}"),
        ..Candidate::default()
    };
    let mut submission = Submission::start(id, format!("SUB_{id}"), 1, &questionnaire, candidate, now);

    let answers: Answers = questions_for_type("DISC")
        .iter()
        .map(|q| {
            let value = if q.dimension.as_deref() == Some(style) { high } else { 1.0 };
            (q.id.clone(), AnswerValue::Number(value))
        })
        .collect();
    for (question_id, value) in answers.iter() {
        submission.record_answer(question_id.clone(), value.clone()).unwrap();
    }
    let result = score_submission(&questionnaire, &submission.answers).unwrap();
    submission.complete(result, now).unwrap();
    submission
}

#[test]
fn weighted_sum_of_dimension_scores() {
    // I = 100, D = S = C = 20
    let submission = disc_submission(1, "I", 5.0);
    let m = match_submission(&profile(&[("I", 60.0), ("S", 40.0)]), &submission).unwrap();

    assert_eq!(m.profile_id, 3);
    assert_eq!(m.submission_id, 1);
    assert_eq!(m.dimension_scores["I"], 100.0);
    assert_eq!(m.dimension_scores["S"], 20.0);
    assert_eq!(m.match_score, 68.0);
    assert!(m.ai_analysis.is_none());
}

#[test]
fn missing_dimensions_score_zero() {
    let submission = disc_submission(1, "D", 5.0);
    let m = match_submission(&profile(&[("d", 50.0), ("E", 50.0)]), &submission).unwrap();
    assert_eq!(m.dimension_scores["d"], 100.0);
    assert_eq!(m.dimension_scores["E"], 0.0);
    assert_eq!(m.match_score, 50.0);
}

#[test]
fn unscored_submissions_do_not_match() {
    let now = jiff::Timestamp::now();
    let questionnaire = questionnaire_for_type(QuestionnaireType::Disc, 2, now).unwrap();
    let pending = Submission::start(9, "SUB_9", 1, &questionnaire, Candidate::default(), now);
    assert!(match_submission(&profile(&[("D", 100.0)]), &pending).is_none());
}

#[test]
fn ranking_filters_sorts_and_limits() {
    let submissions = vec![
        disc_submission(1, "C", 5.0),
        disc_submission(2, "C", 3.0),
        disc_submission(3, "C", 4.0),
        disc_submission(4, "D", 5.0),
    ];
    let profile = profile(&[("C", 100.0)]);

    let all = rank_matches(&profile, &submissions, &MatchRequest::default());
    assert_eq!(all.total, 4);
    let order: Vec<u64> = all.matches.iter().map(|m| m.submission_id).collect();
    assert_eq!(order, vec![1, 3, 2, 4]);

    let request = MatchRequest {
        min_score: Some(60.0),
        limit: Some(2),
    };
    let top = rank_matches(&profile, &submissions, &request);
    assert_eq!(top.total, 2);
    assert_eq!(top.matches[0].match_score, 100.0);
    assert_eq!(top.matches[1].match_score, 80.0);
}
