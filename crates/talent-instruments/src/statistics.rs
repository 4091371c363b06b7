//! Aggregate statistics over completed submissions.

use std::collections::BTreeMap;

use talent_core::models::answer::AnswerValue;
use talent_core::models::grade::NO_GRADE;
use talent_core::models::question::{Question, QuestionKind};
use talent_core::models::questionnaire::Questionnaire;
use talent_core::models::statistics::{
    DailyTrend, PASS_SCORE, QuestionOptionStat, QuestionStat, QuestionnaireQuestionStats,
    REPORTED_GRADES, StatisticsRow, SubmissionStatistics,
};
use talent_core::models::submission::{Submission, SubmissionStatus};

/// Rows returned alongside the aggregates.
const MAX_ROWS: usize = 100;

/// Free-text answers sampled per question.
const TEXT_SAMPLES: usize = 10;

/// Widest scale listed point by point. Wider or inverted ranges list only
/// the points actually answered.
const MAX_SCALE_POINTS: i64 = 101;

/// Summary over the completed submissions in `submissions`.
///
/// Average and pass rate consider only scored submissions. A completed
/// submission without a grade counts as the lowest grade.
pub fn submission_statistics(submissions: &[Submission]) -> SubmissionStatistics {
    let completed: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.status == SubmissionStatus::Completed)
        .collect();
    if completed.is_empty() {
        return SubmissionStatistics::empty();
    }

    let scores: Vec<f64> = completed.iter().filter_map(|s| s.total_score()).collect();
    let (average_score, pass_rate) = if scores.is_empty() {
        (0.0, 0.0)
    } else {
        let n = scores.len() as f64;
        let passed = scores.iter().filter(|s| **s >= PASS_SCORE).count() as f64;
        (
            round_to(scores.iter().sum::<f64>() / n, 2),
            round_to(passed / n * 100.0, 2),
        )
    };

    let grade_distribution = grade_distribution(&completed);
    let total = completed.len();
    let grade_percentages = grade_distribution
        .iter()
        .map(|(grade, count)| {
            (
                grade.clone(),
                round_to(f64::from(*count) / total as f64 * 100.0, 1),
            )
        })
        .collect();

    let rows = completed
        .iter()
        .take(MAX_ROWS)
        .map(|s| StatisticsRow {
            id: s.id,
            candidate_name: s.candidate.name.clone(),
            candidate_phone: s.candidate.phone.clone(),
            total_score: s.total_score(),
            grade: s.grade().map(str::to_string),
            submitted_at: s.submitted_at,
        })
        .collect();

    SubmissionStatistics {
        total_submissions: u32::try_from(total).unwrap_or(u32::MAX),
        average_score,
        pass_rate,
        grade_distribution,
        grade_percentages,
        submissions: rows,
    }
}

fn grade_distribution(submissions: &[&Submission]) -> BTreeMap<String, u32> {
    let mut distribution: BTreeMap<String, u32> =
        REPORTED_GRADES.iter().map(|g| (g.to_string(), 0)).collect();
    for submission in submissions {
        let grade = submission
            .grade()
            .filter(|g| *g != NO_GRADE)
            .unwrap_or("D")
            .to_uppercase();
        if let Some(count) = distribution.get_mut(&grade) {
            *count += 1;
        }
    }
    distribution
}

/// Per-question answer distribution for one questionnaire.
pub fn question_stats(
    questionnaire: &Questionnaire,
    submissions: &[Submission],
) -> QuestionnaireQuestionStats {
    let completed: Vec<&Submission> = submissions
        .iter()
        .filter(|s| s.questionnaire_id == questionnaire.id)
        .filter(|s| s.status == SubmissionStatus::Completed)
        .collect();
    let total = completed.len();

    let questions = questionnaire
        .questions
        .iter()
        .zip(1u32..)
        .map(|(question, index)| {
            let answers: Vec<&AnswerValue> = completed
                .iter()
                .filter_map(|s| s.answers.lookup(&question.id))
                .collect();

            let options = if question.kind.is_free_form() {
                answers
                    .iter()
                    .filter_map(|a| a.as_text())
                    .take(TEXT_SAMPLES)
                    .zip(0u32..)
                    .map(|(text, index)| QuestionOptionStat {
                        index,
                        text,
                        count: 1,
                        percentage: 0.0,
                    })
                    .collect()
            } else {
                let mut counts: BTreeMap<String, u32> = BTreeMap::new();
                for answer in &answers {
                    for value in answer.choices() {
                        *counts.entry(value).or_default() += 1;
                    }
                }
                choice_rows(question, &counts, total)
            };

            QuestionStat {
                id: question.id.clone(),
                index,
                text: question.text.clone(),
                kind: serde_json::to_value(question.kind)
                    .ok()
                    .and_then(|v| v.as_str().map(str::to_string))
                    .unwrap_or_default(),
                total_answers: u32::try_from(answers.len()).unwrap_or(u32::MAX),
                options,
            }
        })
        .collect();

    let mut trend: BTreeMap<jiff::civil::Date, u32> = BTreeMap::new();
    for submission in &completed {
        if let Some(at) = submission.submitted_at {
            let date = at.to_zoned(jiff::tz::TimeZone::UTC).date();
            *trend.entry(date).or_default() += 1;
        }
    }

    let scores: Vec<f64> = completed.iter().filter_map(|s| s.total_score()).collect();
    let average_score = (!scores.is_empty())
        .then(|| round_to(scores.iter().sum::<f64>() / scores.len() as f64, 1));

    QuestionnaireQuestionStats {
        questionnaire_id: questionnaire.id,
        questionnaire_name: questionnaire.name.clone(),
        questionnaire_type: questionnaire.kind,
        total_submissions: u32::try_from(total).unwrap_or(u32::MAX),
        average_score,
        questions,
        daily_trend: trend
            .into_iter()
            .map(|(date, count)| DailyTrend { date, count })
            .collect(),
        grade_distribution: grade_distribution(&completed),
    }
}

fn choice_rows(
    question: &Question,
    counts: &BTreeMap<String, u32>,
    total: usize,
) -> Vec<QuestionOptionStat> {
    let pct = |count: u32| {
        if total == 0 {
            0.0
        } else {
            round_to(f64::from(count) / total as f64 * 100.0, 1)
        }
    };

    if matches!(question.kind, QuestionKind::Scale | QuestionKind::Nps) {
        let (min, max) = match &question.scale {
            Some(range) => (range.min, range.max),
            None if question.kind == QuestionKind::Nps => (0, 10),
            None => (1, 5),
        };
        let span = i64::from(max) - i64::from(min) + 1;
        let points: Vec<String> = if (1..=MAX_SCALE_POINTS).contains(&span) {
            (min..=max).map(|p| p.to_string()).collect()
        } else {
            tracing::debug!(
                id = %question.id,
                min,
                max,
                "scale range unusable, listing answered points"
            );
            let mut answered: Vec<String> = counts.keys().cloned().collect();
            answered.sort_by(|a, b| match (a.parse::<f64>(), b.parse::<f64>()) {
                (Ok(a), Ok(b)) => a.total_cmp(&b),
                _ => a.cmp(b),
            });
            answered
        };
        return points
            .into_iter()
            .zip(0u32..)
            .map(|(score, index)| {
                let count = counts.get(&score).copied().unwrap_or(0);
                QuestionOptionStat {
                    index,
                    text: format!("{score}分"),
                    count,
                    percentage: pct(count),
                }
            })
            .collect();
    }

    question
        .options
        .iter()
        .zip(0u32..)
        .map(|(option, index)| {
            let mut count = counts.get(&option.value).copied().unwrap_or(0);
            if option.label != option.value {
                count += counts.get(&option.label).copied().unwrap_or(0);
            }
            QuestionOptionStat {
                index,
                text: option.label.clone(),
                count,
                percentage: pct(count),
            }
        })
        .collect()
}

fn round_to(value: f64, places: i32) -> f64 {
    let factor = 10f64.powi(places);
    (value * factor).round() / factor
}
