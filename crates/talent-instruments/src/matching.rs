//! Candidate-to-job-profile matching.

use std::collections::BTreeMap;

use talent_core::models::job_profile::{JobProfile, MatchRequest, MatchResponse, ProfileMatch};
use talent_core::models::submission::Submission;

/// Weighted match score of a submission against a profile.
///
/// Each weighted dimension contributes `score * weight / 100`; dimensions the
/// result does not report contribute 0. Returns `None` when the submission
/// has no result yet.
pub fn match_submission(profile: &JobProfile, submission: &Submission) -> Option<ProfileMatch> {
    let result = submission.result.as_ref()?;
    let available = result.details.dimension_scores();

    let dimension_scores: BTreeMap<String, f64> = profile
        .dimensions
        .iter()
        .map(|weight| {
            let score = lookup(&available, &weight.name).unwrap_or(0.0);
            (weight.name.clone(), score)
        })
        .collect();

    let match_score = profile
        .dimensions
        .iter()
        .map(|w| dimension_scores.get(&w.name).copied().unwrap_or(0.0) * w.weight / 100.0)
        .sum::<f64>();

    Some(ProfileMatch {
        profile_id: profile.id,
        submission_id: submission.id,
        match_score: (match_score * 10.0).round() / 10.0,
        dimension_scores,
        ai_analysis: None,
    })
}

fn lookup(scores: &BTreeMap<String, f64>, name: &str) -> Option<f64> {
    scores.get(name).copied().or_else(|| {
        scores
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(name))
            .map(|(_, score)| *score)
    })
}

/// Match every scored submission, best first, applying the request's
/// minimum score and limit.
pub fn rank_matches(
    profile: &JobProfile,
    submissions: &[Submission],
    request: &MatchRequest,
) -> MatchResponse {
    let mut matches: Vec<ProfileMatch> = submissions
        .iter()
        .filter_map(|s| match_submission(profile, s))
        .filter(|m| request.min_score.is_none_or(|min| m.match_score >= min))
        .collect();
    matches.sort_by(|a, b| b.match_score.total_cmp(&a.match_score));
    if let Some(limit) = request.limit {
        matches.truncate(limit as usize);
    }

    tracing::debug!(
        profile_id = profile.id,
        candidates = submissions.len(),
        matched = matches.len(),
        "ranked profile matches"
    );

    MatchResponse {
        total: u32::try_from(matches.len()).unwrap_or(u32::MAX),
        matches,
    }
}
