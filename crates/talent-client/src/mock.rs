//! In-memory stand-in for the backend, used when a request fails and mock
//! fallback is enabled. Write wrappers mutate it only when their own
//! request fell back, so later reads see the change.

use std::collections::BTreeMap;
use std::sync::Arc;

use jiff::{SignedDuration, Timestamp};
use talent_core::models::analytics::{
    AnalyticsSummary, GradeCutoffs, NamedValue, RadarIndicator, RadarSeries,
};
use talent_core::models::answer::{AnswerValue, Answers};
use talent_core::models::assessment::{Assessment, FormField};
use talent_core::models::candidate::{
    CandidatePage, CandidateQuery, CandidateSummary, SubmissionCategory,
};
use talent_core::models::job_profile::{DimensionWeight, JobPosition, JobProfile, ProfileStatus};
use talent_core::models::portrait::{
    CandidatePortrait, CandidatePortraitSummary, PortraitAssessment, PortraitBasicInfo,
    PortraitDimensionScore, PortraitJobMatch,
};
use talent_core::models::questionnaire::{Questionnaire, QuestionnaireType};
use talent_core::models::result::ResultDetails;
use talent_core::models::submission::{Candidate, Submission, SubmissionStatus};
use talent_instruments::catalog::builtin_questionnaires;
use talent_instruments::matching::match_submission;
use talent_instruments::scoring::score_submission;
use tokio::sync::Mutex;

/// Days a seeded assessment link stays open.
const SEEDED_VALIDITY_DAYS: i64 = 30;

/// Job-match dimension scores at or above this count as strengths.
const STRENGTH_SCORE: f64 = 80.0;

/// Job-match dimension scores below this count as improvement areas.
const IMPROVEMENT_SCORE: f64 = 60.0;

/// EPQ raw scale maximum shown on the dashboard radar.
const EPQ_RADAR_MAX: f64 = 24.0;

#[derive(Debug, Clone, Default)]
pub struct MockData {
    pub questionnaires: Vec<Questionnaire>,
    pub assessments: Vec<Assessment>,
    pub submissions: Vec<Submission>,
    pub candidates: Vec<CandidateSummary>,
    pub job_positions: Vec<JobPosition>,
    pub job_profiles: Vec<JobProfile>,
    next_id: u64,
}

impl MockData {
    /// Next free id, shared across every collection.
    pub fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    pub fn questionnaire(&self, id: u64) -> Option<&Questionnaire> {
        self.questionnaires.iter().find(|q| q.id == id)
    }

    pub fn assessment_by_code(&self, code: &str) -> Option<&Assessment> {
        self.assessments.iter().find(|a| a.code == code)
    }

    /// Record a submitted answer sheet. A submission already known by code
    /// is scored against its questionnaire; an unknown code becomes a new
    /// unscored custom submission with the candidate read from the answers.
    pub fn submit(
        &mut self,
        submission_code: &str,
        answers: Answers,
        now: Timestamp,
    ) -> Submission {
        if let Some(index) = self.submissions.iter().position(|s| s.code == submission_code) {
            let questionnaire = self
                .questionnaire(self.submissions[index].questionnaire_id)
                .cloned();
            let submission = &mut self.submissions[index];
            submission.answers = answers;
            if let Some(questionnaire) = questionnaire {
                match score_submission(&questionnaire, &submission.answers) {
                    Ok(result) => {
                        if let Err(e) = submission.complete(result, now) {
                            tracing::debug!(code = submission_code, error = %e, "mock submission not completed");
                        }
                    }
                    Err(e) => {
                        tracing::warn!(code = submission_code, error = %e, "mock scoring failed");
                    }
                }
            }
            return submission.clone();
        }

        let text = |key: &str| {
            answers
                .lookup(key)
                .and_then(AnswerValue::as_text)
                .unwrap_or_default()
        };
        let submission = Submission {
            id: self.next_id(),
            code: submission_code.to_string(),
            assessment_id: 0,
            questionnaire_id: 0,
            questionnaire_name: "测试问卷".to_string(),
            questionnaire_type: QuestionnaireType::Custom,
            candidate: Candidate {
                name: text("candidate_name"),
                phone: text("candidate_phone"),
                ..Candidate::default()
            },
            status: SubmissionStatus::Completed,
            answers,
            result: None,
            started_at: now,
            submitted_at: Some(now),
        };
        self.submissions.push(submission.clone());
        submission
    }

    pub fn candidate_page(&self, query: &CandidateQuery) -> CandidatePage {
        let keyword = query.keyword.as_deref().map(str::to_lowercase);
        let matching: Vec<&CandidateSummary> = self
            .candidates
            .iter()
            .filter(|c| {
                keyword.as_ref().is_none_or(|k| {
                    c.name.to_lowercase().contains(k) || c.phone.contains(k.as_str())
                })
            })
            .filter(|c| query.position.as_ref().is_none_or(|p| &c.position == p))
            .filter(|c| query.status.as_ref().is_none_or(|s| &c.status == s))
            .collect();

        let page = query.page.unwrap_or(1).max(1);
        let page_size = query
            .page_size
            .unwrap_or_else(|| u32::try_from(matching.len()).unwrap_or(u32::MAX))
            .max(1);
        let skip = (page as usize - 1).saturating_mul(page_size as usize);
        CandidatePage {
            items: matching
                .iter()
                .skip(skip)
                .take(page_size as usize)
                .map(|c| (*c).clone())
                .collect(),
            page,
            page_size,
            total: matching.len() as u64,
        }
    }

    /// Scored submissions that belong to a pool candidate, matched by phone
    /// when both sides have one and by name otherwise.
    fn candidate_submissions<'a>(
        &'a self,
        candidate: &'a CandidateSummary,
    ) -> impl Iterator<Item = &'a Submission> + 'a {
        self.submissions.iter().filter(move |s| {
            s.result.is_some()
                && if !candidate.phone.is_empty() && !s.candidate.phone.is_empty() {
                    s.candidate.phone == candidate.phone
                } else {
                    s.candidate.name == candidate.name
                }
        })
    }

    /// Portrait assembled from the pool: the candidate's scored submissions
    /// and their best match over the job profiles.
    pub fn portrait(&self, candidate_id: u64, now: Timestamp) -> Option<CandidatePortrait> {
        let candidate = self.candidates.iter().find(|c| c.id == candidate_id)?;
        let submissions: Vec<&Submission> = self.candidate_submissions(candidate).collect();

        let assessments: Vec<PortraitAssessment> = submissions
            .iter()
            .map(|s| {
                let (max_score, score_percentage) = match s.result.as_ref().map(|r| &r.details) {
                    Some(ResultDetails::Custom(custom)) => {
                        (custom.max_score, custom.score_percentage)
                    }
                    _ => (None, None),
                };
                PortraitAssessment {
                    submission_id: s.id,
                    assessment_name: self
                        .assessments
                        .iter()
                        .find(|a| a.id == s.assessment_id)
                        .map_or_else(|| s.questionnaire_name.clone(), |a| a.name.clone()),
                    questionnaire_name: s.questionnaire_name.clone(),
                    total_score: s.total_score(),
                    max_score,
                    score_percentage,
                    grade: s.grade().map(str::to_string),
                    completed_at: s.submitted_at,
                }
            })
            .collect();

        let job_match = self
            .job_profiles
            .iter()
            .flat_map(|profile| {
                submissions
                    .iter()
                    .filter_map(move |s| match_submission(profile, s).map(|m| (profile, m)))
            })
            .max_by(|(_, a), (_, b)| a.match_score.total_cmp(&b.match_score))
            .map(|(profile, matched)| PortraitJobMatch {
                profile_id: profile.id,
                profile_name: profile.name.clone(),
                department: profile.department.clone(),
                match_score: matched.match_score,
                dimension_scores: profile
                    .dimensions
                    .iter()
                    .map(|w| {
                        let score = matched.dimension_scores.get(&w.name).copied().unwrap_or(0.0);
                        PortraitDimensionScore {
                            name: w.name.clone(),
                            score,
                            weight: w.weight,
                            description: w.description.clone(),
                            weighted_score: score * w.weight / 100.0,
                        }
                    })
                    .collect(),
                ai_analysis: None,
                matched_at: Some(now),
            });

        let totals: Vec<f64> = assessments.iter().filter_map(|a| a.total_score).collect();
        let overall_score = if totals.is_empty() {
            (candidate.score > 0.0).then_some(candidate.score)
        } else {
            let mean = totals.iter().sum::<f64>() / totals.len() as f64;
            Some((mean * 10.0).round() / 10.0)
        };

        let dimension_scores = job_match
            .as_ref()
            .map_or(&[][..], |m| m.dimension_scores.as_slice());
        let strengths = dimension_scores
            .iter()
            .filter(|d| d.score >= STRENGTH_SCORE)
            .map(|d| d.name.clone())
            .collect();
        let improvements = dimension_scores
            .iter()
            .filter(|d| d.score < IMPROVEMENT_SCORE)
            .map(|d| d.name.clone())
            .collect();

        Some(CandidatePortrait {
            basic_info: PortraitBasicInfo {
                id: candidate.id,
                name: candidate.name.clone(),
                phone: candidate.phone.clone(),
                email: None,
                gender: None,
                target_position: Some(candidate.position.clone()).filter(|p| !p.is_empty()),
                created_at: candidate.updated_at.unwrap_or(now),
            },
            assessments,
            job_match,
            overall_score,
            strengths,
            improvements,
            portrait_version: "1.0".to_string(),
            generated_at: now,
        })
    }

    /// Portrait rows for the pool, optionally narrowed to one target
    /// position.
    pub fn portrait_summaries(
        &self,
        target_position: Option<&str>,
        now: Timestamp,
    ) -> Vec<CandidatePortraitSummary> {
        self.candidates
            .iter()
            .filter(|c| target_position.is_none_or(|p| c.position == p))
            .filter_map(|c| self.portrait(c.id, now))
            .map(|p| CandidatePortraitSummary::from(&p))
            .collect()
    }

    /// Dashboard aggregates over the pool and the scored EPQ submissions.
    pub fn analytics_summary(&self) -> AnalyticsSummary {
        let mut positions: BTreeMap<&str, f64> = BTreeMap::new();
        for candidate in &self.candidates {
            *positions.entry(candidate.position.as_str()).or_default() += 1.0;
        }

        let buckets = [
            (">90", 90.0, f64::INFINITY),
            ("80-90", 80.0, 90.0),
            ("70-80", 70.0, 80.0),
            ("<70", f64::NEG_INFINITY, 70.0),
        ];
        let match_distribution = buckets
            .iter()
            .map(|(name, low, high)| {
                let count = self
                    .candidates
                    .iter()
                    .filter(|c| c.score >= *low && c.score < *high)
                    .count();
                NamedValue::new(name, count as f64)
            })
            .collect();

        let epq: Vec<_> = self
            .submissions
            .iter()
            .filter_map(|s| match s.result.as_ref().map(|r| &r.details) {
                Some(ResultDetails::Epq(epq)) => Some(epq),
                _ => None,
            })
            .collect();

        let mut radar_indicators = Vec::new();
        let mut radar_series = Vec::new();
        let mut traits: BTreeMap<&str, f64> = BTreeMap::new();
        if let Some(first) = epq.first() {
            radar_indicators = first
                .dimensions
                .iter()
                .map(|d| RadarIndicator {
                    name: format!("{} {}", d.label, d.code),
                    max: EPQ_RADAR_MAX,
                })
                .collect();
            let averages = first
                .dimensions
                .iter()
                .map(|d| {
                    let sum: u32 = epq
                        .iter()
                        .filter_map(|r| r.dimensions.iter().find(|x| x.code == d.code))
                        .map(|x| x.raw_score)
                        .sum();
                    (f64::from(sum) / epq.len() as f64 * 10.0).round() / 10.0
                })
                .collect();
            radar_series.push(RadarSeries {
                name: "候选人均值".to_string(),
                value: averages,
            });
            for result in &epq {
                *traits.entry(result.personality_trait.as_str()).or_default() += 1.0;
            }
        }

        let scores: Vec<f64> = self
            .candidates
            .iter()
            .map(|c| c.score)
            .filter(|s| *s > 0.0)
            .collect();
        let avg_score = (!scores.is_empty())
            .then(|| (scores.iter().sum::<f64>() / scores.len() as f64 * 10.0).round() / 10.0);

        AnalyticsSummary {
            position_distribution: positions
                .into_iter()
                .map(|(name, count)| NamedValue::new(name, count))
                .collect(),
            match_distribution,
            radar_indicators,
            radar_series,
            personality_pie: traits
                .into_iter()
                .map(|(name, count)| NamedValue::new(name, count))
                .collect(),
            dimension_trend_labels: Vec::new(),
            dimension_trend_series: Vec::new(),
            grade_cutoffs: Some(GradeCutoffs {
                a: 18.0,
                b: 12.0,
                c: 8.0,
            }),
            total_candidates: Some(self.candidates.len() as u64),
            avg_score,
        }
    }
}

/// Shared handle to [`MockData`].
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    data: Arc<Mutex<MockData>>,
}

impl MockStore {
    pub fn empty() -> Self {
        Self::default()
    }

    /// The built-in questionnaires, one open assessment for each, and a
    /// small talent pool.
    pub fn seeded(now: Timestamp) -> Self {
        let mut data = MockData {
            questionnaires: builtin_questionnaires(now),
            ..MockData::default()
        };
        data.next_id = data.questionnaires.len() as u64;

        let questionnaires: Vec<(u64, String, QuestionnaireType)> = data
            .questionnaires
            .iter()
            .map(|q| (q.id, q.name.clone(), q.kind))
            .collect();
        for (questionnaire_id, name, kind) in questionnaires {
            let assessment = Assessment {
                id: data.next_id(),
                name: format!("{name} 示例"),
                code: format!("ASS_DEMO_{kind}"),
                questionnaire_id,
                valid_from: now,
                valid_until: now + SignedDuration::from_hours(24 * SEEDED_VALIDITY_DAYS),
                description: None,
                form_fields: FormField::defaults(),
                page_texts: Default::default(),
                link_type: Default::default(),
                repeat: Default::default(),
                created_at: now,
            };
            data.assessments.push(assessment);
        }

        let pool = [
            ("张伟", "产品经理", "13800000001", 86.0, "interviewing"),
            ("李娜", "前端工程师", "13800000002", 78.0, "pending"),
            ("王强", "销售代表", "13800000003", 64.0, "rejected"),
        ];
        for (name, position, phone, score, status) in pool {
            let candidate = CandidateSummary {
                id: data.next_id(),
                name: name.to_string(),
                position: position.to_string(),
                phone: phone.to_string(),
                score,
                status: status.to_string(),
                grade: None,
                tags: Vec::new(),
                submission_types: vec![SubmissionCategory::Professional],
                updated_at: Some(now),
            };
            data.candidates.push(candidate);
        }

        let position_id = data.next_id();
        data.job_positions.push(JobPosition {
            id: position_id,
            name: "销售代表".to_string(),
            department: Some("销售部".to_string()),
            level: None,
            description: None,
            status: ProfileStatus::Active,
        });
        let profile_id = data.next_id();
        data.job_profiles.push(JobProfile {
            id: profile_id,
            name: "销售代表".to_string(),
            department: Some("销售部".to_string()),
            description: Some("外向、有影响力、抗压".to_string()),
            tags: vec!["沟通".to_string()],
            dimensions: vec![
                DimensionWeight {
                    name: "I".to_string(),
                    weight: 60.0,
                    description: None,
                },
                DimensionWeight {
                    name: "D".to_string(),
                    weight: 40.0,
                    description: None,
                },
            ],
            status: ProfileStatus::Active,
            created_at: now,
            updated_at: now,
        });

        Self {
            data: Arc::new(Mutex::new(data)),
        }
    }

    pub async fn read<R>(&self, f: impl FnOnce(&MockData) -> R) -> R {
        f(&*self.data.lock().await)
    }

    pub async fn write<R>(&self, f: impl FnOnce(&mut MockData) -> R) -> R {
        f(&mut *self.data.lock().await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn seeded_store_links_assessments_to_questionnaires() {
        let store = MockStore::seeded(Timestamp::now());
        store
            .read(|data| {
                assert_eq!(data.questionnaires.len(), 3);
                let mbti = data.assessment_by_code("ASS_DEMO_MBTI").unwrap();
                assert_eq!(
                    data.questionnaire(mbti.questionnaire_id).unwrap().kind,
                    QuestionnaireType::Mbti
                );
            })
            .await;
    }

    #[tokio::test]
    async fn ids_are_never_reused() {
        let store = MockStore::seeded(Timestamp::now());
        let (a, b) = store.write(|data| (data.next_id(), data.next_id())).await;
        assert!(b > a);
        let taken = store
            .read(|data| data.candidates.iter().any(|c| c.id == a))
            .await;
        assert!(!taken);
    }

    #[test]
    fn unknown_submission_code_records_candidate_from_answers() {
        let mut data = MockData::default();
        let answers: Answers = [
            ("candidate_name", AnswerValue::Text("赵六".into())),
            ("candidate_phone", AnswerValue::Text("13900000000".into())),
            ("q1", AnswerValue::Number(4.0)),
        ]
        .into_iter()
        .collect();
        let submission = data.submit("SUB_X", answers, Timestamp::now());
        assert_eq!(submission.candidate.name, "赵六");
        assert_eq!(submission.status, SubmissionStatus::Completed);
        assert_eq!(data.submissions.len(), 1);
    }

    #[test]
    fn submission_with_undeclared_dimensions_stays_open() {
        let now = Timestamp::now();
        let mut data = MockData {
            questionnaires: builtin_questionnaires(now),
            ..MockData::default()
        };
        let disc = data
            .questionnaires
            .iter_mut()
            .find(|q| q.kind == QuestionnaireType::Disc)
            .unwrap();
        disc.dimensions.retain(|d| d.code == "D");
        let started = Submission::start(9, "SUB_DISC", 1, disc, Candidate::default(), now);
        data.submissions.push(started);

        let submission = data.submit("SUB_DISC", Answers::new(), now);
        assert_eq!(submission.status, SubmissionStatus::Started);
        assert!(submission.result.is_none());
    }

    /// Seeded store plus a completed DISC sheet for 张伟 answering 5
    /// everywhere.
    fn store_with_disc_sheet(now: Timestamp) -> MockData {
        let store = MockStore::seeded(now);
        let mut data = store.data.try_lock().unwrap().clone();
        let disc = data
            .questionnaires
            .iter()
            .find(|q| q.kind == QuestionnaireType::Disc)
            .cloned()
            .unwrap();
        let candidate = Candidate {
            name: "张伟".into(),
            phone: "13800000001".into(),
            ..Candidate::default()
        };
        let id = data.next_id();
        data.submissions
            .push(Submission::start(id, "SUB_ZW", 0, &disc, candidate, now));
        let answers: Answers = disc
            .questions
            .iter()
            .map(|q| (q.id.clone(), AnswerValue::Number(5.0)))
            .collect();
        let submitted = data.submit("SUB_ZW", answers, now);
        assert_eq!(submitted.status, SubmissionStatus::Completed);
        data
    }

    #[test]
    fn portrait_joins_submissions_and_best_profile_match() {
        let now = Timestamp::now();
        let data = store_with_disc_sheet(now);
        let candidate_id = data.candidates[0].id;

        let portrait = data.portrait(candidate_id, now).unwrap();
        assert_eq!(portrait.basic_info.name, "张伟");
        assert_eq!(portrait.basic_info.target_position.as_deref(), Some("产品经理"));
        assert_eq!(portrait.assessments.len(), 1);
        assert_eq!(portrait.assessments[0].total_score, Some(100.0));

        let job_match = portrait.job_match.as_ref().unwrap();
        assert_eq!(job_match.profile_name, "销售代表");
        assert_eq!(job_match.match_score, 100.0);
        let weighted: f64 = job_match.dimension_scores.iter().map(|d| d.weighted_score).sum();
        assert_eq!(weighted, 100.0);
        assert_eq!(portrait.strengths, vec!["I".to_string(), "D".to_string()]);
        assert!(portrait.improvements.is_empty());
        assert_eq!(portrait.overall_score, Some(100.0));
    }

    #[test]
    fn portrait_without_submissions_uses_pool_score() {
        let now = Timestamp::now();
        let data = store_with_disc_sheet(now);
        let lina = data.candidates.iter().find(|c| c.name == "李娜").unwrap();

        let portrait = data.portrait(lina.id, now).unwrap();
        assert!(portrait.assessments.is_empty());
        assert!(portrait.job_match.is_none());
        assert_eq!(portrait.overall_score, Some(78.0));
        assert!(data.portrait(9999, now).is_none());

        let rows = data.portrait_summaries(Some("前端工程师"), now);
        assert_eq!(rows.len(), 1);
        assert!(!rows[0].has_job_match);
    }

    #[test]
    fn analytics_summarises_pool_and_epq_results() {
        let now = Timestamp::now();
        let mut data = store_with_disc_sheet(now);
        let epq = data
            .questionnaires
            .iter()
            .find(|q| q.kind == QuestionnaireType::Epq)
            .cloned()
            .unwrap();
        let id = data.next_id();
        data.submissions
            .push(Submission::start(id, "SUB_EPQ", 0, &epq, Candidate::default(), now));
        data.submit("SUB_EPQ", Answers::new(), now);

        let summary = data.analytics_summary();
        assert_eq!(summary.total_candidates, Some(3));
        assert_eq!(summary.position_distribution.len(), 3);
        let buckets: Vec<f64> = summary.match_distribution.iter().map(|b| b.value).collect();
        assert_eq!(buckets, vec![0.0, 1.0, 1.0, 1.0]);
        assert_eq!(summary.avg_score, Some(76.0));
        assert_eq!(summary.radar_indicators.len(), 4);
        assert_eq!(summary.radar_series[0].value, vec![0.0, 0.0, 0.0, 0.0]);
        assert_eq!(summary.personality_pie.len(), 1);
    }

    #[test]
    fn candidate_page_filters_and_pages() {
        let store_data = {
            let mut data = MockData::default();
            let rows = [("张伟", "产品经理"), ("张敏", "销售代表"), ("李娜", "产品经理")];
            for (name, position) in rows {
                let id = data.next_id();
                data.candidates.push(CandidateSummary {
                    id,
                    name: name.into(),
                    position: position.into(),
                    phone: String::new(),
                    score: 0.0,
                    status: "pending".into(),
                    grade: None,
                    tags: Vec::new(),
                    submission_types: Vec::new(),
                    updated_at: None,
                });
            }
            data
        };

        let page = store_data.candidate_page(&CandidateQuery {
            keyword: Some("张".into()),
            ..CandidateQuery::default()
        });
        assert_eq!(page.total, 2);

        let page = store_data.candidate_page(&CandidateQuery {
            page: Some(2),
            page_size: Some(2),
            ..CandidateQuery::default()
        });
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].name, "李娜");
        assert_eq!(page.total, 3);
    }
}
