use serde::Serialize;
use tera::{Context, Tera};

use talent_core::models::answer::AnswerValue;
use talent_core::models::question::QuestionKind;
use talent_core::models::questionnaire::{Questionnaire, QuestionnaireType};
use talent_core::models::result::{
    AnswerScoring, DetailedAnswer, DiscResult, EpqLevel, EpqResult, MbtiResult, ResultDetails,
};
use talent_core::models::submission::{Submission, SubmissionStatus};
use talent_instruments::custom::display_answer;
use talent_instruments::get_instrument;

use crate::error::ExportError;

/// `(name, source)`. Names end in `.html` so tera autoescapes them.
const TEMPLATES: [(&str, &str); 6] = [
    ("layout.html", include_str!("../templates/layout.html.tera")),
    ("assessment.html", include_str!("../templates/assessment.html.tera")),
    ("survey.html", include_str!("../templates/survey.html.tera")),
    ("sections/mbti.html", include_str!("../templates/sections/mbti.html.tera")),
    ("sections/disc.html", include_str!("../templates/sections/disc.html.tera")),
    ("sections/epq.html", include_str!("../templates/sections/epq.html.tera")),
];

const NOT_AVAILABLE: &str = "N/A";

/// Report layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    /// Personality instruments: result hero, dimension bars, total and grade.
    Assessment,
    /// Custom questionnaires: per-answer detail and an optional score.
    Survey,
}

impl ReportKind {
    /// Layout for a submission, chosen by its result variant. Unscored
    /// submissions get the survey layout.
    pub fn for_submission(submission: &Submission) -> Self {
        match submission.result.as_ref().map(|r| &r.details) {
            Some(ResultDetails::Mbti(_) | ResultDetails::Disc(_) | ResultDetails::Epq(_)) => {
                ReportKind::Assessment
            }
            Some(ResultDetails::Custom(_)) | None => ReportKind::Survey,
        }
    }

    fn template(self) -> &'static str {
        match self {
            ReportKind::Assessment => "assessment.html",
            ReportKind::Survey => "survey.html",
        }
    }
}

/// Rendering inputs that are not part of the submission.
#[derive(Debug, Clone)]
pub struct ReportContext<'a> {
    pub generated_at: jiff::Timestamp,
    /// Zone timestamps are displayed in.
    pub time_zone: jiff::tz::TimeZone,
    /// Supplies question texts when the submission has no detailed answers.
    pub questionnaire: Option<&'a Questionnaire>,
}

impl<'a> ReportContext<'a> {
    pub fn new(generated_at: jiff::Timestamp) -> Self {
        Self {
            generated_at,
            time_zone: jiff::tz::TimeZone::UTC,
            questionnaire: None,
        }
    }

    pub fn with_time_zone(mut self, time_zone: jiff::tz::TimeZone) -> Self {
        self.time_zone = time_zone;
        self
    }

    pub fn with_questionnaire(mut self, questionnaire: &'a Questionnaire) -> Self {
        self.questionnaire = Some(questionnaire);
        self
    }

    fn format(&self, at: jiff::Timestamp) -> String {
        at.to_zoned(self.time_zone.clone())
            .strftime("%Y-%m-%d %H:%M:%S")
            .to_string()
    }
}

#[derive(Debug, Serialize)]
struct ReportView {
    title: &'static str,
    subtitle: &'static str,
    accent: &'static str,
    candidate_name: String,
    candidate_phone: String,
    code: String,
    questionnaire_name: String,
    questionnaire_type: String,
    started_at: String,
    submitted_at: String,
    status: &'static str,
    scored: bool,
    has_grade: bool,
    total_score: String,
    grade: String,
    section: Option<&'static str>,
    headline: Option<Headline>,
    dominant: Option<String>,
    bars: Vec<Bar>,
    answers: Vec<AnswerRow>,
    generated_at: String,
}

#[derive(Debug, Serialize)]
struct Headline {
    title: String,
    subtitle: String,
    caption: &'static str,
}

#[derive(Debug, Serialize)]
struct Bar {
    code: String,
    caption: String,
    value: String,
    width: f64,
    level: Option<&'static str>,
    level_class: Option<&'static str>,
    raw_score: Option<u32>,
    t_score: Option<i32>,
}

#[derive(Debug, Serialize)]
struct AnswerRow {
    index: usize,
    question: String,
    kind: QuestionKind,
    display: String,
    affirmative: bool,
    nps_category: Option<&'static str>,
    score: Option<String>,
}

/// Render a submission as a standalone HTML document, choosing the layout
/// from its result.
pub fn render_report(submission: &Submission, ctx: &ReportContext<'_>) -> Result<String, ExportError> {
    render_report_for_kind(ReportKind::for_submission(submission), submission, ctx)
}

/// Render a submission with an explicit layout.
///
/// The assessment layout renders exactly one instrument section, picked by
/// the result variant; without an instrument result it shows a placeholder.
pub fn render_report_for_kind(
    kind: ReportKind,
    submission: &Submission,
    ctx: &ReportContext<'_>,
) -> Result<String, ExportError> {
    let view = build_view(kind, submission, ctx);

    let mut tera = Tera::default();
    tera.add_raw_templates(TEMPLATES.to_vec())
        .map_err(|e| ExportError::TemplateParse(e.to_string()))?;

    let context = Context::from_serialize(&view)
        .map_err(|e| ExportError::TemplateRender(e.to_string()))?;
    let rendered = tera.render(kind.template(), &context)?;

    tracing::debug!(
        code = %submission.code,
        layout = kind.template(),
        section = view.section.unwrap_or("none"),
        bytes = rendered.len(),
        "rendered report"
    );
    Ok(rendered)
}

/// Download name for an exported report, e.g. `测评报告_张三_SUB_1A2B_2026-03-02.pdf`.
pub fn report_file_name(submission: &Submission, date: jiff::civil::Date, extension: &str) -> String {
    let name = submission.candidate.name.trim();
    let name = if name.is_empty() { "未知" } else { name };
    format!("测评报告_{name}_{}_{date}.{extension}", submission.code)
}

/// Width in percent of an EPQ T-score bar spanning T 20 to 80.
pub fn epq_bar_width(t_score: i32) -> f64 {
    let width = (f64::from(t_score) - 20.0) / 60.0 * 100.0;
    (width.clamp(0.0, 100.0) * 10.0).round() / 10.0
}

fn build_view(kind: ReportKind, submission: &Submission, ctx: &ReportContext<'_>) -> ReportView {
    let (title, subtitle, default_accent) = match kind {
        ReportKind::Assessment => ("测评报告", "Assessment Report", "#667eea"),
        ReportKind::Survey => ("调查问卷报告", "Survey Report", "#4facfe"),
    };

    let result = submission.result.as_ref();
    let total = result.and_then(|r| r.total_score);
    let grade = result.and_then(|r| r.grade.clone());

    let mut view = ReportView {
        title,
        subtitle,
        accent: default_accent,
        candidate_name: submission.candidate.name.clone(),
        candidate_phone: submission.candidate.phone.clone(),
        code: submission.code.clone(),
        questionnaire_name: if submission.questionnaire_name.is_empty() {
            NOT_AVAILABLE.to_string()
        } else {
            submission.questionnaire_name.clone()
        },
        questionnaire_type: submission.questionnaire_type.to_string(),
        started_at: ctx.format(submission.started_at),
        submitted_at: submission
            .submitted_at
            .map(|at| ctx.format(at))
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        status: status_label(submission.status),
        scored: total.is_some(),
        has_grade: grade.is_some(),
        total_score: total
            .map(|t| t.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        grade: grade.unwrap_or_else(|| NOT_AVAILABLE.to_string()),
        section: None,
        headline: None,
        dominant: None,
        bars: Vec::new(),
        answers: Vec::new(),
        generated_at: ctx.format(ctx.generated_at),
    };

    match (kind, result.map(|r| &r.details)) {
        (ReportKind::Assessment, Some(ResultDetails::Mbti(mbti))) => mbti_section(&mut view, mbti),
        (ReportKind::Assessment, Some(ResultDetails::Disc(disc))) => disc_section(&mut view, disc),
        (ReportKind::Assessment, Some(ResultDetails::Epq(epq))) => epq_section(&mut view, epq),
        (ReportKind::Assessment, _) => {}
        (ReportKind::Survey, Some(ResultDetails::Custom(custom)))
            if !custom.detailed_answers.is_empty() =>
        {
            view.answers = answer_rows(&custom.detailed_answers);
        }
        (ReportKind::Survey, _) => view.answers = fallback_rows(submission, ctx),
    }
    view
}

fn mbti_section(view: &mut ReportView, mbti: &MbtiResult) {
    let names = get_instrument(QuestionnaireType::Mbti);
    let pair_name = |code: &str| {
        names
            .as_ref()
            .and_then(|i| i.dimensions().iter().find(|d| d.code == code))
            .map(|d| d.name.clone())
            .unwrap_or_else(|| code.to_string())
    };

    view.section = Some("mbti");
    view.headline = Some(Headline {
        title: mbti.mbti_type.clone(),
        subtitle: mbti.description.clone(),
        caption: "MBTI人格类型测评",
    });
    view.bars = mbti
        .dimensions
        .iter()
        .map(|d| Bar {
            code: d.code.clone(),
            caption: format!("{} ({} - {})", pair_name(&d.code), d.tendency, d.label),
            value: format!("{}%", d.value),
            width: f64::from(d.value.min(100)),
            level: None,
            level_class: None,
            raw_score: None,
            t_score: None,
        })
        .collect();
}

fn disc_section(view: &mut ReportView, disc: &DiscResult) {
    view.section = Some("disc");
    view.accent = "#f5576c";
    // Descriptions read "D型 - 支配型：..."; the hero already shows the type.
    let subtitle = disc
        .description
        .strip_prefix(disc.disc_type.as_str())
        .map(|rest| rest.trim_start_matches([' ', '-', ':', '：']))
        .filter(|rest| !rest.is_empty())
        .unwrap_or(&disc.description);
    view.headline = Some(Headline {
        title: disc.disc_type.clone(),
        subtitle: subtitle.to_string(),
        caption: "DISC行为风格测评",
    });
    view.dominant = Some(disc.dominant.clone());
    view.bars = disc
        .dimensions
        .iter()
        .map(|d| Bar {
            code: d.code.clone(),
            caption: format!("{}型 - {}", d.code, d.label),
            value: format!("{}%", d.value),
            width: f64::from(d.value.min(100)),
            level: None,
            level_class: None,
            raw_score: None,
            t_score: None,
        })
        .collect();
}

fn epq_section(view: &mut ReportView, epq: &EpqResult) {
    view.section = Some("epq");
    view.accent = "#4facfe";
    view.headline = Some(Headline {
        title: epq.personality_trait.clone(),
        subtitle: String::new(),
        caption: "EPQ人格特质测评",
    });
    view.bars = epq
        .dimensions
        .iter()
        .map(|d| Bar {
            code: d.code.clone(),
            caption: d.label.clone(),
            value: d.t_score.to_string(),
            width: epq_bar_width(d.t_score),
            level: Some(d.level.label()),
            level_class: Some(match d.level {
                EpqLevel::High => "high",
                EpqLevel::Medium => "medium",
                EpqLevel::Low => "low",
            }),
            raw_score: Some(d.raw_score),
            t_score: Some(d.t_score),
        })
        .collect();
}

fn answer_rows(answers: &[DetailedAnswer]) -> Vec<AnswerRow> {
    answers
        .iter()
        .enumerate()
        .map(|(i, a)| {
            row(
                i + 1,
                &a.question_text,
                a.question_kind,
                a.answer.as_ref(),
                a.display.clone(),
                a.scoring.as_ref(),
            )
        })
        .collect()
}

/// Rows built from raw answers: labelled through the questionnaire when one
/// is supplied, keyed by question id otherwise.
fn fallback_rows(submission: &Submission, ctx: &ReportContext<'_>) -> Vec<AnswerRow> {
    if let Some(questionnaire) = ctx.questionnaire {
        return questionnaire
            .questions
            .iter()
            .filter_map(|q| submission.answers.lookup(&q.id).map(|a| (q, a)))
            .enumerate()
            .map(|(i, (q, a))| row(i + 1, &q.text, q.kind, Some(a), display_answer(q, a), None))
            .collect();
    }

    submission
        .answers
        .iter()
        .filter(|(_, a)| !a.is_blank())
        .enumerate()
        .map(|(i, (id, a))| {
            let display = a.choices().join("、");
            row(i + 1, id, QuestionKind::ShortText, Some(a), display, None)
        })
        .collect()
}

fn row(
    index: usize,
    question: &str,
    kind: QuestionKind,
    answer: Option<&AnswerValue>,
    display: String,
    scoring: Option<&AnswerScoring>,
) -> AnswerRow {
    let nps_category = match (kind, answer.and_then(AnswerValue::as_number)) {
        (QuestionKind::Nps, Some(v)) if v >= 9.0 => Some("推荐者"),
        (QuestionKind::Nps, Some(v)) if v >= 7.0 => Some("中立者"),
        (QuestionKind::Nps, Some(_)) => Some("贬损者"),
        _ => None,
    };

    AnswerRow {
        index,
        question: question.to_string(),
        kind,
        display: if display.trim().is_empty() {
            "未填写".to_string()
        } else {
            display
        },
        affirmative: answer.is_some_and(AnswerValue::is_affirmative),
        nps_category,
        score: scoring.map(|s| {
            format!(
                "得分: {} / {} ({}%)",
                s.earned_score, s.max_score, s.percentage
            )
        }),
    }
}

fn status_label(status: SubmissionStatus) -> &'static str {
    match status {
        SubmissionStatus::Started => "已开始",
        SubmissionStatus::InProgress => "进行中",
        SubmissionStatus::Completed => "已完成",
        SubmissionStatus::Abandoned => "已放弃",
    }
}
