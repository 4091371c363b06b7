//! Subcommands that run entirely on this machine.

use std::fmt::Write as _;
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr, eyre};
use talent_core::models::answer::Answers;
use talent_core::models::questionnaire::{Questionnaire, QuestionnaireType};
use talent_core::models::result::{ResultDetails, ScoredResult};
use talent_core::models::submission::Submission;
use talent_export::questionnaire_text::{
    ImportedQuestionnaire, export_json, export_text, import_json, infer_kinds,
    parse_text_with_options,
};
use talent_export::render::{ReportContext, render_report, report_file_name};
use talent_instruments::catalog::{builtin_questionnaires, questionnaire_for_type, questions_for_type};
use talent_instruments::scoring::score_submission;

use crate::cli::{ExportArgs, FileFormat, ImportArgs, ReportArgs, ScoreArgs};

pub(crate) fn catalog_listing(kind: Option<&str>) -> String {
    let mut out = String::new();
    match kind {
        None => {
            for q in builtin_questionnaires(jiff::Timestamp::now()) {
                let _ = writeln!(
                    out,
                    "{:<6} {:<24} {:>3} 题  约{}分钟",
                    q.kind,
                    q.name,
                    q.question_count(),
                    q.estimated_minutes
                );
            }
        }
        Some(label) => {
            for q in questions_for_type(label) {
                let dimension = q.dimension.as_deref().unwrap_or("-");
                let _ = writeln!(out, "{:>3}. [{dimension}] {}", q.order, q.text);
            }
        }
    }
    out
}

fn read_json<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T> {
    let contents = std::fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read {}", path.display()))?;
    serde_json::from_str(&contents).wrap_err_with(|| format!("invalid JSON in {}", path.display()))
}

/// Write to `out`, or to stdout when no file is given.
fn emit(out: Option<&Path>, content: &str) -> Result<()> {
    match out {
        Some(path) => {
            std::fs::write(path, content)
                .wrap_err_with(|| format!("failed to write {}", path.display()))?;
            tracing::info!(path = %path.display(), bytes = content.len(), "written");
        }
        None => print!("{content}"),
    }
    Ok(())
}

pub(crate) fn resolve_questionnaire(
    kind: Option<&str>,
    path: Option<&Path>,
) -> Result<Questionnaire> {
    if let Some(path) = path {
        return read_json(path);
    }
    let label = kind.ok_or_else(|| eyre!("either --type or --questionnaire is required"))?;
    let kind: QuestionnaireType = label.parse()?;
    questionnaire_for_type(kind, 0, jiff::Timestamp::now())
        .ok_or_else(|| eyre!("{kind} has no built-in questionnaire; pass --questionnaire"))
}

pub(crate) fn score_answers(args: &ScoreArgs) -> Result<ScoredResult> {
    let questionnaire = resolve_questionnaire(args.kind.as_deref(), args.questionnaire.as_deref())?;
    let answers: Answers = read_json(&args.answers)?;
    Ok(score_submission(&questionnaire, &answers)?)
}

pub(crate) fn headline(result: &ScoredResult) -> String {
    let label = match &result.details {
        ResultDetails::Mbti(mbti) => mbti.mbti_type.clone(),
        ResultDetails::Disc(disc) => disc.disc_type.clone(),
        ResultDetails::Epq(epq) => epq.personality_trait.clone(),
        ResultDetails::Custom(custom) => format!("{} 题", custom.detailed_answers.len()),
    };
    let total = result
        .total_score
        .map_or_else(|| "-".to_string(), |t| format!("{t:.1}"));
    let grade = result.grade.as_deref().unwrap_or("-");
    format!("{label}  总分 {total}  等级 {grade}")
}

pub(crate) fn score(args: &ScoreArgs) -> Result<()> {
    let result = score_answers(args)?;
    if args.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        println!("{}", headline(&result));
    }
    Ok(())
}

pub(crate) fn render(args: &ReportArgs) -> Result<(String, PathBuf)> {
    let submission: Submission = read_json(&args.submission)?;
    let questionnaire: Option<Questionnaire> =
        args.questionnaire.as_deref().map(read_json).transpose()?;
    let tz = jiff::tz::TimeZone::get(&args.tz)
        .wrap_err_with(|| format!("unknown time zone {}", args.tz))?;

    let now = jiff::Timestamp::now();
    let mut ctx = ReportContext::new(now).with_time_zone(tz.clone());
    if let Some(questionnaire) = &questionnaire {
        ctx = ctx.with_questionnaire(questionnaire);
    }
    let html = render_report(&submission, &ctx)?;

    let path = match &args.out {
        Some(path) => path.clone(),
        None => PathBuf::from(report_file_name(
            &submission,
            now.to_zoned(tz).date(),
            "html",
        )),
    };
    Ok((html, path))
}

pub(crate) fn report(args: &ReportArgs) -> Result<()> {
    let (html, path) = render(args)?;
    emit(Some(&path), &html)?;
    println!("{}", path.display());
    Ok(())
}

fn format_for(path: &Path, explicit: Option<FileFormat>) -> FileFormat {
    explicit.unwrap_or_else(|| {
        let is_json = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { FileFormat::Json } else { FileFormat::Text }
    })
}

pub(crate) fn read_import(file: &Path, format: Option<FileFormat>) -> Result<ImportedQuestionnaire> {
    let contents = std::fs::read_to_string(file)
        .wrap_err_with(|| format!("failed to read {}", file.display()))?;
    let imported = match format_for(file, format) {
        FileFormat::Json => import_json(&contents)?,
        FileFormat::Text => {
            let mut questions = parse_text_with_options(&contents);
            if questions.is_empty() {
                return Err(eyre!("no questions found in {}", file.display()));
            }
            infer_kinds(&mut questions);
            ImportedQuestionnaire::from_questions(questions)
        }
    };
    tracing::info!(
        file = %file.display(),
        questions = imported.questions.len(),
        "questionnaire imported"
    );
    Ok(imported)
}

pub(crate) fn import(args: &ImportArgs) -> Result<()> {
    let imported = read_import(&args.file, args.format)?;
    let json = serde_json::to_string_pretty(&imported)?;
    emit(args.out.as_deref(), &format!("{json}\n"))
}

pub(crate) fn export_to_string(args: &ExportArgs) -> Result<String> {
    let questionnaire = resolve_questionnaire(args.kind.as_deref(), args.questionnaire.as_deref())?;
    Ok(match args.format {
        FileFormat::Text => export_text(&questionnaire.questions),
        FileFormat::Json => format!("{}\n", export_json(&questionnaire)?),
    })
}

pub(crate) fn export(args: &ExportArgs) -> Result<()> {
    let content = export_to_string(args)?;
    emit(args.out.as_deref(), &content)
}
