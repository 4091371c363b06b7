//! Subcommands that talk to the assessment backend.

use eyre::{Result, WrapErr, eyre};
use serde::Serialize;
use talent_client::ApiClient;
use talent_client::api::Paging;
use talent_client::api::job_profiles::JobProfileQuery;
use talent_client::api::portraits::PortraitQuery;
use talent_client::api::questionnaires::QuestionnaireQuery;
use talent_client::api::submissions::SubmissionQuery;
use talent_client::config::{self as settings, ClientConfig};
use talent_client::session::{FileTokenStore, Session};
use talent_core::models::candidate::CandidateQuery;
use talent_core::models::job_profile::MatchRequest;
use talent_core::models::portrait::AnalysisLevel;
use talent_core::models::questionnaire::QuestionnaireCategory;

use crate::cli::{ConfigCommand, ListArgs, Resource};

fn effective_config() -> Result<ClientConfig> {
    Ok(settings::load_config()?.with_env()?)
}

fn connect() -> Result<ApiClient> {
    let config = effective_config()?;
    tracing::debug!(
        api_base = %config.api_base,
        mock_fallback = config.mock_fallback,
        "connecting"
    );
    let session = Session::new(Box::new(FileTokenStore::in_config_dir()?));
    Ok(ApiClient::new(config, session)?)
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

pub(crate) fn parse_category(label: &str) -> Result<QuestionnaireCategory> {
    serde_json::from_value(serde_json::Value::String(label.trim().to_lowercase()))
        .map_err(|_| {
            eyre!("unknown category {label}; expected professional, scored, survey or custom")
        })
}

pub(crate) fn config(command: ConfigCommand) -> Result<()> {
    match command {
        ConfigCommand::Show => {
            let effective = effective_config()?;
            print_json(&effective)?;
            if !settings::has_config() {
                tracing::info!("no saved config, showing defaults");
            }
        }
        ConfigCommand::SetBase { url } => {
            let parsed = url.trim();
            if !(parsed.starts_with("http://") || parsed.starts_with("https://")) {
                return Err(eyre!("base URL must start with http:// or https://"));
            }
            let mut saved = settings::load_config()?;
            saved.api_base = parsed.trim_end_matches('/').to_string();
            let path = settings::save_config(&saved)?;
            tracing::info!(path = %path.display(), api_base = %saved.api_base, "config saved");
        }
        ConfigCommand::SetFallback { enabled } => {
            let mut saved = settings::load_config()?;
            saved.mock_fallback = enabled;
            let path = settings::save_config(&saved)?;
            tracing::info!(path = %path.display(), mock_fallback = enabled, "config saved");
        }
    }
    Ok(())
}

pub(crate) async fn login(username: &str, password: &str) -> Result<()> {
    let client = connect()?;
    let response = client
        .login(username, password)
        .await
        .wrap_err("login failed")?;
    tracing::info!(username, token_type = %response.token_type, "logged in");
    Ok(())
}

pub(crate) async fn logout() -> Result<()> {
    connect()?.logout().await?;
    tracing::info!("session cleared");
    Ok(())
}

pub(crate) async fn list(args: &ListArgs) -> Result<()> {
    let client = connect()?;
    let paging = Paging {
        skip: args.skip,
        limit: args.limit,
    };
    let category = args.category.as_deref().map(parse_category).transpose()?;

    match args.resource {
        Resource::Questionnaires => {
            let query = QuestionnaireQuery { paging, category };
            print_json(&client.list_questionnaires(query).await?)
        }
        Resource::Assessments => print_json(&client.list_assessments(paging).await?),
        Resource::Submissions => {
            let query = SubmissionQuery {
                paging,
                category,
                ..SubmissionQuery::default()
            };
            print_json(&client.list_submissions(query).await?)
        }
        Resource::Candidates => {
            let query = candidate_query(args);
            print_json(&client.list_candidates(&query).await?)
        }
        Resource::JobProfiles => {
            let query = JobProfileQuery {
                paging,
                ..JobProfileQuery::default()
            };
            print_json(&client.list_job_profiles(&query).await?)
        }
        Resource::JobPositions => print_json(&client.list_job_positions().await?),
        Resource::Portraits => {
            let query = PortraitQuery {
                paging,
                target_position: None,
            };
            print_json(&client.candidate_portraits(&query).await?)
        }
    }
}

/// Candidates page by number, so `--skip` is rounded down to a page of
/// `--limit` rows.
pub(crate) fn candidate_query(args: &ListArgs) -> CandidateQuery {
    let page = match (args.skip, args.limit) {
        (Some(skip), Some(limit)) if limit > 0 => Some(skip / limit + 1),
        _ => None,
    };
    CandidateQuery {
        page,
        page_size: args.limit,
        keyword: args.keyword.clone(),
        ..CandidateQuery::default()
    }
}

pub(crate) async fn stats(questionnaire_id: Option<u64>) -> Result<()> {
    let client = connect()?;
    print_json(&client.submission_statistics(None, questionnaire_id).await?)
}

pub(crate) async fn analytics() -> Result<()> {
    print_json(&connect()?.analytics_summary().await?)
}

pub(crate) async fn portrait(candidate_id: u64, refresh: bool, expert: bool) -> Result<()> {
    let level = if expert {
        AnalysisLevel::Expert
    } else {
        AnalysisLevel::Pro
    };
    let portrait = connect()?
        .candidate_portrait(candidate_id, refresh, level)
        .await
        .wrap_err_with(|| format!("no portrait for candidate {candidate_id}"))?;
    tracing::info!(
        candidate_id,
        assessments = portrait.assessments.len(),
        matched = portrait.job_match.is_some(),
        "portrait loaded"
    );
    print_json(&portrait)
}

pub(crate) async fn match_profile(
    profile_id: u64,
    min_score: Option<f64>,
    limit: Option<u32>,
) -> Result<()> {
    let client = connect()?;
    let request = MatchRequest { min_score, limit };
    let response = client.match_candidates(profile_id, &request).await?;
    tracing::info!(profile_id, matches = response.total, "matched");
    print_json(&response)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(skip: Option<u32>, limit: Option<u32>) -> ListArgs {
        ListArgs {
            resource: Resource::Candidates,
            category: None,
            keyword: Some("王".into()),
            skip,
            limit,
        }
    }

    #[test]
    fn categories_parse_case_insensitively() {
        assert_eq!(parse_category("Survey").unwrap(), QuestionnaireCategory::Survey);
        assert_eq!(
            parse_category("professional").unwrap(),
            QuestionnaireCategory::Professional
        );
        assert!(parse_category("all").is_err());
    }

    #[test]
    fn candidate_paging_from_skip_and_limit() {
        let query = candidate_query(&args(Some(40), Some(20)));
        assert_eq!(query.page, Some(3));
        assert_eq!(query.page_size, Some(20));
        assert_eq!(query.keyword.as_deref(), Some("王"));

        assert_eq!(candidate_query(&args(Some(40), None)).page, None);
    }
}
