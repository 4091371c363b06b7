use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

use crate::{local, remote};

#[derive(Parser, Debug)]
#[command(
    name = "talentlens",
    about = "Score personality assessments, render reports and manage the assessment backend",
    version
)]
pub(crate) struct Cli {
    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    pub(crate) log_json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// List the built-in questionnaires, or the questions of one type
    Catalog {
        /// Questionnaire type label (MBTI, DISC, EPQ)
        #[arg(long = "type")]
        kind: Option<String>,
    },
    /// Score an answer sheet
    Score(ScoreArgs),
    /// Render a submission as an HTML report
    Report(ReportArgs),
    /// Read a questionnaire from a text or JSON file
    Import(ImportArgs),
    /// Write a questionnaire as text or JSON
    Export(ExportArgs),
    /// Show or change the saved client config
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
    /// Log in to the backend and keep the session tokens
    Login {
        #[arg(long)]
        username: String,
        #[arg(long, env = "TALENT_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Forget the stored session
    Logout,
    /// List records from the backend
    List(ListArgs),
    /// Submission score statistics
    Stats {
        #[arg(long)]
        questionnaire_id: Option<u64>,
    },
    /// Dashboard aggregates
    Analytics,
    /// One candidate's portrait
    Portrait {
        candidate_id: u64,
        /// Rebuild instead of serving the backend's cache
        #[arg(long)]
        refresh: bool,
        /// Use the expert analysis level
        #[arg(long)]
        expert: bool,
    },
    /// Rank scored submissions against a job profile
    Match {
        profile_id: u64,
        #[arg(long)]
        min_score: Option<f64>,
        #[arg(long)]
        limit: Option<u32>,
    },
}

#[derive(Args, Debug)]
pub(crate) struct ScoreArgs {
    /// JSON object of question id to answer
    #[arg(long)]
    pub(crate) answers: PathBuf,
    /// Built-in type to score against
    #[arg(long = "type", required_unless_present = "questionnaire")]
    pub(crate) kind: Option<String>,
    /// Questionnaire JSON, required for custom questionnaires
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
    /// Print the full result as JSON
    #[arg(long)]
    pub(crate) json: bool,
}

#[derive(Args, Debug)]
pub(crate) struct ReportArgs {
    /// Submission JSON including its scored result
    #[arg(long)]
    pub(crate) submission: PathBuf,
    /// Questionnaire JSON, used for survey question texts
    #[arg(long)]
    pub(crate) questionnaire: Option<PathBuf>,
    /// Output file; defaults to the standard report name in the current directory
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
    /// IANA time zone for displayed times
    #[arg(long, default_value = "UTC")]
    pub(crate) tz: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum FileFormat {
    Text,
    Json,
}

#[derive(Args, Debug)]
pub(crate) struct ImportArgs {
    pub(crate) file: PathBuf,
    /// Input format; guessed from the extension when omitted
    #[arg(long, value_enum)]
    pub(crate) format: Option<FileFormat>,
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Args, Debug)]
pub(crate) struct ExportArgs {
    /// Built-in type to export
    #[arg(long = "type", conflicts_with = "questionnaire")]
    pub(crate) kind: Option<String>,
    /// Questionnaire JSON to export
    #[arg(long, required_unless_present = "kind")]
    pub(crate) questionnaire: Option<PathBuf>,
    #[arg(long, value_enum, default_value = "text")]
    pub(crate) format: FileFormat,
    #[arg(long)]
    pub(crate) out: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub(crate) enum ConfigCommand {
    /// Print the effective config
    Show,
    /// Set the backend base URL
    SetBase { url: String },
    /// Turn mock fallback on or off
    SetFallback {
        #[arg(action = clap::ArgAction::Set)]
        enabled: bool,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub(crate) enum Resource {
    Questionnaires,
    Assessments,
    Submissions,
    Candidates,
    JobProfiles,
    JobPositions,
    Portraits,
}

#[derive(Args, Debug)]
pub(crate) struct ListArgs {
    #[arg(value_enum)]
    pub(crate) resource: Resource,
    /// Questionnaire category: professional, scored, survey or custom
    #[arg(long)]
    pub(crate) category: Option<String>,
    /// Candidate search keyword
    #[arg(long)]
    pub(crate) keyword: Option<String>,
    #[arg(long)]
    pub(crate) skip: Option<u32>,
    #[arg(long)]
    pub(crate) limit: Option<u32>,
}

pub(crate) async fn run(cli: Cli) -> eyre::Result<()> {
    match cli.command {
        Command::Catalog { kind } => {
            print!("{}", local::catalog_listing(kind.as_deref()));
            Ok(())
        }
        Command::Score(args) => local::score(&args),
        Command::Report(args) => local::report(&args),
        Command::Import(args) => local::import(&args),
        Command::Export(args) => local::export(&args),
        Command::Config { command } => remote::config(command),
        Command::Login { username, password } => remote::login(&username, &password).await,
        Command::Logout => remote::logout().await,
        Command::List(args) => remote::list(&args).await,
        Command::Stats { questionnaire_id } => remote::stats(questionnaire_id).await,
        Command::Analytics => remote::analytics().await,
        Command::Portrait {
            candidate_id,
            refresh,
            expert,
        } => remote::portrait(candidate_id, refresh, expert).await,
        Command::Match {
            profile_id,
            min_score,
            limit,
        } => remote::match_profile(profile_id, min_score, limit).await,
    }
}
