//! Command-line front end: one-shot commands plus the interactive wizard.

use std::io::IsTerminal;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::{Args, Parser, Subcommand};
use serde_json::Value;
use tracing::info;

use crate::api_client::{ApiClient, JobDescription, TailorApi};
use crate::config::Config;
use crate::errors::TailorError;
use crate::models::{HighlightRef, MinScore};
use crate::render::{self, Emphasis};
use crate::workflow::download::{self, DEFAULT_FILE_NAME};
use crate::workflow::{Action, Dispatch, Router, StepId, StepOutput, WizardState};

pub mod repl;

#[derive(Debug, Parser)]
#[command(
    name = "tailor",
    author,
    version,
    about = "Tailor a resume to a job description through the resume-tailoring service."
)]
pub struct Cli {
    /// Tailoring service URL (overrides TAILOR_API_URL)
    #[arg(long, global = true)]
    pub api_url: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run extract, match, transform and download in one go
    Run(RunArgs),

    /// Step through the wizard interactively
    Wizard,

    /// Extract skills from a job description and print them as JSON
    Extract {
        #[command(flatten)]
        job: JobArgs,
    },

    /// Ask for an alternative wording of one bullet point
    Alternative {
        /// The bullet point to rewrite
        #[arg(long)]
        bullet: String,

        /// Skill to emphasize (repeatable)
        #[arg(long = "skill")]
        skills: Vec<String>,
    },
}

#[derive(Debug, Args)]
pub struct JobArgs {
    /// Job description text (wins over --job-file when both are given)
    #[arg(long)]
    pub job_text: Option<String>,

    /// File holding the job description
    #[arg(long)]
    pub job_file: Option<PathBuf>,
}

#[derive(Debug, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub job: JobArgs,

    /// Resume as JSON
    #[arg(long)]
    pub resume: PathBuf,

    /// Only bullets scoring at least this much are transformed (1-10)
    #[arg(long)]
    pub min_score: Option<u8>,

    /// Leave this transformed bullet out, e.g. exp:0:2 (repeatable)
    #[arg(long = "drop")]
    pub dropped: Vec<HighlightRef>,

    /// Replace this transformed bullet with a generated alternative (repeatable)
    #[arg(long = "alternative")]
    pub alternatives: Vec<HighlightRef>,

    /// Where to write the tailored resume
    #[arg(long, short, default_value = DEFAULT_FILE_NAME)]
    pub out: PathBuf,
}

pub async fn execute(cli: Cli, config: Config) -> Result<()> {
    let api_url = cli.api_url.unwrap_or_else(|| config.api_url.clone());
    let client = ApiClient::new(&api_url, config.http_timeout_secs.map(Duration::from_secs))?;
    info!("Using tailoring service at {}", client.base_url());

    let min_score = MinScore::new(config.min_score)?;
    let emphasis = if std::io::stdout().is_terminal() {
        Emphasis::Ansi
    } else {
        Emphasis::Markdown
    };

    match cli.command {
        Command::Run(args) => {
            let router = Router::new(Arc::new(client));
            run(&router, min_score, args, emphasis).await
        }
        Command::Wizard => {
            let router = Router::new(Arc::new(client));
            repl::run_wizard(&router, min_score, emphasis).await
        }
        Command::Extract { job } => {
            let job = JobDescription::from_inputs(job.job_text.as_deref(), job.job_file.as_deref())
                .await?;
            let skills = client
                .extract(&job)
                .await
                .map_err(|e| anyhow!(TailorError::from(e).user_message(StepId::Extract)))?;
            println!("{}", serde_json::to_string_pretty(&skills)?);
            Ok(())
        }
        Command::Alternative { bullet, skills } => {
            let alternative = client
                .alternative(&bullet, &skills)
                .await
                .map_err(|e| anyhow!(TailorError::from(e).user_message(StepId::Alternative)))?;
            println!("{alternative}");
            Ok(())
        }
    }
}

async fn run(router: &Router, min_score: MinScore, args: RunArgs, emphasis: Emphasis) -> Result<()> {
    let job =
        JobDescription::from_inputs(args.job.job_text.as_deref(), args.job.job_file.as_deref())
            .await?;
    let resume = read_resume(&args.resume).await?;

    let mut state = WizardState::new(min_score);
    if let Some(score) = args.min_score {
        state = state.with_min_score(MinScore::new(score)?);
    }

    state = step(router, &state, Action::Extract(job)).await?.state;
    if let Some(skills) = state.extracted_skills() {
        print!("{}", render::skills(skills));
    }

    state = step(router, &state, Action::Match(resume)).await?.state;
    if let Some(scored) = state.scored_resume() {
        print!("{}", render::scores(scored, state.min_score()));
    }

    state = step(router, &state, Action::Transform).await?.state;
    for target in args.alternatives {
        state = step(router, &state, Action::Alternative(target)).await?.state;
    }
    for target in args.dropped {
        state = state.with_toggle(target, false)?;
    }
    if let Some(transformed) = state.transformed_resume() {
        print!(
            "{}",
            render::transformed(transformed, |at| state.is_kept(at), emphasis)
        );
    }

    let dispatch = step(router, &state, Action::Download).await?;
    save_document(&dispatch, &args.out).await?;
    println!("Tailored resume written to {}", args.out.display());
    Ok(())
}

/// Dispatches one action, turning a failure into the user-facing message.
pub(crate) async fn step(
    router: &Router,
    state: &WizardState,
    action: Action,
) -> Result<Dispatch> {
    let step = action.step();
    router
        .dispatch(state, action)
        .await
        .map_err(|e| anyhow!(e.user_message(step)))
}

pub(crate) async fn save_document(dispatch: &Dispatch, path: &Path) -> Result<()> {
    match &dispatch.output {
        StepOutput::Downloaded(document) => {
            download::save(path, document).await?;
            Ok(())
        }
        other => Err(anyhow!("{} produced no document", other.step())),
    }
}

/// Reads and parses a resume file. Invalid JSON is reported before any call is made.
pub(crate) async fn read_resume(path: &Path) -> Result<Value, TailorError> {
    let raw = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&raw)
        .map_err(|e| TailorError::Validation(format!("Invalid resume JSON format: {e}")))
}
