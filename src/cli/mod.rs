//! CLI module for Hirecrew
//!
//! Commands:
//! - `run`: interactive posting generation
//! - `quick`: generate from built-in sample inputs
//! - `train <n>`: run the pipeline repeatedly and report timings
//! - `list`: show saved postings
//! - `cleanup [days]`: remove old postings

use std::sync::Arc;

use clap::{Parser, Subcommand};
use hirecrew_core::{Config, Crew, GeneratedPosting, JobPostingRequest, OutputStore};
use hirecrew_llm::{GeminiConfig, GeminiProvider, LlmProvider};
use hirecrew_tools::{gather_web_context, SerperClient, WebScraper};
use tracing::info;

pub mod data;
pub mod run;
pub mod train;

/// Hirecrew CLI
#[derive(Parser, Debug)]
#[command(name = "hirecrew")]
#[command(about = "AI-assisted job posting generator")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Generate a job posting interactively
    Run,
    /// Generate a job posting from built-in sample inputs
    Quick,
    /// Run the pipeline repeatedly against sample inputs
    Train {
        /// Number of pipeline iterations
        iterations: u32,
    },
    /// List saved postings, newest first
    List,
    /// Remove postings older than the given number of days
    Cleanup {
        /// Age cutoff in days
        #[arg(default_value_t = 7)]
        days: u64,
    },
}

/// Run the CLI command
pub async fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Some(Commands::Run) => run::run().await,
        Some(Commands::Quick) => run::quick().await,
        Some(Commands::Train { iterations }) => train::run(iterations).await,
        Some(Commands::List) => data::list(),
        Some(Commands::Cleanup { days }) => data::cleanup(days),
        None => {
            let mut cmd = <Cli as clap::CommandFactory>::command();
            cmd.print_help()?;
            println!();
            Ok(())
        }
    }
}

/// Execute the full pipeline for one request: load config, gather web
/// context, run the crew, persist the result.
pub(crate) async fn run_pipeline(request: JobPostingRequest) -> anyhow::Result<GeneratedPosting> {
    let config = Config::from_env()?;

    let gemini = GeminiConfig::from_env()?
        .with_temperature(config.temperature)
        .with_max_output_tokens(config.max_tokens)
        .with_timeout(config.request_timeout);
    let provider: Arc<dyn LlmProvider> = Arc::new(GeminiProvider::new(gemini)?);
    let model = provider.default_model().to_string();

    let web_context = match (SerperClient::new(config.serper_api_key.clone()), WebScraper::new()) {
        (Ok(serper), Ok(scraper)) => {
            gather_web_context(&serper, &scraper, &request.company_domain, &request.hiring_needs)
                .await
        }
        _ => None,
    };

    let crew = Crew::new(provider)
        .with_retry(config.retry.clone())
        .with_temperature(config.temperature)
        .with_max_tokens(config.max_tokens);

    info!(
        company = %request.company_domain,
        needs = %request.hiring_needs,
        "starting posting pipeline"
    );
    let report = crew.kickoff(&request, web_context.as_deref()).await?;

    let store = OutputStore::new(&config.output_dir);
    let posting = store.save(&request, &report, &model)?;
    Ok(posting)
}

/// Sample inputs used by `quick` and `train`.
pub(crate) fn sample_request() -> JobPostingRequest {
    JobPostingRequest {
        company_domain: "careers.wework.com".to_string(),
        company_description: concat!(
            "WeWork provides companies of all sizes with flexible workspace ",
            "solutions and a global community of members."
        )
        .to_string(),
        hiring_needs: "Senior Software Engineer, full time, remote friendly".to_string(),
        specific_benefits: concat!(
            "Competitive salary, equity, health coverage, flexible work ",
            "arrangements, professional development budget"
        )
        .to_string(),
    }
}
