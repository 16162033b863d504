//! Jira triage CLI - classify Jira issues with a language model.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use jira_triage::analysis::Vocabulary;
use jira_triage::config::{Config, Overrides};
use jira_triage::paginator::{PageConfig, COMPLEXITY_PAGE_SIZE, DEFAULT_PAGE_SIZE};
use jira_triage::pipeline::{ComplexityField, Mode, Pipeline, PipelineConfig};
use jira_triage::{ConfigError, JiraClient};
use llm::{AIProvider, OpenAIProvider};

/// Jira triage - classify issues with an LLM and write the result back.
///
/// Connection settings fall back to JIRA_URL, JIRA_EMAIL, JIRA_API_TOKEN,
/// OPENAI_API_KEY, OPENAI_MODEL and JQL_QUERY when not given as flags.
#[derive(Parser)]
#[command(name = "jira-triage")]
#[command(about = "Classify Jira issues with an LLM")]
#[command(version)]
pub struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Jira URL (e.g., https://your-jira-instance.atlassian.net)
    #[arg(long, global = true)]
    jira_url: Option<String>,

    /// Jira account email (enables basic auth)
    #[arg(long, global = true)]
    jira_email: Option<String>,

    /// Jira API token for authentication
    #[arg(long, global = true)]
    jira_api_token: Option<String>,

    /// OpenAI API key
    #[arg(long, global = true)]
    openai_api_key: Option<String>,

    /// AI model to use
    #[arg(long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Tag issues with domain and technology labels
    Labels {
        /// JQL query to fetch issues
        query: Option<String>,

        /// Issues requested per search page
        #[arg(long, default_value_t = DEFAULT_PAGE_SIZE)]
        page_size: usize,

        /// Also remove labels from retired taxonomies
        #[arg(long)]
        purge_legacy: bool,

        /// Restrict the domains offered to the model (comma-separated)
        #[arg(long, value_delimiter = ',')]
        domains: Option<Vec<String>>,

        /// Restrict the technologies offered to the model (comma-separated)
        #[arg(long, value_delimiter = ',')]
        technologies: Option<Vec<String>>,
    },

    /// Score issue complexity (first page of results only)
    Complexity {
        /// JQL query to fetch issues
        query: Option<String>,

        /// Issues requested in the single search page
        #[arg(long, default_value_t = COMPLEXITY_PAGE_SIZE)]
        page_size: usize,

        /// Custom field receiving the score; scores are only logged when unset
        #[arg(long, env = "JIRA_COMPLEXITY_FIELD")]
        complexity_field: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if cli.verbose {
            EnvFilter::new("jira_triage=debug,llm=debug,info")
        } else {
            EnvFilter::new("jira_triage=info,llm=info,warn")
        }
    });

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Main execution failed: {e:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let query = match &cli.command {
        Commands::Labels { query, .. } | Commands::Complexity { query, .. } => query.clone(),
    };

    let config = Config::from_env().with_overrides(Overrides {
        jira_url: cli.jira_url,
        jira_email: cli.jira_email,
        jira_api_token: cli.jira_api_token,
        jql_query: query,
        openai_api_key: cli.openai_api_key,
        model: cli.model,
    });
    config.validate()?;
    tracing::debug!(?config, "Resolved configuration");

    let pipeline_config = pipeline_config(cli.command, &config.model)?;

    let tracker = JiraClient::new(&config.jira_url, config.email(), &config.jira_api_token)
        .context("Failed to create Jira client")?;
    let provider = OpenAIProvider::new(config.openai_api_key.clone());
    if !provider.is_configured() {
        tracing::warn!("OPENAI_API_KEY not set, every classification will fall back");
    }

    let pipeline = Pipeline::new(pipeline_config, Arc::new(tracker), Arc::new(provider));
    let summary = pipeline.run(&config.jql_query).await?;
    for err in &summary.errors {
        tracing::warn!(error = %err, "Issue not processed");
    }

    Ok(())
}

fn pipeline_config(command: Commands, model: &str) -> Result<PipelineConfig, ConfigError> {
    let config = match command {
        Commands::Labels {
            page_size,
            purge_legacy,
            domains,
            technologies,
            ..
        } => {
            let (vocabulary, unknown) =
                Vocabulary::subset(domains.as_deref(), technologies.as_deref());
            if !unknown.is_empty() {
                tracing::warn!(?unknown, "Ignoring labels outside the vocabulary");
            }
            PipelineConfig {
                mode: Mode::Labels {
                    vocabulary,
                    controlled: Vocabulary::controlled_labels(purge_legacy),
                },
                paging: PageConfig {
                    page_size: non_zero(page_size)?,
                    max_pages: None,
                },
                model: model.to_string(),
            }
        }
        Commands::Complexity {
            page_size,
            complexity_field,
            ..
        } => PipelineConfig {
            mode: Mode::Complexity {
                field: ComplexityField::from_option(complexity_field),
            },
            paging: PageConfig::single(non_zero(page_size)?),
            model: model.to_string(),
        },
    };
    Ok(config)
}

fn non_zero(page_size: usize) -> Result<usize, ConfigError> {
    if page_size == 0 {
        return Err(ConfigError::ZeroPageSize);
    }
    Ok(page_size)
}
