//! # marginalia CLI
//!
//! Command-line access to the marginalia filter pipeline and comment
//! screening.

mod commands;

use clap::{Parser, Subcommand};
use marginalia_core::Environment;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "marginalia")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to configuration file
    #[arg(long, global = true, default_value = "marginalia.yml")]
    config: PathBuf,

    /// Runtime environment (overrides the configuration file)
    #[arg(long = "env", global = true, env = "MARGINALIA_ENV", value_parser = parse_environment)]
    environment: Option<Environment>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render text through a filter chain and print the HTML
    Render {
        /// Filter chain, e.g. "markdown, sanitize"
        #[arg(long, short, default_value = marginalia_types::DEFAULT_FILTER)]
        filter: String,

        /// Input file ("-" or omitted reads stdin)
        input: Option<PathBuf>,
    },

    /// List the available transforms
    Filters {
        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load the configuration and resolve every configured filter chain
    CheckConfig,

    /// Classify a comment record and write the result back
    Classify {
        /// Comment record (JSON)
        comment: PathBuf,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Mark a comment record as spam and report it to the reputation service
    ReportSpam {
        /// Comment record (JSON)
        comment: PathBuf,
    },

    /// Check the reputation service accepts the configured API key
    VerifyKey,
}

fn parse_environment(value: &str) -> Result<Environment, String> {
    Environment::from_str(value)
        .ok_or_else(|| format!("expected development, test or production, got `{value}`"))
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Initialize tracing; stdout is reserved for command output
    let subscriber = tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(if cli.verbose {
                tracing::Level::DEBUG.into()
            } else {
                tracing::Level::INFO.into()
            }),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let opts = commands::GlobalOptions {
        config: cli.config,
        environment: cli.environment,
    };

    match cli.command {
        Commands::Render { filter, input } => {
            commands::render_text(&opts, &filter, input.as_deref())
        }
        Commands::Filters { json } => commands::list_filters(json),
        Commands::CheckConfig => commands::check_config(&opts),
        Commands::Classify { comment, json } => {
            commands::classify_comment(&opts, &comment, json).await
        }
        Commands::ReportSpam { comment } => commands::report_spam(&opts, &comment).await,
        Commands::VerifyKey => commands::verify_key(&opts).await,
    }
}
