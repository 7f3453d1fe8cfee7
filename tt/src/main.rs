//! TaskTracker CLI entry point

use std::fs;
use std::path::PathBuf;

use clap::Parser;
use eyre::{Context, Result};
use tracing::info;

use tasktracker::cli::{Cli, Command, OutputFormat};
use tasktracker::config::Config;
use tasktracker::llm::create_client;
use tasktracker::repl::ReplSession;
use tasktracker::suggest;

fn setup_logging(verbose: bool) -> Result<()> {
    // Log to a file, not stdout/stderr - the REPL owns the terminal
    let log_dir = dirs::data_local_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("tasktracker")
        .join("logs");

    fs::create_dir_all(&log_dir).context("Failed to create log directory")?;

    let level = if verbose { tracing::Level::DEBUG } else { tracing::Level::INFO };
    let log_file = fs::File::create(log_dir.join("tasktracker.log")).context("Failed to create log file")?;

    tracing_subscriber::fmt()
        .with_writer(log_file)
        .with_ansi(false)
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env().add_directive(level.into()))
        .init();

    info!("Logging initialized (verbose: {})", verbose);
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose).context("Failed to setup logging")?;

    let config = Config::load(cli.config.as_ref()).context("Failed to load configuration")?;

    info!(
        "TaskTracker loaded config: provider={}, model={}",
        config.llm.provider, config.llm.model
    );

    match cli.command {
        Some(Command::Suggest {
            message,
            assistant,
            format,
        }) => cmd_suggest(&message, assistant.as_deref(), format),
        Some(Command::Chat { message }) => cmd_chat(&config, message).await,
        None => cmd_chat(&config, None).await,
    }
}

/// Start the interactive chat + board session
async fn cmd_chat(config: &Config, initial_message: Option<String>) -> Result<()> {
    config.validate()?;

    let client = create_client(&config.llm).context("Failed to create completion client")?;
    let mut repl = ReplSession::new(client, config);
    repl.run(initial_message).await
}

/// Run the extractor once and print the candidates
fn cmd_suggest(message: &str, assistant: Option<&str>, format: OutputFormat) -> Result<()> {
    let candidates = suggest::extract(message, assistant.unwrap_or(""));

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&candidates)?);
        }
        OutputFormat::Text => {
            if candidates.is_empty() {
                println!("No task suggestions detected.");
            }
            for task in candidates {
                println!("{} ({} priority)", task.title, task.priority);
                if let Some(field) = &task.field {
                    println!("  field: {}", field);
                }
                if let Some(deadline) = task.deadline {
                    println!("  due: {}", deadline.format("%Y-%m-%d"));
                }
            }
        }
    }
    Ok(())
}
