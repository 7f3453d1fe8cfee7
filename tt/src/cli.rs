//! CLI command definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

/// TaskTracker - chat-assisted kanban task management
#[derive(Parser)]
#[command(
    name = "tasktracker",
    about = "AI-powered task management made simple",
    version,
    after_help = "Logs are written to: ~/.local/share/tasktracker/logs/tasktracker.log"
)]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true, help = "Path to config file")]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Command>,
}

/// CLI subcommands
#[derive(Subcommand)]
pub enum Command {
    /// Start the interactive chat + board session (the default)
    Chat {
        /// Message to send as soon as the session starts
        message: Option<String>,
    },

    /// Run the suggestion extractor on a message (for development/testing)
    Suggest {
        /// The user message to extract from
        message: String,

        /// Paired assistant reply text
        #[arg(short, long)]
        assistant: Option<String>,

        /// Output format
        #[arg(short, long, default_value = "text")]
        format: OutputFormat,
    },
}

/// Output format for the suggest command
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}
