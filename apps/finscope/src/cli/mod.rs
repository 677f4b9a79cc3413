//! # Finscope CLI Module
//!
//! This module implements the CLI interface for Finscope.
//!
//! ## Available Commands
//!
//! - `server` - Start the HTTP server
//! - `score` - Score answers from a file or the command line
//! - `stages` - Show the stage table
//! - `questions` - Show the questionnaire

mod commands;

use crate::config::FinscopeConfig;
use clap::{Parser, Subcommand};
use finscope_core::FinscopeError;
use std::path::PathBuf;

pub use commands::*;

// =============================================================================
// CLI STRUCTURE
// =============================================================================

/// Finscope - Finance Maturity Assessment
///
/// Scores a short finance questionnaire into one of five maturity stages.
#[derive(Parser, Debug)]
#[command(name = "finscope")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Suppress banner output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output in JSON format (for programmatic access)
    #[arg(long, global = true)]
    pub json_mode: bool,

    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Subcommand to execute
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start HTTP server
    Server {
        /// Host to bind to (overrides the config file)
        #[arg(short = 'H', long)]
        host: Option<String>,

        /// Port to bind to (overrides the config file)
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// Score an answer set
    Score {
        /// JSON file holding an answer set (`{"question": ["option", ...]}`)
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Selection as QUESTION=OPTION (repeatable)
        #[arg(short, long = "answer")]
        answers: Vec<String>,
    },

    /// Show the stage table
    Stages {
        /// Show only this stage (out-of-range numbers show stage 1)
        #[arg(short, long)]
        stage: Option<i64>,
    },

    /// Show the questionnaire
    Questions,
}

// =============================================================================
// COMMAND EXECUTION
// =============================================================================

/// Execute the CLI with parsed arguments.
pub async fn execute(cli: Cli) -> Result<(), FinscopeError> {
    let json_mode = cli.json_mode;

    match cli.command {
        Some(Commands::Server { host, port }) => {
            let mut config = FinscopeConfig::load(cli.config.as_deref())?;
            if let Some(host) = host {
                config.server.host = host;
            }
            if let Some(port) = port {
                config.server.port = port;
            }
            cmd_server(config).await
        }
        Some(Commands::Score { file, answers }) => {
            cmd_score(json_mode, cli.verbose, file.as_deref(), &answers)
        }
        Some(Commands::Stages { stage }) => cmd_stages(json_mode, stage),
        Some(Commands::Questions) => cmd_questions(json_mode),
        None => {
            // No subcommand - show the stage table by default
            cmd_stages(json_mode, None)
        }
    }
}
