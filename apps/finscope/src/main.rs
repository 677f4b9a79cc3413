//! # Finscope - Finance Maturity Assessment
//!
//! The main binary for the Finscope assessment engine.
//!
//! This application provides:
//! - HTTP REST API server (axum-based)
//! - CLI interface for scoring and browsing the stage table
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                   apps/finscope (THE BINARY)                │
//! │                                                             │
//! │  ┌─────────────┐    ┌─────────────┐    ┌────────────────┐  │
//! │  │   CLI       │    │   HTTP API  │    │    Config      │  │
//! │  │  (clap)     │    │   (axum)    │    │ (toml + env)   │  │
//! │  └──────┬──────┘    └──────┬──────┘    └───────┬────────┘  │
//! │         │                  │                   │           │
//! │         └──────────────────┼───────────────────┘           │
//! │                            ▼                               │
//! │                   ┌────────────────┐                       │
//! │                   │ finscope-core  │                       │
//! │                   │  (THE LOGIC)   │                       │
//! │                   └────────────────┘                       │
//! └─────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```bash
//! # Start the HTTP server
//! finscope server --host 0.0.0.0 --port 8080
//!
//! # CLI operations
//! finscope stages
//! finscope questions
//! finscope score -a excel-chaos=3 -a erp-reality=2
//! ```

use clap::Parser;
use finscope::cli;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

// =============================================================================
// APPLICATION ENTRY POINT
// =============================================================================

#[tokio::main]
async fn main() {
    // FINSCOPE_LOG_FORMAT=json enables machine-parseable output.
    let log_format = std::env::var("FINSCOPE_LOG_FORMAT").unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "finscope=info,finscope_core=info,tower_http=debug".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }

    let cli = cli::Cli::parse();

    if !cli.quiet && !cli.json_mode {
        print_banner();
    }

    if let Err(e) = cli::execute(cli).await {
        tracing::error!("Error: {}", e);
        std::process::exit(1);
    }
}

/// Print the Finscope startup banner.
fn print_banner() {
    println!(
        r#"
  ███████╗██╗███╗   ██╗███████╗ ██████╗ ██████╗ ██████╗ ███████╗
  ██╔════╝██║████╗  ██║██╔════╝██╔════╝██╔═══██╗██╔══██╗██╔════╝
  █████╗  ██║██╔██╗ ██║███████╗██║     ██║   ██║██████╔╝█████╗
  ██╔══╝  ██║██║╚██╗██║╚════██║██║     ██║   ██║██╔═══╝ ██╔══╝
  ██║     ██║██║ ╚████║███████║╚██████╗╚██████╔╝██║     ███████╗
  ╚═╝     ╚═╝╚═╝  ╚═══╝╚══════╝ ╚═════╝ ╚═════╝ ╚═╝     ╚══════╝

  Finance Maturity Assessment v{}

  Answer • Score • Improve
"#,
        env!("CARGO_PKG_VERSION")
    );
}
