#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Command-line entry point for the ois-map toolchain.
//!
//! `serve` runs the API server, `list` prints the incident sidebar and
//! `show` prints one incident's detail popup. Without a subcommand the
//! user picks a tool interactively.

mod render;

use std::io::Write;

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use dialoguer::{Input, Select};
use ois_map_server::ServerConfig;
use ois_map_source::IncidentSource;
use ois_map_source::socrata::SocrataSource;
use ois_map_view::Selection;
use ois_map_view::page::PageState;
use ois_map_view::popup::PopupContent;

#[derive(Debug, thiserror::Error)]
enum CliError {
    /// No incident carries the requested case number.
    #[error("No incident with case number {0}")]
    CaseNotFound(String),

    /// The upstream fetch failed.
    #[error("{0}")]
    Load(String),
}

#[derive(Parser)]
#[command(name = "ois_map", about = "Officer-involved shooting map toolchain")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the API server
    Serve {
        /// Address to bind (overrides `BIND_ADDR`)
        #[arg(long)]
        bind: Option<String>,
        /// Port to listen on (overrides `PORT`)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print the incident list, newest first
    List {
        /// Maximum number of rows to print
        #[arg(long)]
        limit: Option<usize>,
    },
    /// Print the details of one incident
    Show {
        /// Case number (e.g., "2023-000123")
        case_number: String,
    },
}

/// Top-level tool selection for interactive mode.
enum Tool {
    Server,
    List,
    Show,
}

impl Tool {
    const ALL: &[Self] = &[Self::Server, Self::List, Self::Show];

    #[must_use]
    const fn label(&self) -> &'static str {
        match self {
            Self::Server => "Start server",
            Self::List => "List incidents",
            Self::Show => "Show incident details",
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    pretty_env_logger::init_custom_env("RUST_LOG");
    let cli = Cli::parse();

    let Some(command) = cli.command else {
        return run_interactive().await;
    };

    match command {
        Commands::Serve { bind, port } => {
            let defaults = ServerConfig::from_env();
            let config = ServerConfig {
                bind_addr: bind.unwrap_or(defaults.bind_addr),
                port: port.unwrap_or(defaults.port),
            };
            // The server uses actix-web's runtime, so we need to run it
            // in a blocking task to avoid nesting tokio runtimes.
            tokio::task::spawn_blocking(move || {
                actix_web::rt::System::new().block_on(ois_map_server::run_server(config))
            })
            .await??;
        }
        Commands::List { limit } => list(limit).await?,
        Commands::Show { case_number } => show(&case_number).await?,
    }

    Ok(())
}

async fn load() -> PageState {
    let source = SocrataSource::default();
    log::info!("Loading incidents from {}", source.name());
    PageState::from_result(source.fetch_incidents().await)
}

async fn list(limit: Option<usize>) -> std::io::Result<()> {
    let state = load().await;
    print_list(&state, Utc::now(), limit, &mut std::io::stdout().lock())
}

/// Writes the list page. A failed load is reported by the error view
/// alone, not also as an error.
fn print_list(
    state: &PageState,
    now: DateTime<Utc>,
    limit: Option<usize>,
    out: &mut impl Write,
) -> std::io::Result<()> {
    writeln!(
        out,
        "{}",
        render::render_page(state, &Selection::None, now, limit)
    )
}

async fn show(case_number: &str) -> Result<(), CliError> {
    let incidents = match load().await {
        PageState::Ready { incidents } => incidents,
        PageState::Failed { message } => return Err(CliError::Load(message)),
        PageState::Loading => return Ok(()),
    };

    let incident = render::find_case(&incidents, case_number)
        .ok_or_else(|| CliError::CaseNotFound(case_number.to_string()))?;
    println!("{}", PopupContent::from_incident(incident));
    if let Some(narrative) = &incident.narrative {
        println!("\n{narrative}");
    }
    Ok(())
}

async fn run_interactive() -> Result<(), Box<dyn std::error::Error>> {
    println!("OIS Map Toolchain");
    println!();

    let labels: Vec<&str> = Tool::ALL.iter().map(Tool::label).collect();

    let idx = Select::new()
        .with_prompt("What would you like to do?")
        .items(&labels)
        .default(0)
        .interact()?;

    match Tool::ALL[idx] {
        Tool::Server => {
            tokio::task::spawn_blocking(|| {
                actix_web::rt::System::new().block_on(ois_map_server::interactive::run())
            })
            .await??;
        }
        Tool::List => list(None).await?,
        Tool::Show => {
            let case_number: String = Input::new().with_prompt("Case number").interact_text()?;
            show(case_number.trim()).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failed_list_prints_error_view_once() {
        let state = PageState::Failed {
            message: "Failed to fetch data: 503 Service Unavailable".to_string(),
        };
        let mut out = Vec::new();

        print_list(&state, Utc::now(), None, &mut out).unwrap();

        let out = String::from_utf8(out).unwrap();
        assert_eq!(out.matches("503 Service Unavailable").count(), 1);
        assert!(out.contains("Error Loading Data"));
    }

    #[test]
    fn ready_list_prints_header() {
        let state = PageState::Ready { incidents: vec![] };
        let mut out = Vec::new();

        print_list(&state, Utc::now(), None, &mut out).unwrap();

        assert!(String::from_utf8(out).unwrap().starts_with("Recent Incidents (0)"));
    }
}
