//! sgms - staffing console from the terminal.
//!
//! Logs in through a portal, keeps the session on disk between runs and
//! issues authenticated calls through the same gateway the UI uses.

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};

use sgms_auth::Portal;
use sgms_client::{ClientConfig, Console};

mod commands;

/// sgms - security guard staffing console
#[derive(Parser, Debug)]
#[command(name = "sgms")]
#[command(version, about, long_about = None)]
struct Cli {
    /// Backend API base URL (overrides SGMS_API_BASE_URL)
    #[arg(long)]
    api_url: Option<String>,

    /// Session file (overrides SGMS_SESSION_FILE)
    #[arg(long)]
    session_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Log in through a portal
    Login {
        /// admin, manager, client or guard
        #[arg(long, default_value = "client", value_parser = parse_portal)]
        portal: Portal,

        email: String,

        #[arg(long, env = "SGMS_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Show the stored identity
    Whoami,

    /// Forget the stored session
    Logout,

    /// Run the route guard for a path
    Check { path: String },

    Get { path: String },

    Delete { path: String },

    Post { path: String, body: String },

    Put { path: String, body: String },

    Patch { path: String, body: String },
}

fn parse_portal(name: &str) -> Result<Portal, String> {
    Ok(Portal::from_name(name))
}

#[tokio::main]
async fn main() -> ExitCode {
    sgms_observability::init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = cli.api_url {
        config = config.with_api_base_url(url)?;
    }
    if let Some(path) = cli.session_file {
        config = config.with_session_file(path);
    }

    let console = Console::bootstrap(config)?;

    match cli.command {
        Commands::Login {
            portal,
            email,
            password,
        } => commands::login(&console, portal, &email, password).await,
        Commands::Whoami => commands::whoami(&console),
        Commands::Logout => commands::logout(&console),
        Commands::Check { path } => commands::check(&console, &path),
        Commands::Get { path } => commands::print(console.api().get(&path).await?),
        Commands::Delete { path } => commands::print(console.api().delete(&path).await?),
        Commands::Post { path, body } => {
            commands::print(console.api().post(&path, &commands::parse_body(&body)?).await?)
        }
        Commands::Put { path, body } => {
            commands::print(console.api().put(&path, &commands::parse_body(&body)?).await?)
        }
        Commands::Patch { path, body } => {
            commands::print(console.api().patch(&path, &commands::parse_body(&body)?).await?)
        }
    }
}
