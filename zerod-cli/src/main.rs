//! Zerod CLI
//!
//! Command-line interface for sending signed, encrypted requests to the
//! zerod API and inspecting the local device profile.

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use zerod_client::config::ClientConfig;
use zerod_client::signature::KeySchedule;
use zerod_client::HttpMethod;

mod commands;
mod ui;

#[derive(Parser)]
#[command(name = "zerod")]
#[command(about = "Zerod CLI - send signed and encrypted requests to the zerod API", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Custom profile directory (device id and session credential)
    #[arg(long, global = true)]
    storage_dir: Option<String>,

    /// API base URL (overrides ZEROD_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,

    /// Request timeout in seconds (overrides ZEROD_TIMEOUT_SECS)
    #[arg(long, global = true)]
    timeout: Option<u64>,

    /// Encryption key schedule: separated or legacy (overrides ZEROD_KEY_SCHEDULE)
    #[arg(long, global = true)]
    key_schedule: Option<KeySchedule>,

    /// JSON file with the browser environment to sign with
    #[arg(long, global = true)]
    environment: Option<PathBuf>,

    /// Log decrypted responses and failure bodies
    #[arg(long, global = true)]
    dev: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Send an encrypted request to an API event
    Send {
        /// Event name (last URL path segment)
        event: String,

        /// Request parameter as key=value (repeatable, JSON values allowed)
        #[arg(short, long = "param")]
        param: Vec<String>,

        /// Request parameters as a JSON object
        #[arg(long)]
        json: Option<String>,

        /// HTTP method (GET, POST, PUT, DELETE)
        #[arg(short, long, default_value = "POST")]
        method: HttpMethod,
    },

    /// Sign in and store the returned credential
    Login {
        /// Login parameter as key=value (repeatable)
        #[arg(short, long = "param")]
        param: Vec<String>,

        /// Login parameters as a JSON object
        #[arg(long)]
        json: Option<String>,
    },

    /// Manage the stored session credential
    Session {
        #[command(subcommand)]
        action: SessionAction,
    },

    /// Show the persisted device identifier
    DeviceId {
        /// Forget the current identifier and generate a new one
        #[arg(long)]
        reset: bool,
    },

    /// Show the environment fingerprint sent as the Signature header
    Signature,

    /// Show the effective configuration
    Config,
}

#[derive(Subcommand)]
enum SessionAction {
    /// Show the stored credential
    Show,

    /// Store a credential obtained elsewhere
    Set {
        /// Access token
        token: String,

        /// Account id
        id: String,
    },

    /// Remove the stored credential
    Clear,
}

fn resolve_config(cli: &Cli) -> Result<ClientConfig> {
    let mut config = ClientConfig::from_env()?;
    if let Some(url) = &cli.api_url {
        config.base_url = url.clone();
    }
    if let Some(secs) = cli.timeout {
        config.timeout_secs = Some(secs);
    }
    if let Some(schedule) = cli.key_schedule {
        config.key_schedule = schedule;
    }
    if cli.dev {
        config.dev_mode = true;
    }
    config.validate()?;
    Ok(config)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    if cli.verbose || cli.dev {
        tracing_subscriber::fmt()
            .with_env_filter("zerod=debug,zerod_client=debug")
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter("zerod=info,zerod_client=warn")
            .init();
    }

    // Setup storage directory
    let storage_dir = if let Some(dir) = &cli.storage_dir {
        PathBuf::from(dir)
    } else {
        dirs::data_local_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("zerod")
    };

    let ctx = commands::Context {
        config: resolve_config(&cli)?,
        storage_dir,
        environment_file: cli.environment.clone(),
        verbose: cli.verbose,
    };

    match &cli.command {
        Commands::Send {
            event,
            param,
            json,
            method,
        } => commands::send::run(&ctx, event, param, json.as_deref(), *method).await,
        Commands::Login { param, json } => {
            commands::session::login(&ctx, param, json.as_deref()).await
        }
        Commands::Session { action } => match action {
            SessionAction::Show => commands::session::show(&ctx),
            SessionAction::Set { token, id } => commands::session::set(&ctx, token, id),
            SessionAction::Clear => commands::session::clear(&ctx),
        },
        Commands::DeviceId { reset } => commands::device::run(&ctx, *reset),
        Commands::Signature => commands::signature::run(&ctx),
        Commands::Config => commands::config::show(&ctx),
    }
}
