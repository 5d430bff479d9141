//! SevaSangam CLI - Operator tools for seeding and moderation.
//!
//! # Usage
//!
//! ```bash
//! # Seed the nine default categories (existing ids are skipped)
//! ss-cli categories seed
//!
//! # Seed from a YAML file
//! ss-cli categories seed --file categories.yaml
//!
//! # List workers awaiting review
//! ss-cli workers list --status pending
//!
//! # Approve and publish a worker
//! ss-cli workers approve worker-1718000000000-abc123def
//! ss-cli workers publish worker-1718000000000-abc123def
//!
//! # List open inquiries
//! ss-cli inquiries list --status new
//! ```
//!
//! # Environment Variables
//!
//! - `BACKEND_URL` - Marketplace backend URL (or `memory://`)
//! - `BACKEND_API_KEY` - Optional bearer token for the backend
//! - `ADMIN_USERNAME` / `ADMIN_PASSWORD` - Admin credentials

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};
use secrecy::SecretString;
use seva_sangam_core::WorkerAction;

mod commands;

use commands::{CliError, Connection};

#[derive(Parser)]
#[command(name = "ss-cli")]
#[command(author, version, about = "SevaSangam operator tools")]
struct Cli {
    /// Marketplace backend URL, or `memory://`
    #[arg(long, env = "BACKEND_URL", global = true, default_value = "memory://")]
    backend_url: String,

    /// Bearer token for the backend
    #[arg(long, env = "BACKEND_API_KEY", global = true, hide_env_values = true)]
    api_key: Option<String>,

    /// Admin username
    #[arg(short, long, env = "ADMIN_USERNAME", global = true)]
    username: Option<String>,

    /// Admin password
    #[arg(short, long, env = "ADMIN_PASSWORD", global = true, hide_env_values = true)]
    password: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage service categories
    Categories {
        #[command(subcommand)]
        action: CategoryAction,
    },
    /// Moderate workers
    Workers {
        #[command(subcommand)]
        action: WorkerCommand,
    },
    /// Review customer inquiries
    Inquiries {
        #[command(subcommand)]
        action: InquiryAction,
    },
}

#[derive(Subcommand)]
enum CategoryAction {
    /// Create categories that do not exist yet
    Seed {
        /// YAML file with a `categories` list (defaults to the built-in set)
        #[arg(short, long)]
        file: Option<String>,
    },
    /// List categories
    List,
}

#[derive(Subcommand)]
enum WorkerCommand {
    /// List workers
    List {
        /// `all` or a worker status
        #[arg(short, long, default_value = "all")]
        status: String,
    },
    /// Approve a worker
    Approve { id: String },
    /// Reject a worker
    Reject { id: String },
    /// Make an approved worker visible to customers
    Publish { id: String },
    /// Hide a worker from customers
    Unpublish { id: String },
    /// Delete a worker
    Remove { id: String },
}

#[derive(Subcommand)]
enum InquiryAction {
    /// List inquiries
    List {
        /// `all` or an inquiry status
        #[arg(short, long, default_value = "all")]
        status: String,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let conn = Connection::open(
        &cli.backend_url,
        cli.api_key.as_deref(),
        cli.username,
        cli.password.map(SecretString::from),
    )?;

    match cli.command {
        Commands::Categories { action } => match action {
            CategoryAction::Seed { file } => {
                let categories = match file {
                    Some(path) => commands::categories::load_seed_file(&path).await?,
                    None => commands::categories::default_seed(),
                };
                commands::categories::seed(&conn, categories).await?;
            }
            CategoryAction::List => commands::categories::list(&conn).await?,
        },
        Commands::Workers { action } => match action {
            WorkerCommand::List { status } => commands::workers::list(&conn, &status).await?,
            WorkerCommand::Approve { id } => {
                commands::workers::act(&conn, &id, WorkerAction::Approve).await?;
            }
            WorkerCommand::Reject { id } => {
                commands::workers::act(&conn, &id, WorkerAction::Reject).await?;
            }
            WorkerCommand::Publish { id } => {
                commands::workers::act(&conn, &id, WorkerAction::Publish).await?;
            }
            WorkerCommand::Unpublish { id } => {
                commands::workers::act(&conn, &id, WorkerAction::Unpublish).await?;
            }
            WorkerCommand::Remove { id } => {
                commands::workers::act(&conn, &id, WorkerAction::Remove).await?;
            }
        },
        Commands::Inquiries { action } => match action {
            InquiryAction::List { status } => commands::inquiries::list(&conn, &status).await?,
        },
    }
    Ok(())
}
