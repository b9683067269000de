//! Booking ops CLI - database maintenance, role claims and smoke tests.
//!
//! # Usage
//!
//! ```bash
//! # Inspect the database
//! bo-cli db collections
//! bo-cli db counts
//! bo-cli db sample bookings --limit 3
//! bo-cli db find users --field email --value owner@example.com
//! bo-cli db categories
//!
//! # Empty the configured collections (CLEAR_COLLECTIONS)
//! bo-cli db clear --yes
//!
//! # Attach role claims
//! bo-cli roles assign --assign owner@example.com=admin --file roles.yaml
//!
//! # Smoke tests
//! bo-cli webhook booking
//! bo-cli webhook email-hook --base-url http://localhost:3000
//! ```
//!
//! Every command exits with code 1 on failure.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use bookingops_admin::OpsError;
use bookingops_admin::identity::RoleAssignment;
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;

#[derive(Parser)]
#[command(name = "bo-cli")]
#[command(author, version, about = "Booking application ops tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Inspect and maintain database collections
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
    /// Manage identity-provider role claims
    Roles {
        #[command(subcommand)]
        action: RolesAction,
    },
    /// Smoke-test webhook endpoints
    Webhook {
        #[command(subcommand)]
        target: WebhookTarget,
    },
}

#[derive(Subcommand)]
enum DbAction {
    /// List collections
    Collections,
    /// Count documents in every collection
    Counts,
    /// Print a few documents from a collection
    Sample {
        /// Collection name
        collection: String,

        /// Maximum number of documents
        #[arg(short, long, default_value_t = 5)]
        limit: u32,
    },
    /// Find documents by exact field value
    Find {
        /// Collection name
        collection: String,

        /// Field to match
        #[arg(short, long)]
        field: String,

        /// Value to match
        #[arg(short, long)]
        value: String,
    },
    /// List categories
    Categories,
    /// Delete every document in the given collections
    Clear {
        /// Collection to empty (repeatable, defaults to CLEAR_COLLECTIONS)
        #[arg(short, long = "collection")]
        collections: Vec<String>,

        /// Actually delete; without this only the counts are shown
        #[arg(long)]
        yes: bool,
    },
}

#[derive(Subcommand)]
enum RolesAction {
    /// Set the role claim of one or more users
    Assign {
        /// `email=role` pair (repeatable)
        #[arg(short, long = "assign", value_name = "EMAIL=ROLE")]
        assignments: Vec<RoleAssignment>,

        /// YAML file with `{ email, role }` entries
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

#[derive(Subcommand)]
enum WebhookTarget {
    /// POST a sample booking to the booking webhook
    Booking {
        /// Webhook URL (defaults to BOOKING_WEBHOOK_URL)
        #[arg(long)]
        url: Option<String>,
    },
    /// Run the email-hook API checks
    EmailHook {
        /// API base URL (defaults to EMAIL_HOOK_API_URL)
        #[arg(long)]
        base_url: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    init_tracing();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        tracing::error!(error = %e, "Command failed");
        bookingops_admin::console::log_error("command failed", &e);
        std::process::exit(1);
    }
}

/// Text logs by default, JSON with `LOG_FORMAT=json`.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "bookingops_admin=info,bo_cli=info".into());

    let is_json = std::env::var("LOG_FORMAT").is_ok_and(|f| f.eq_ignore_ascii_case("json"));
    let json_layer = is_json.then(|| tracing_subscriber::fmt::layer().json().flatten_event(true));
    let text_layer = (!is_json).then(tracing_subscriber::fmt::layer);

    tracing_subscriber::registry()
        .with(env_filter)
        .with(json_layer)
        .with(text_layer)
        .init();
}

async fn run(cli: Cli) -> Result<(), OpsError> {
    match cli.command {
        Commands::Db { action } => {
            let pool = commands::db::connect().await?;
            let result = match action {
                DbAction::Collections => commands::db::collections(&pool).await,
                DbAction::Counts => commands::db::counts(&pool).await,
                DbAction::Sample { collection, limit } => {
                    commands::db::sample(&pool, &collection, limit).await
                }
                DbAction::Find {
                    collection,
                    field,
                    value,
                } => commands::db::find(&pool, &collection, &field, &value).await,
                DbAction::Categories => commands::db::categories(&pool).await,
                DbAction::Clear { collections, yes } => {
                    commands::db::clear(&pool, &collections, yes).await
                }
            };
            pool.close().await;
            result
        }
        Commands::Roles { action } => match action {
            RolesAction::Assign { assignments, file } => {
                commands::roles::assign(assignments, file.as_deref()).await
            }
        },
        Commands::Webhook { target } => match target {
            WebhookTarget::Booking { url } => commands::webhook::booking(url).await,
            WebhookTarget::EmailHook { base_url } => commands::webhook::email_hook(base_url).await,
        },
    }
}
