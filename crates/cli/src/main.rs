//! Spot My Ride CLI - admin account management.
//!
//! # Usage
//!
//! ```bash
//! # Create an admin (password read from stdin when --password is omitted)
//! smr-cli admin create -e admin@spotmyride.app -n "Admin Name"
//!
//! # Replace a password, also clearing any clear-text leftover
//! smr-cli admin set-password -e admin@spotmyride.app
//!
//! # Print an Argon2id hash for manual seeding
//! smr-cli admin hash-password
//! ```
//!
//! # Commands
//!
//! - `admin create` - Create an admin account
//! - `admin set-password` - Reset an admin password
//! - `admin hash-password` - Hash a password without touching the database

#![cfg_attr(not(test), forbid(unsafe_code))]

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "smr-cli")]
#[command(author, version, about = "Spot My Ride admin tools")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Manage admin accounts
    Admin {
        #[command(subcommand)]
        action: AdminAction,
    },
}

#[derive(Subcommand)]
enum AdminAction {
    /// Create a new admin account
    Create {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Admin display name
        #[arg(short, long)]
        name: String,

        /// Password (read from stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Replace an existing admin's password
    SetPassword {
        /// Admin email address
        #[arg(short, long)]
        email: String,

        /// Password (read from stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
    /// Hash a password and print the PHC string
    HashPassword {
        /// Password (read from stdin if omitted)
        #[arg(short, long)]
        password: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    let result: Result<(), Box<dyn std::error::Error>> = run(cli).await;

    if let Err(e) = result {
        tracing::error!("Command failed: {e}");
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), Box<dyn std::error::Error>> {
    match cli.command {
        Commands::Admin { action } => match action {
            AdminAction::Create {
                email,
                name,
                password,
            } => {
                let password = commands::admin::resolve_password(password)?;
                commands::admin::create_user(&email, &name, &password).await?;
            }
            AdminAction::SetPassword { email, password } => {
                let password = commands::admin::resolve_password(password)?;
                commands::admin::set_password(&email, &password).await?;
            }
            AdminAction::HashPassword { password } => {
                let password = commands::admin::resolve_password(password)?;
                commands::admin::print_hash(&password)?;
            }
        },
    }
    Ok(())
}
