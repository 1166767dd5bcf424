//! CLI administration tool for task-portal.
//!
//! Provides commands for generating secrets, inspecting and removing
//! accounts, viewing statistics, and performing database checks without going
//! through the web pages.
//!
//! # Usage
//!
//! ```bash
//! # Generate a value for CSRF_SECRET
//! cargo run --bin admin -- secret generate
//!
//! # Show a user's profile and task counts
//! cargo run --bin admin -- user show 3f0c...
//!
//! # Remove a user's tasks, profile and identity record
//! cargo run --bin admin -- user delete 3f0c...
//!
//! # View statistics
//! cargo run --bin admin -- stats
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` (required): PostgreSQL connection string
//! - `SUPABASE_URL`, `SUPABASE_ANON_KEY`, `SUPABASE_SERVICE_ROLE_KEY`:
//!   required by `user delete` to remove the identity record

use task_portal::config::Config;
use task_portal::domain::repositories::{IdentityBackend, ProfileRepository, TaskRepository};
use task_portal::infrastructure::identity::GoTrueClient;
use task_portal::infrastructure::persistence::{PgProfileRepository, PgTaskRepository};

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use rand::RngCore;
use sqlx::PgPool;
use std::sync::Arc;
use uuid::Uuid;

/// Shortest secret `secret generate` will produce.
const MIN_SECRET_BYTES: usize = 16;

/// CLI tool for managing task-portal.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Secret helpers
    Secret {
        #[command(subcommand)]
        action: SecretAction,
    },

    /// Inspect or remove accounts
    User {
        #[command(subcommand)]
        action: UserAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum SecretAction {
    /// Print a random hex secret suitable for CSRF_SECRET
    Generate {
        /// Number of random bytes
        #[arg(short, long, default_value_t = 32)]
        bytes: usize,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Show a user's profile and task counts
    Show {
        /// Identity user id
        id: Uuid,
    },

    /// Delete a user's tasks, profile and identity record
    Delete {
        /// Identity user id
        id: Uuid,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    match cli.command {
        Commands::Secret { action } => handle_secret_action(action)?,
        Commands::User { action } => handle_user_action(action, &connect().await?).await?,
        Commands::Stats => handle_stats(&connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn handle_secret_action(action: SecretAction) -> Result<()> {
    match action {
        SecretAction::Generate { bytes } => {
            if bytes < MIN_SECRET_BYTES {
                anyhow::bail!("Secret must be at least {MIN_SECRET_BYTES} bytes");
            }

            println!("{}", generate_secret(bytes).bright_yellow().bold());
            println!();
            println!(
                "  Set it as {} and keep it out of version control.",
                "CSRF_SECRET".bright_cyan()
            );
        }
    }

    Ok(())
}

async fn handle_user_action(action: UserAction, pool: &PgPool) -> Result<()> {
    let pool = Arc::new(pool.clone());
    let profiles = PgProfileRepository::new(pool.clone());
    let tasks = PgTaskRepository::new(pool);

    match action {
        UserAction::Show { id } => show_user(&profiles, &tasks, id).await?,
        UserAction::Delete { id, yes } => delete_user(&profiles, &tasks, id, yes).await?,
    }

    Ok(())
}

async fn show_user(
    profiles: &PgProfileRepository,
    tasks: &PgTaskRepository,
    id: Uuid,
) -> Result<()> {
    println!("{}", "👤 User".bright_blue().bold());
    println!();

    let profile = profiles
        .find_by_id(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

    let Some(profile) = profile else {
        println!("{}", "  No profile found".yellow());
        return Ok(());
    };

    let tasks = tasks
        .list_for_user(id)
        .await
        .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;
    let today = chrono::Utc::now().date_naive();
    let overdue = tasks.iter().filter(|t| t.is_overdue(today)).count();

    println!("  ID:       {}", profile.id.to_string().bright_black());
    println!(
        "  Name:     {} {}",
        profile.first_name.as_deref().unwrap_or("-").cyan(),
        profile.last_name.as_deref().unwrap_or("-").cyan()
    );
    println!(
        "  Created:  {}",
        profile
            .created_at
            .format("%Y-%m-%d %H:%M")
            .to_string()
            .bright_black()
    );
    println!(
        "  Tasks:    {}",
        tasks.len().to_string().bright_white().bold()
    );
    println!("  Overdue:  {}", overdue.to_string().red());
    println!();

    Ok(())
}

/// Removes everything stored for a user.
///
/// # Order
///
/// 1. Tasks
/// 2. Profile
/// 3. Identity record (needs `SUPABASE_SERVICE_ROLE_KEY`)
///
/// Requires confirmation (default: No) unless `--yes` is given.
async fn delete_user(
    profiles: &PgProfileRepository,
    tasks: &PgTaskRepository,
    id: Uuid,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🗑  Delete User".bright_blue().bold());
    println!();

    let config = Config::from_env().context("Identity backend configuration is required")?;
    let identity = GoTrueClient::new(config.gotrue_config()?)
        .map_err(|e| anyhow::anyhow!("Failed to create identity client: {}", e))?;

    println!("  User: {}", id.to_string().cyan());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this user and all their tasks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    let removed = tasks
        .delete_all_for_user(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete tasks: {}", e))?;

    profiles
        .delete(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete profile: {}", e))?;

    identity
        .delete_user(id)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to delete identity user: {}", e))?;

    println!();
    println!(
        "{} ({} tasks removed)",
        "✅ User deleted".green().bold(),
        removed
    );
    println!();

    Ok(())
}

/// Displays system statistics.
///
/// Shows:
/// - Total number of profiles
/// - Tasks per status
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let profiles_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM profiles")
        .fetch_one(pool)
        .await?;

    let by_status: Vec<(String, i64)> =
        sqlx::query_as("SELECT status, COUNT(*) FROM tasks GROUP BY status ORDER BY status")
            .fetch_all(pool)
            .await?;

    let overdue_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM tasks WHERE due_date < CURRENT_DATE AND status <> 'completed'",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Profiles:      {}",
        profiles_count.to_string().bright_green().bold()
    );
    for (status, count) in &by_status {
        println!(
            "  {:<14} {}",
            format!("{status}:"),
            count.to_string().bright_green().bold()
        );
    }
    println!(
        "  Overdue:       {}",
        overdue_count.to_string().red().bold()
    );
    println!();

    Ok(())
}

/// Handles database diagnostic commands.
async fn handle_db_action(action: DbAction, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Check => {
            println!("{}", "🔍 Checking database connection...".bright_blue());

            sqlx::query("SELECT 1").fetch_one(pool).await?;

            println!("{}", "✅ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "ℹ️  Database Information".bright_blue().bold());
            println!();

            let version: String = sqlx::query_scalar("SELECT version()")
                .fetch_one(pool)
                .await?;

            println!("  PostgreSQL: {}", version.bright_white());
            println!();
        }
    }

    Ok(())
}

/// Hex-encodes `bytes` random bytes from the OS-seeded generator.
fn generate_secret(bytes: usize) -> String {
    let mut buf = vec![0u8; bytes];
    rand::rng().fill_bytes(&mut buf);
    hex::encode(buf)
}
