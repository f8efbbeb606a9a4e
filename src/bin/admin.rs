//! CLI administration tool for link-shortener.
//!
//! Provides schema bootstrap, connectivity checks and link inspection without
//! going through the HTTP API.
//!
//! # Usage
//!
//! ```bash
//! # Apply migrations
//! cargo run --bin admin -- db migrate
//!
//! # Check database connection
//! cargo run --bin admin -- db check
//!
//! # Inspect a short link
//! cargo run --bin admin -- link show abc12
//!
//! # View statistics
//! cargo run --bin admin -- stats
//! ```
//!
//! # Environment Variables
//!
//! Uses the same variables as the server (`DATABASE_URL` or `DB_*`).

use link_shortener::config;
use link_shortener::domain::repositories::{LinkRepository, StoreError};
use link_shortener::infrastructure::persistence::PgLinkRepository;
use link_shortener::server::connect_pool;
use link_shortener::utils::code_generator::is_valid_code;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing link-shortener.
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
    /// Inspect short links
    Link {
        #[command(subcommand)]
        action: LinkAction,
    },

    /// Show statistics
    Stats,

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

/// Link inspection subcommands.
#[derive(Subcommand)]
enum LinkAction {
    /// Show a stored link by its short code
    Show {
        /// The 5-character short code
        code: String,
    },
}

/// Database operation subcommands.
#[derive(Subcommand)]
enum DbAction {
    /// Apply pending schema migrations
    Migrate,

    /// Check database connection
    Check,

    /// Show database info
    Info,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = config::load_from_env()?;
    let pool = connect_pool(&config).await?;
    let repo = PgLinkRepository::new(Arc::new(pool.clone()));

    match cli.command {
        Commands::Link { action } => handle_link_action(action, &repo).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &repo, &pool).await?,
    }

    Ok(())
}

/// Dispatches link inspection commands.
async fn handle_link_action(action: LinkAction, repo: &PgLinkRepository) -> Result<()> {
    match action {
        LinkAction::Show { code } => {
            if !is_valid_code(&code) {
                println!(
                    "{} '{}' is not a valid short code",
                    "✗".red().bold(),
                    code
                );
                return Ok(());
            }

            let link = match repo.find_by_code(&code).await {
                Ok(link) => link,
                Err(StoreError::NotFound) => {
                    println!("{} No link with code '{}'", "✗".red().bold(), code);
                    return Ok(());
                }
                Err(e) => return Err(e).context("Failed to look up link"),
            };

            let expiry = match link.expires_at {
                None => "never".dimmed().to_string(),
                Some(at) if link.is_expired() => format!("{} (expired)", at).red().to_string(),
                Some(at) => at.to_string().green().to_string(),
            };

            println!("{}", "Link".bright_blue().bold());
            println!();
            println!("  ID:          {}", link.id);
            println!("  Code:        {}", link.short_code.bright_white().bold());
            println!("  URL:         {}", link.original_url);
            println!("  Created:     {}", link.created_at);
            println!("  Updated:     {}", link.updated_at);
            println!("  Expires:     {}", expiry);
            println!(
                "  Clicks:      {}",
                link.click_count.to_string().bright_green().bold()
            );
            println!();
        }
    }

    Ok(())
}

/// Displays link and click totals.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let links_count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM links")
        .fetch_one(pool)
        .await?;

    let clicks_total: i64 =
        sqlx::query_scalar("SELECT COALESCE(SUM(click_count), 0)::BIGINT FROM links")
            .fetch_one(pool)
            .await?;

    let expired_count: i64 = sqlx::query_scalar(
        "SELECT COUNT(*) FROM links WHERE expires_at IS NOT NULL AND expires_at <= NOW()",
    )
    .fetch_one(pool)
    .await?;

    println!(
        "  Links:         {}",
        links_count.to_string().bright_green().bold()
    );
    println!(
        "  Clicks:        {}",
        clicks_total.to_string().bright_green().bold()
    );
    println!(
        "  Expired links: {}",
        expired_count.to_string().yellow().bold()
    );
    println!();

    Ok(())
}

/// Handles database commands.
async fn handle_db_action(action: DbAction, repo: &PgLinkRepository, pool: &PgPool) -> Result<()> {
    match action {
        DbAction::Migrate => {
            println!("{}", "Applying migrations...".bright_blue());

            repo.migrate().await.context("Migration failed")?;

            println!("{}", "✓ Schema is up to date".green().bold());
        }
        DbAction::Check => {
            println!("{}", "Checking database connection...".bright_blue());

            repo.ping().await.context("Database check failed")?;

            println!("{}", "✓ Database connection OK".green().bold());
        }
        DbAction::Info => {
            println!("{}", "Database Information".bright_blue().bold());
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
