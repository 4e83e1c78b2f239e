//! CLI administration tool for linker.
//!
//! Provides commands for inspecting the slug pool, managing links and generating the API
//! token without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Generate a value for LINKER_TOKEN
//! cargo run --bin linker-admin -- token generate
//!
//! # Show pool occupancy
//! cargo run --bin linker-admin -- pool status
//!
//! # List active links
//! cargo run --bin linker-admin -- links list
//!
//! # Release a slug
//! cargo run --bin linker-admin -- links release bored-bulbasaur
//!
//! # Check database connection
//! cargo run --bin linker-admin -- db check
//! ```
//!
//! # Environment Variables
//!
//! - `DATABASE_URL` or `POSTGRES_*` components: PostgreSQL connection (not needed for
//!   `token generate`)

use linker::application::services::{ClickRecorder, LinkRegistry};
use linker::config::{Config, token_fingerprint};
use linker::domain::errors::LinkError;
use linker::domain::slug_pool;
use linker::infrastructure::persistence::{PgClickRepository, PgSlugStore};

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use rand::RngCore;
use sqlx::PgPool;
use std::sync::Arc;

/// CLI tool for managing linker.
#[derive(Parser)]
#[command(name = "linker-admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

/// Top-level command groups.
#[derive(Subcommand)]
enum Commands {
    /// Manage the API token
    Token {
        #[command(subcommand)]
        action: TokenAction,
    },

    /// Inspect or seed the slug pool
    Pool {
        #[command(subcommand)]
        action: PoolAction,
    },

    /// Manage active links
    Links {
        #[command(subcommand)]
        action: LinksAction,
    },

    /// Database operations
    Db {
        #[command(subcommand)]
        action: DbAction,
    },
}

#[derive(Subcommand)]
enum TokenAction {
    /// Generate a random token for LINKER_TOKEN
    Generate {
        /// Print only the token
        #[arg(long)]
        raw: bool,
    },
}

#[derive(Subcommand)]
enum PoolAction {
    /// Show pool occupancy
    Status,

    /// Insert missing slugs into the pool
    Seed,
}

#[derive(Subcommand)]
enum LinksAction {
    /// List active links with click totals
    List,

    /// Release a slug and delete its click history
    Release {
        slug: String,

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
        Commands::Token { action } => handle_token_action(action)?,
        Commands::Pool { action } => handle_pool_action(action, &connect().await?).await?,
        Commands::Links { action } => handle_links_action(action, &connect().await?).await?,
        Commands::Db { action } => handle_db_action(action, &connect().await?).await?,
    }

    Ok(())
}

async fn connect() -> Result<PgPool> {
    let database_url = Config::load_database_url()?;

    PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")
}

fn services(pool: &PgPool) -> (Arc<LinkRegistry>, ClickRecorder) {
    let pool = Arc::new(pool.clone());
    let registry = Arc::new(LinkRegistry::new(Arc::new(PgSlugStore::new(pool.clone()))));
    let recorder = ClickRecorder::new(registry.clone(), Arc::new(PgClickRepository::new(pool)));
    (registry, recorder)
}

fn handle_token_action(action: TokenAction) -> Result<()> {
    match action {
        TokenAction::Generate { raw } => {
            let token = generate_token();

            if raw {
                println!("{token}");
                return Ok(());
            }

            println!("{}", "🔑 Generated API token".bright_blue().bold());
            println!();
            println!("  Token:       {}", token.bright_yellow().bold());
            println!("  Fingerprint: {}", token_fingerprint(&token).bright_black());
            println!();
            println!("{}", "Add this to your environment:".bright_white());
            println!("  LINKER_TOKEN={}", token.bright_yellow());
            println!();
            println!(
                "  The server logs the fingerprint at startup so you can check which token it uses."
            );
            println!();
        }
    }

    Ok(())
}

async fn handle_pool_action(action: PoolAction, pool: &PgPool) -> Result<()> {
    let (registry, _) = services(pool);

    match action {
        PoolAction::Status => {
            println!("{}", "📊 Slug pool".bright_blue().bold());
            println!();

            let status = registry.pool_status().await?;

            println!(
                "  Total:     {}",
                status.total.to_string().bright_white().bold()
            );
            println!(
                "  Assigned:  {}",
                status.assigned.to_string().bright_green().bold()
            );
            let available = status.available().to_string();
            println!(
                "  Available: {}",
                if status.available() == 0 {
                    available.red().bold()
                } else {
                    available.bright_green().bold()
                }
            );
            println!();
        }
        PoolAction::Seed => {
            let inserted = registry.seed_pool(&slug_pool::generate()).await?;

            if inserted == 0 {
                println!("{}", "✅ Pool already complete".green());
            } else {
                println!(
                    "{} {}",
                    "✅ Inserted slugs:".green().bold(),
                    inserted.to_string().bright_white().bold()
                );
            }
        }
    }

    Ok(())
}

async fn handle_links_action(action: LinksAction, pool: &PgPool) -> Result<()> {
    let (registry, recorder) = services(pool);

    match action {
        LinksAction::List => list_links(&registry, &recorder).await?,
        LinksAction::Release { slug, yes } => release_link(&registry, &recorder, slug, yes).await?,
    }

    Ok(())
}

/// Lists active links with click totals.
///
/// # Output Format
///
/// ```text
/// 📋 Active links
///
///   Slug                     Clicks  Target
///   ───────────────────────────────────────────────────────────
///   able-bulbasaur           12      https://example.com
/// ```
async fn list_links(registry: &LinkRegistry, recorder: &ClickRecorder) -> Result<()> {
    println!("{}", "📋 Active links".bright_blue().bold());
    println!();

    let links = registry.list_active().await?;

    if links.is_empty() {
        println!("{}", "  No active links".yellow());
        return Ok(());
    }

    let counts = recorder.counts_for(&links).await?;

    println!(
        "  {:<24} {:<7} {}",
        "Slug".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    for link in &links {
        let clicks = counts.get(&link.id).copied().unwrap_or(0);
        println!(
            "  {:<24} {:<7} {}",
            link.slug.cyan(),
            clicks.to_string().bright_black(),
            link.active_target().unwrap_or_default()
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

/// Releases a slug after confirmation (default: No).
async fn release_link(
    registry: &LinkRegistry,
    recorder: &ClickRecorder,
    slug: String,
    skip_confirm: bool,
) -> Result<()> {
    println!("{}", "🔓 Release slug".bright_blue().bold());
    println!();

    let link = match registry.resolve(&slug).await {
        Ok(link) => link,
        Err(LinkError::SlugNotInUse { .. }) => {
            println!("{}", "⚠️  This slug is not in use".yellow());
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };
    let clicks = recorder.count_for(&link).await?;

    println!("  Slug:   {}", link.slug.cyan());
    println!("  Target: {}", link.active_target().unwrap_or_default());
    println!("  Clicks: {}", clicks.to_string().bright_black());
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Release this slug and delete its clicks?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    registry.release(&slug).await?;

    println!();
    println!("{}", "✅ Slug released".green().bold());
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

/// Generates a random 256-bit token, URL-safe base64 encoded (43 characters).
fn generate_token() -> String {
    let mut bytes = [0u8; 32];
    rand::rng().fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}
