//! CLI administration tool for course-catalog.
//!
//! Provides commands for seeding reference data, viewing statistics,
//! and performing database operations without requiring HTTP API access.
//!
//! # Usage
//!
//! ```bash
//! # Seed default course categories
//! cargo run --bin admin -- seed categories
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

use course_catalog::domain::entities::{LookupKind, NewLookupEntry};
use course_catalog::domain::repositories::LookupRepository;
use course_catalog::infrastructure::persistence::PgLookupRepository;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use sqlx::PgPool;
use std::sync::Arc;

/// Categories created by `seed categories`.
const DEFAULT_CATEGORIES: [&str; 12] = [
    "Computer Science",
    "Front-End Development",
    "Ethical Hacking",
    "Graphic design",
    "Health",
    "Language",
    "Engineering & Construction",
    "Business",
    "Management",
    "Sales & Marketing",
    "Teaching & Academics",
    "Personal Development",
];

/// CLI tool for managing course-catalog.
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
    /// Seed reference data
    Seed {
        #[command(subcommand)]
        action: SeedAction,
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
enum SeedAction {
    /// Insert the default course categories that are missing
    Categories {
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

    let database_url = std::env::var("DATABASE_URL").context("DATABASE_URL must be set")?;

    let pool = PgPool::connect(&database_url)
        .await
        .context("Failed to connect to database")?;

    match cli.command {
        Commands::Seed { action } => handle_seed_action(action, &pool).await?,
        Commands::Stats => handle_stats(&pool).await?,
        Commands::Db { action } => handle_db_action(action, &pool).await?,
    }

    Ok(())
}

async fn handle_seed_action(action: SeedAction, pool: &PgPool) -> Result<()> {
    let repo = Arc::new(PgLookupRepository::new(Arc::new(pool.clone())));

    match action {
        SeedAction::Categories { yes } => seed_categories(repo, yes).await,
    }
}

/// Inserts every default category whose name is not already present.
///
/// Running it twice creates nothing the second time.
async fn seed_categories(repo: Arc<PgLookupRepository>, skip_confirm: bool) -> Result<()> {
    println!("{}", "🌱 Seed Course Categories".bright_blue().bold());
    println!();

    let mut missing = Vec::new();
    for name in DEFAULT_CATEGORIES {
        let existing = repo
            .find_by_name(LookupKind::Category, name)
            .await
            .map_err(|e| anyhow::anyhow!("Database error: {}", e))?;

        if existing.is_none() {
            missing.push(name);
        }
    }

    if missing.is_empty() {
        println!("{}", "  All default categories already exist".green());
        return Ok(());
    }

    for name in &missing {
        println!("  + {}", name.cyan());
    }
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt(format!("Create {} categories?", missing.len()))
            .default(true)
            .interact()?;

        if !confirmed {
            println!("{}", "❌ Cancelled".red());
            return Ok(());
        }
    }

    for name in &missing {
        repo.create(
            LookupKind::Category,
            NewLookupEntry {
                name: name.to_string(),
                slug: None,
            },
        )
        .await
        .map_err(|e| anyhow::anyhow!("Failed to create category '{}': {}", name, e))?;
    }

    println!();
    println!(
        "{} {}",
        "✅ Created categories:".green().bold(),
        missing.len().to_string().bright_white().bold()
    );
    println!();

    Ok(())
}

/// Displays row counts of live records.
async fn handle_stats(pool: &PgPool) -> Result<()> {
    println!("{}", "📊 Statistics".bright_blue().bold());
    println!();

    let rows: [(&str, &str); 5] = [
        (
            "Courses",
            "SELECT COUNT(*) FROM courses c \
             JOIN course_structure_types t ON t.id = c.course_structure_type_id \
             WHERE c.deleted_at IS NULL AND t.slug = 'course'",
        ),
        ("Bundles", "SELECT COUNT(*) FROM bundles WHERE deleted_at IS NULL"),
        ("Programs", "SELECT COUNT(*) FROM programs WHERE deleted_at IS NULL"),
        ("Bundle links", "SELECT COUNT(*) FROM bundle_courses"),
        ("Program links", "SELECT COUNT(*) FROM program_courses"),
    ];

    for (label, sql) in rows {
        let count: i64 = sqlx::query_scalar(sql).fetch_one(pool).await?;
        println!(
            "  {:<15}{}",
            format!("{}:", label),
            count.to_string().bright_green().bold()
        );
    }
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
