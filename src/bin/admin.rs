//! CLI administration tool for minishort.
//!
//! Works directly on the JSON link store, so it is meant to be run while the
//! server is stopped.
//!
//! # Usage
//!
//! ```bash
//! # List links, optionally filtered
//! cargo run --bin admin -- list --query docs
//!
//! # Show one link with its secret key
//! cargo run --bin admin -- show abc123
//!
//! # Delete a link
//! cargo run --bin admin -- delete abc123
//!
//! # Counts
//! cargo run --bin admin -- stats
//!
//! # Print a random value for ADMIN_TOKEN or SESSION_SECRET
//! cargo run --bin admin -- secret
//! ```
//!
//! # Environment Variables
//!
//! - `URL_DB_PATH` (optional): JSON store path, overridden by `--db`

use minishort::application::services::LinkService;
use minishort::domain::entities::Link;
use minishort::infrastructure::persistence::JsonLinkRepository;
use minishort::utils::secret::generate_token;

use anyhow::{Context, Result};
use chrono::Utc;
use clap::{Parser, Subcommand};
use colored::*;
use dialoguer::Confirm;
use std::path::PathBuf;
use std::sync::Arc;

/// CLI tool for managing minishort links.
#[derive(Parser)]
#[command(name = "admin")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Path to the JSON link store
    #[arg(long, env = "URL_DB_PATH", default_value = "url_db.json", global = true)]
    db: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List links, newest first
    List {
        /// Case-insensitive filter on slug, target or creation time
        #[arg(short, long)]
        query: Option<String>,
    },

    /// Show one link including its secret key
    Show { slug: String },

    /// Delete a link
    Delete {
        slug: String,

        /// Skip confirmation prompt
        #[arg(short = 'y', long)]
        yes: bool,
    },

    /// Show link counts
    Stats,

    /// Print a fresh random value for ADMIN_TOKEN or SESSION_SECRET
    Secret,
}

type Service = LinkService<JsonLinkRepository>;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    if let Commands::Secret = cli.command {
        println!("{}", generate_token(32));
        return Ok(());
    }

    let repository = JsonLinkRepository::open(&cli.db)
        .await
        .with_context(|| format!("Failed to open link store {}", cli.db.display()))?;
    let service = LinkService::new(Arc::new(repository));

    match cli.command {
        Commands::List { query } => list_links(&service, query.as_deref().unwrap_or("")).await?,
        Commands::Show { slug } => show_link(&service, &slug).await?,
        Commands::Delete { slug, yes } => delete_link(&service, &slug, yes).await?,
        Commands::Stats => show_stats(&service).await?,
        Commands::Secret => {}
    }

    Ok(())
}

/// Lists links in a table.
///
/// # Output Format
///
/// ```text
/// Links
///
///   Slug         Created           Expires           Clicks  Target
///   ───────────────────────────────────────────────────────────────────
///   abc123       2030-01-15 10:30  never             12      https://example.com
/// ```
async fn list_links(service: &Service, query: &str) -> Result<()> {
    println!("{}", "Links".bright_blue().bold());
    println!();

    let links = service.search(query).await?;

    if links.is_empty() {
        println!("{}", "  No links found".yellow());
        return Ok(());
    }

    println!(
        "  {:<12} {:<17} {:<17} {:<7} {}",
        "Slug".bright_white().bold(),
        "Created".bright_white().bold(),
        "Expires".bright_white().bold(),
        "Clicks".bright_white().bold(),
        "Target".bright_white().bold()
    );
    println!("  {}", "─".repeat(75).bright_black());

    let now = Utc::now();
    for link in &links {
        let expires = match link.expires_at {
            Some(e) if link.is_expired_at(now) => e.format("%Y-%m-%d %H:%M").to_string().red(),
            Some(e) => e.format("%Y-%m-%d %H:%M").to_string().normal(),
            None => "never".bright_black(),
        };

        println!(
            "  {:<12} {:<17} {:<17} {:<7} {}",
            link.slug.cyan(),
            link.created_at
                .format("%Y-%m-%d %H:%M")
                .to_string()
                .bright_black(),
            expires,
            link.clicks,
            link.target
        );
    }

    println!();
    println!("  Total: {}", links.len().to_string().bright_white().bold());
    println!();

    Ok(())
}

async fn show_link(service: &Service, slug: &str) -> Result<()> {
    let link = service.get(slug).await?;
    print_link(&link);
    Ok(())
}

fn print_link(link: &Link) {
    let status = if link.is_expired() {
        "EXPIRED".red()
    } else {
        "ACTIVE".green()
    };

    println!("  Slug:        {}", link.slug.cyan());
    println!("  Target:      {}", link.target);
    println!("  Status:      {}", status);
    println!("  Created:     {}", link.created_at.to_rfc3339());
    println!(
        "  Expires:     {}",
        link.expires_at
            .map(|e| e.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!("  Clicks:      {}", link.clicks);
    println!(
        "  Last access: {}",
        link.last_access
            .map(|t| t.to_rfc3339())
            .unwrap_or_else(|| "never".to_string())
    );
    println!("  Secret:      {}", link.secret.bright_yellow());
}

/// Deletes a link after confirmation (default: No).
async fn delete_link(service: &Service, slug: &str, skip_confirm: bool) -> Result<()> {
    println!("{}", "Delete link".bright_blue().bold());
    println!();

    let link = service.get(slug).await?;
    print_link(&link);
    println!();

    if !skip_confirm {
        let confirmed = Confirm::new()
            .with_prompt("Delete this link?")
            .default(false)
            .interact()?;

        if !confirmed {
            println!("{}", "Cancelled".red());
            return Ok(());
        }
    }

    service.admin_delete(slug).await?;

    println!("{}", "Link deleted".green().bold());
    Ok(())
}

async fn show_stats(service: &Service) -> Result<()> {
    println!("{}", "Statistics".bright_blue().bold());
    println!();

    let summary = service.summary().await?;
    let clicks: u64 = service.search("").await?.iter().map(|l| l.clicks).sum();

    println!(
        "  Links:   {}",
        summary.total.to_string().bright_green().bold()
    );
    println!("  Active:  {}", summary.active.to_string().green());
    println!("  Expired: {}", summary.expired.to_string().red());
    println!("  Clicks:  {}", clicks.to_string().bright_green().bold());
    println!();

    Ok(())
}
