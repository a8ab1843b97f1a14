//! Hiva seeding tool
//!
//! Creates the admin account and loads the landmark catalogue CSV.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use hiva::config::{DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_DATABASE_URL};
use hiva::db::Database;
use hiva::import::{import_place, read_places_csv, seed_admin, ImportOutcome, ImportSummary};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[derive(Parser, Debug)]
#[command(name = "seed")]
#[command(about = "Seed the Hiva database with the admin user and landmark catalogue")]
struct Args {
    /// Catalogue CSV (Yapılar;Kordinatlar;bilgileri)
    #[arg(short, long)]
    csv: Option<PathBuf>,

    /// SQLite database URL
    #[arg(long, env = "DATABASE_URL", default_value = DEFAULT_DATABASE_URL)]
    database_url: String,

    #[arg(long, env = "HIVA_ADMIN_EMAIL", default_value = DEFAULT_ADMIN_EMAIL)]
    admin_email: String,

    #[arg(
        long,
        env = "HIVA_ADMIN_PASSWORD",
        default_value = DEFAULT_ADMIN_PASSWORD,
        hide_env_values = true
    )]
    admin_password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let args = Args::parse();

    let db = Database::connect(&args.database_url).await?;
    seed_admin(&db, &args.admin_email, &args.admin_password).await?;

    let Some(path) = args.csv else {
        warn!("No catalogue CSV given, skipping place seeding");
        return Ok(());
    };

    info!("Seeding places from {}", path.display());
    let file = File::open(&path).with_context(|| format!("Failed to open {}", path.display()))?;
    let rows = read_places_csv(file)?;

    let pb = ProgressBar::new(rows.len() as u64);
    let template = "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}";
    pb.set_style(ProgressStyle::default_bar().template(template)?.progress_chars("#>-"));

    let mut summary = ImportSummary::default();
    for row in &rows {
        pb.set_message(row.name.clone());
        match import_place(&db, row).await? {
            ImportOutcome::Added => summary.added += 1,
            ImportOutcome::Updated => summary.updated += 1,
        }
        pb.inc(1);
    }
    pb.finish_with_message("done");

    info!(
        "Seeding complete: {} added, {} updated",
        summary.added, summary.updated
    );
    Ok(())
}
