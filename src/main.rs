use anyhow::{Context, Result};
use card_scout::cli::{Cli, Commands};
use card_scout::config::ScoutConfig;
use card_scout::filter::ListingFilter;
use card_scout::models::{RawPage, SnapshotRow};
use card_scout::pipeline::Pipeline;
use card_scout::scoring::FixedValuations;
use card_scout::storage::{load_snapshot, SaveOutcome};
use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = ScoutConfig::from_env().context("Failed to read configuration")?;
    if let Some(dir) = cli.out_dir {
        config.out_dir = dir;
    }
    if let Some(prefix) = cli.prefix {
        config.prefix = prefix;
    }

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("🃏 Card Scout");

    match cli.command {
        Commands::Extract { page, format, valuations } => {
            if let Some(format) = format {
                config.format = format;
            }

            let bytes = std::fs::read(&page)
                .with_context(|| format!("Failed to read {}", page.display()))?;
            let raw = RawPage::from_bytes(bytes)?;

            let mut pipeline = Pipeline::from_config(&config)?;
            if let Some(path) = valuations {
                let fixed = FixedValuations::from_json_file(&path)
                    .with_context(|| format!("Failed to load valuations from {}", path.display()))?;
                pipeline = pipeline.with_valuation(Box::new(fixed));
            }

            let report = pipeline
                .run(raw)
                .with_context(|| format!("Failed to process {}", page.display()))?;

            match &report.outcome {
                SaveOutcome::Written(path) => {
                    info!("✅ Parsed {} listings", report.snapshot.len());
                    print_rows(&report.snapshot.rows.iter().collect::<Vec<_>>());
                    info!("Snapshot: {}", path.display());
                }
                SaveOutcome::Empty => warn!("⚠️ No card listings found in {}", page.display()),
            }
        }
        Commands::Browse { snapshot, filter } => {
            let path = match snapshot {
                Some(path) => path,
                None => config
                    .store()
                    .latest()?
                    .with_context(|| format!("No snapshots found in {}", config.out_dir.display()))?,
            };

            let rows = load_snapshot(&path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            let filter = ListingFilter::from(filter);
            let kept = filter.apply(&rows);

            info!("Showing {} of {} listings from {}", kept.len(), rows.len(), path.display());
            print_rows(&kept);
        }
    }

    Ok(())
}

fn print_rows(rows: &[&SnapshotRow]) {
    for (i, row) in rows.iter().enumerate() {
        let marker = if row.flip_score > 15.0 { "🔥" } else { "⚠️" };
        println!("{}. {} [{}]", i + 1, row.card, row.category());
        println!("   💰 ${:.2} | Avg: ${:.2}", row.price, row.avg_sold);
        println!("   Flip Score: {} {:.1}", marker, row.flip_score);
        println!("   URL: {}", row.link);
        println!();
    }
}
