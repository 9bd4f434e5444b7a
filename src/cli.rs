use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::filter::ListingFilter;
use crate::models::{Category, GradingCompany};
use crate::storage::SnapshotFormat;

/// Turn saved marketplace search pages into scored listing snapshots
#[derive(Parser)]
#[command(name = "card-scout")]
#[command(about = "Extract and score trading-card listings from saved search pages", long_about = None)]
pub struct Cli {
    /// Snapshot directory (overrides SCOUT_OUT_DIR)
    #[arg(long, global = true)]
    pub out_dir: Option<PathBuf>,

    /// Snapshot file prefix (overrides SCOUT_PREFIX)
    #[arg(long, global = true)]
    pub prefix: Option<String>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Extract listings from a saved page and write a snapshot
    Extract {
        /// Saved .html search-results page
        page: PathBuf,

        /// csv or json (overrides SCOUT_FORMAT)
        #[arg(short, long)]
        format: Option<SnapshotFormat>,

        /// JSON object mapping card title to average sold price
        #[arg(long)]
        valuations: Option<PathBuf>,
    },
    /// Print listings from a snapshot, newest one by default
    Browse {
        /// Snapshot file to read
        snapshot: Option<PathBuf>,

        #[command(flatten)]
        filter: FilterArgs,
    },
}

#[derive(Args, Debug, Default)]
pub struct FilterArgs {
    #[arg(long)]
    pub min_price: Option<f64>,

    #[arg(long)]
    pub max_price: Option<f64>,

    /// Minimum flip score in percent
    #[arg(long)]
    pub min_flip: Option<f64>,

    /// Case-insensitive title search
    #[arg(short, long)]
    pub query: Option<String>,

    #[arg(long, value_parser = parse_category)]
    pub category: Option<Category>,

    /// PSA, BGS or SGC
    #[arg(long, value_parser = parse_grading)]
    pub grading: Option<GradingCompany>,
}

impl From<FilterArgs> for ListingFilter {
    fn from(args: FilterArgs) -> Self {
        ListingFilter {
            min_price: args.min_price,
            max_price: args.max_price,
            min_flip_score: args.min_flip,
            query: args.query,
            category: args.category,
            grading: args.grading,
        }
    }
}

fn parse_category(s: &str) -> Result<Category, String> {
    Category::parse(s).ok_or_else(|| {
        let names: Vec<&str> = Category::ALL.iter().map(|c| c.as_str()).collect();
        format!("unknown category `{}` (expected one of {})", s, names.join(", "))
    })
}

fn parse_grading(s: &str) -> Result<GradingCompany, String> {
    GradingCompany::parse(s).ok_or_else(|| format!("unknown grading company `{}`", s))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_browse_filters() {
        let cli = Cli::try_parse_from([
            "card-scout",
            "browse",
            "--min-price",
            "10",
            "--category",
            "football",
            "--grading",
            "psa",
            "--out-dir",
            "/tmp/x",
        ])
        .unwrap();

        assert_eq!(cli.out_dir, Some(PathBuf::from("/tmp/x")));
        let Commands::Browse { snapshot, filter } = cli.command else {
            panic!("expected browse");
        };
        assert_eq!(snapshot, None);
        let filter = ListingFilter::from(filter);
        assert_eq!(filter.min_price, Some(10.0));
        assert_eq!(filter.category, Some(Category::Football));
        assert_eq!(filter.grading, Some(GradingCompany::Psa));
    }

    #[test]
    fn parses_extract_format() {
        let cli = Cli::try_parse_from(["card-scout", "extract", "page.html", "-f", "json"]).unwrap();
        let Commands::Extract { page, format, valuations } = cli.command else {
            panic!("expected extract");
        };
        assert_eq!(page, PathBuf::from("page.html"));
        assert_eq!(format, Some(SnapshotFormat::Json));
        assert_eq!(valuations, None);
    }

    #[test]
    fn rejects_unknown_category() {
        assert!(Cli::try_parse_from(["card-scout", "browse", "--category", "hockey"]).is_err());
    }
}
