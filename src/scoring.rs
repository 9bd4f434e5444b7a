use std::collections::HashMap;
use std::path::Path;

use tracing::{debug, info};

use crate::error::Result;
use crate::models::ListingCandidate;

/// Percentage upside of buying at `price` and selling at `reference_sold`,
/// rounded to one decimal place with ties going to the even digit. Zero when
/// there is no reference price.
pub fn flip_score(reference_sold: f64, price: f64) -> f64 {
    if reference_sold == 0.0 {
        return 0.0;
    }
    let pct = (reference_sold - price) / reference_sold * 100.0;
    if !pct.is_finite() {
        return 0.0;
    }
    (pct * 10.0).round_ties_even() / 10.0
}

/// Supplies the "typical sold" price a listing is compared against
pub trait ValuationSource {
    fn reference_price(&self, listing: &ListingCandidate) -> Option<f64>;

    fn name(&self) -> &'static str;
}

/// No external valuation: the listing's own price is the reference
pub struct MirrorPrice;

impl ValuationSource for MirrorPrice {
    fn reference_price(&self, listing: &ListingCandidate) -> Option<f64> {
        listing.price
    }

    fn name(&self) -> &'static str {
        "mirror-price"
    }
}

/// Average sold prices keyed by card title (case and spacing insensitive).
/// Titles without an entry keep mirroring their listed price.
#[derive(Debug, Clone, Default)]
pub struct FixedValuations {
    by_title: HashMap<String, f64>,
}

impl FixedValuations {
    pub fn new(entries: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self {
            by_title: entries
                .into_iter()
                .filter(|(_, v)| v.is_finite() && *v >= 0.0)
                .map(|(title, v)| (normalize_title(&title), v))
                .collect(),
        }
    }

    /// Load a JSON object mapping title to average sold price
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self> {
        let text = std::fs::read_to_string(path.as_ref())?;
        let entries: HashMap<String, f64> = serde_json::from_str(&text)?;
        info!("Loaded {} valuations from {}", entries.len(), path.as_ref().display());
        Ok(Self::new(entries))
    }

    pub fn len(&self) -> usize {
        self.by_title.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_title.is_empty()
    }
}

impl ValuationSource for FixedValuations {
    fn reference_price(&self, listing: &ListingCandidate) -> Option<f64> {
        listing
            .title
            .as_deref()
            .and_then(|t| self.by_title.get(&normalize_title(t)).copied())
            .or(listing.price)
    }

    fn name(&self) -> &'static str {
        "fixed-valuations"
    }
}

fn normalize_title(title: &str) -> String {
    title.split_whitespace().collect::<Vec<_>>().join(" ").to_lowercase()
}

/// Value and score a whole extracted batch. Listings without a price keep a
/// score of zero whatever their valuation.
pub fn score_all(listings: Vec<ListingCandidate>, valuation: &dyn ValuationSource) -> Vec<ListingCandidate> {
    debug!("Scoring {} listings using {}", listings.len(), valuation.name());

    listings
        .into_iter()
        .map(|mut listing| {
            listing.reference_sold = valuation.reference_price(&listing);
            listing.flip_score = match listing.price {
                Some(price) => flip_score(listing.reference_sold_or_zero(), price),
                None => 0.0,
            };
            listing
        })
        .collect()
}
