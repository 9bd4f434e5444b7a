pub mod category;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::error::{Result, ScoutError};

pub use category::{Category, GradingCompany};

pub const NO_TITLE: &str = "No title";
pub const NO_LINK: &str = "No link";
pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/100";

/// Source of the listing page
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Source {
    Mercari,
}

/// Saved markup of one search-results page. Dropped once parsed.
#[derive(Debug, Clone)]
pub struct RawPage {
    markup: String,
}

impl RawPage {
    pub fn new(markup: impl Into<String>) -> Self {
        Self { markup: markup.into() }
    }

    /// Build a page from bytes read off disk. Non UTF-8 input is rejected.
    pub fn from_bytes(bytes: Vec<u8>) -> Result<Self> {
        String::from_utf8(bytes)
            .map(Self::new)
            .map_err(|e| ScoutError::Unparseable(format!("page is not valid UTF-8 ({})", e)))
    }

    pub fn markup(&self) -> &str {
        &self.markup
    }

    pub fn byte_len(&self) -> usize {
        self.markup.len()
    }

    pub fn is_blank(&self) -> bool {
        self.markup.trim().is_empty()
    }
}

/// One parsed listing-cell.
///
/// Missing fields stay `None` here so "no price found" remains distinct from
/// a real zero; defaults are substituted by [`ListingCandidate::to_row`].
#[derive(Debug, Clone, PartialEq)]
pub struct ListingCandidate {
    pub source: Source,
    pub title: Option<String>,
    pub price: Option<f64>,
    pub reference_sold: Option<f64>,
    pub link: Option<String>,
    pub image_url: Option<String>,
    pub flip_score: f64,
}

impl ListingCandidate {
    /// Fresh candidate as the extractor sees it: no valuation yet, so the
    /// reference price mirrors the listed price.
    pub fn new(source: Source, title: Option<String>, price: Option<f64>, link: Option<String>) -> Self {
        Self {
            source,
            title,
            price,
            reference_sold: price,
            link,
            image_url: None,
            flip_score: 0.0,
        }
    }

    pub fn price_or_zero(&self) -> f64 {
        self.price.unwrap_or(0.0)
    }

    pub fn reference_sold_or_zero(&self) -> f64 {
        self.reference_sold.unwrap_or(0.0)
    }

    /// Serialize into a table row, substituting the documented defaults.
    pub fn to_row(&self, placeholder_image: &str) -> SnapshotRow {
        SnapshotRow {
            card: self.title.clone().unwrap_or_else(|| NO_TITLE.to_string()),
            price: self.price_or_zero(),
            avg_sold: self.reference_sold_or_zero(),
            flip_score: self.flip_score,
            link: self.link.clone().unwrap_or_else(|| NO_LINK.to_string()),
            image: self
                .image_url
                .clone()
                .unwrap_or_else(|| placeholder_image.to_string()),
        }
    }
}

/// A row as it appears in a snapshot file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SnapshotRow {
    #[serde(rename = "Card")]
    pub card: String,
    #[serde(rename = "Price")]
    pub price: f64,
    #[serde(rename = "Avg Sold")]
    pub avg_sold: f64,
    #[serde(rename = "Flip Score")]
    pub flip_score: f64,
    #[serde(rename = "Link")]
    pub link: String,
    #[serde(rename = "Image")]
    pub image: String,
}

impl SnapshotRow {
    pub const HEADERS: [&'static str; 6] = ["Card", "Price", "Avg Sold", "Flip Score", "Link", "Image"];

    pub fn category(&self) -> Category {
        Category::from_title(&self.card)
    }

    pub fn grading(&self) -> Option<GradingCompany> {
        GradingCompany::from_title(&self.card)
    }
}

/// Ordered, scored table produced by one run.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingSnapshot {
    pub taken_at: DateTime<Local>,
    pub rows: Vec<SnapshotRow>,
}

impl ListingSnapshot {
    pub fn new(taken_at: DateTime<Local>, candidates: &[ListingCandidate], placeholder_image: &str) -> Self {
        Self {
            taken_at,
            rows: candidates.iter().map(|c| c.to_row(placeholder_image)).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_get_defaults_at_row_boundary() {
        let candidate = ListingCandidate::new(Source::Mercari, None, None, None);
        let row = candidate.to_row(PLACEHOLDER_IMAGE);

        assert_eq!(row.card, NO_TITLE);
        assert_eq!(row.price, 0.0);
        assert_eq!(row.avg_sold, 0.0);
        assert_eq!(row.link, NO_LINK);
        assert_eq!(row.image, PLACEHOLDER_IMAGE);
    }

    #[test]
    fn reference_price_mirrors_price_on_creation() {
        let candidate = ListingCandidate::new(Source::Mercari, Some("Charizard".into()), Some(12.5), None);
        assert_eq!(candidate.reference_sold, Some(12.5));
    }

    #[test]
    fn invalid_utf8_is_unparseable() {
        let err = RawPage::from_bytes(vec![0xff, 0xfe, b'<']).unwrap_err();
        assert!(matches!(err, ScoutError::Unparseable(_)));
    }

    #[test]
    fn byte_len_counts_utf8_bytes() {
        let page = RawPage::new("<p>Pokémon</p>");
        assert_eq!(page.byte_len(), 15);
        assert!(!page.is_blank());
    }
}
