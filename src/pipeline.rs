use chrono::{DateTime, Local};
use tracing::info;

use crate::config::ScoutConfig;
use crate::error::Result;
use crate::models::{ListingCandidate, ListingSnapshot, RawPage};
use crate::scoring::{score_all, MirrorPrice, ValuationSource};
use crate::scrapers::{ListingExtractor, MercariExtractor};
use crate::storage::{SaveOutcome, SnapshotStore};

/// Result of one run: the scored candidates, the table built from them and
/// what happened on disk.
#[derive(Debug)]
pub struct PipelineReport {
    pub candidates: Vec<ListingCandidate>,
    pub snapshot: ListingSnapshot,
    pub outcome: SaveOutcome,
}

/// Page in, snapshot out: extract, value, score, persist.
pub struct Pipeline {
    extractor: Box<dyn ListingExtractor>,
    valuation: Box<dyn ValuationSource>,
    store: SnapshotStore,
    placeholder_image: String,
}

impl Pipeline {
    pub fn new(
        extractor: Box<dyn ListingExtractor>,
        valuation: Box<dyn ValuationSource>,
        store: SnapshotStore,
        placeholder_image: impl Into<String>,
    ) -> Self {
        Self {
            extractor,
            valuation,
            store,
            placeholder_image: placeholder_image.into(),
        }
    }

    /// Mercari extractor, mirrored valuations, store from config
    pub fn from_config(config: &ScoutConfig) -> Result<Self> {
        Ok(Self::new(
            Box::new(MercariExtractor::with_config(&config.extractor)?),
            Box::new(MirrorPrice),
            config.store(),
            config.placeholder_image.clone(),
        ))
    }

    pub fn with_valuation(mut self, valuation: Box<dyn ValuationSource>) -> Self {
        self.valuation = valuation;
        self
    }

    pub fn run(&self, page: RawPage) -> Result<PipelineReport> {
        self.run_at(page, Local::now())
    }

    /// Run with an explicit snapshot time
    pub fn run_at(&self, page: RawPage, taken_at: DateTime<Local>) -> Result<PipelineReport> {
        info!("Extracting {} listings ({} bytes)", self.extractor.source_name(), page.byte_len());
        let extracted = self.extractor.extract(&page)?;
        drop(page);

        let candidates = score_all(extracted, self.valuation.as_ref());
        let snapshot = ListingSnapshot::new(taken_at, &candidates, &self.placeholder_image);
        let outcome = self.store.save(&snapshot)?;

        Ok(PipelineReport {
            candidates,
            snapshot,
            outcome,
        })
    }
}
