use crate::error::Result;
use crate::models::{ListingCandidate, RawPage};

/// Common trait for listing extractors
/// Each marketplace with its own page layout gets one implementation
pub trait ListingExtractor {
    /// Extract listings from a saved page, in page order
    fn extract(&self, page: &RawPage) -> Result<Vec<ListingCandidate>>;

    /// Get the name of the marketplace this extractor understands
    fn source_name(&self) -> &'static str;
}
