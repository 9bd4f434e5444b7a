pub mod mercari;
pub mod traits;
pub mod types;

pub use mercari::{parse_price, MercariExtractor};
pub use traits::ListingExtractor;
pub use types::ExtractorConfig;
