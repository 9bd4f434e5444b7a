/// Selectors and origin used to pull listings out of a saved page
#[derive(Debug, Clone)]
pub struct ExtractorConfig {
    /// Marks one listing-cell
    pub cell_selector: String,
    /// Title text, looked up inside a cell
    pub title_selector: String,
    /// Price text, looked up inside a cell
    pub price_selector: String,
    /// Anchor carrying the listing href
    pub link_selector: String,
    /// Origin relative hrefs are resolved against
    pub base_url: String,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            cell_selector: "li[data-testid='ItemCell']".to_string(),
            title_selector: "p".to_string(),
            price_selector: "div[data-testid='ItemCellPrice']".to_string(),
            link_selector: "a".to_string(),
            base_url: "https://www.mercari.com".to_string(),
        }
    }
}
