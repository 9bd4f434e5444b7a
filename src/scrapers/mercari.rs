use crate::error::{Result, ScoutError};
use crate::models::{ListingCandidate, RawPage, Source};
use crate::scrapers::traits::ListingExtractor;
use crate::scrapers::types::ExtractorConfig;
use scraper::{ElementRef, Html, Selector};
use tracing::{debug, info};
use url::Url;

/// Extractor for saved Mercari search-results pages
pub struct MercariExtractor {
    cell: Selector,
    title: Selector,
    price: Selector,
    link: Selector,
    base_url: Url,
}

impl MercariExtractor {
    /// Create an extractor with the default Mercari selectors
    pub fn new() -> Result<Self> {
        Self::with_config(&ExtractorConfig::default())
    }

    /// Create an extractor with custom selectors / origin
    pub fn with_config(config: &ExtractorConfig) -> Result<Self> {
        let base_url = Url::parse(&config.base_url)
            .map_err(|e| ScoutError::Config(format!("base url `{}`: {}", config.base_url, e)))?;

        Ok(Self {
            cell: parse_selector(&config.cell_selector)?,
            title: parse_selector(&config.title_selector)?,
            price: parse_selector(&config.price_selector)?,
            link: parse_selector(&config.link_selector)?,
            base_url,
        })
    }

    fn parse_cell(&self, cell: ElementRef<'_>) -> ListingCandidate {
        let title = cell
            .select(&self.title)
            .next()
            .map(element_text)
            .filter(|t| !t.is_empty());

        let price = cell
            .select(&self.price)
            .next()
            .map(element_text)
            .and_then(|text| parse_price(&text));

        let link = cell
            .select(&self.link)
            .next()
            .and_then(|a| a.value().attr("href"))
            .and_then(|href| self.resolve_link(href));

        ListingCandidate::new(Source::Mercari, title, price, link)
    }

    /// Resolve an href against the marketplace origin. Only http(s) targets
    /// count as a link.
    fn resolve_link(&self, href: &str) -> Option<String> {
        let href = href.trim();
        if href.is_empty() {
            return None;
        }
        let url = self.base_url.join(href).ok()?;
        matches!(url.scheme(), "http" | "https").then(|| url.to_string())
    }
}

impl ListingExtractor for MercariExtractor {
    fn extract(&self, page: &RawPage) -> Result<Vec<ListingCandidate>> {
        if page.is_blank() {
            info!("Page is empty, nothing to extract");
            return Ok(Vec::new());
        }
        if !page.markup().contains('<') {
            return Err(ScoutError::Unparseable(
                "document contains no markup".to_string(),
            ));
        }

        debug!("Parsing {} bytes of HTML", page.byte_len());
        let document = Html::parse_document(page.markup());

        let listings: Vec<ListingCandidate> = document
            .select(&self.cell)
            .enumerate()
            .map(|(idx, cell)| {
                let listing = self.parse_cell(cell);
                debug!(
                    "Cell {}: title={:?} price={:?} link={:?}",
                    idx, listing.title, listing.price, listing.link
                );
                listing
            })
            .collect();

        info!("Found {} listing cells in HTML", listings.len());
        Ok(listings)
    }

    fn source_name(&self) -> &'static str {
        "Mercari"
    }
}

fn parse_selector(selector: &str) -> Result<Selector> {
    Selector::parse(selector).map_err(|e| ScoutError::Selector {
        selector: selector.to_string(),
        reason: e.to_string(),
    })
}

/// Text content of an element with runs of whitespace collapsed
fn element_text(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parse a displayed price such as `$1,234.56`.
///
/// Currency symbols, thousands separators and whitespace are dropped. Anything
/// that still isn't a finite, non-negative number is treated as no price.
pub fn parse_price(text: &str) -> Option<f64> {
    let cleaned: String = text
        .chars()
        .filter(|c| !matches!(c, '$' | '€' | '£' | '¥' | ',') && !c.is_whitespace())
        .collect();

    let value = cleaned.parse::<f64>().ok()?;
    if !value.is_finite() || value < 0.0 {
        return None;
    }
    // -0.0 passes the sign check above
    Some(if value == 0.0 { 0.0 } else { value })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cell(inner: &str) -> String {
        format!(r#"<li data-testid="ItemCell">{}</li>"#, inner)
    }

    fn page(cells: &[String]) -> RawPage {
        RawPage::new(format!("<html><body><ul>{}</ul></body></html>", cells.concat()))
    }

    fn extract(cells: &[String]) -> Vec<ListingCandidate> {
        MercariExtractor::new().unwrap().extract(&page(cells)).unwrap()
    }

    #[test]
    fn parses_prices_with_symbols_and_separators() {
        assert_eq!(parse_price("$1,234.56"), Some(1234.56));
        assert_eq!(parse_price(" $42.50 "), Some(42.5));
        assert_eq!(parse_price("$ 7"), Some(7.0));
    }

    #[test]
    fn garbage_and_negative_prices_are_absent() {
        assert_eq!(parse_price("Sold"), None);
        assert_eq!(parse_price(""), None);
        assert_eq!(parse_price("-$5.00"), None);
        assert_eq!(parse_price("NaN"), None);
        assert_eq!(parse_price("inf"), None);
        assert_eq!(parse_price("-0"), Some(0.0));
    }

    #[test]
    fn extracts_complete_cell() {
        let listings = extract(&[cell(
            r#"<a href="/item/m123/"><p>  2020 Topps   Chrome </p><div data-testid="ItemCellPrice"><span>$</span>42.50</div></a>"#,
        )]);

        assert_eq!(listings.len(), 1);
        let listing = &listings[0];
        assert_eq!(listing.title.as_deref(), Some("2020 Topps Chrome"));
        assert_eq!(listing.price, Some(42.5));
        assert_eq!(listing.reference_sold, Some(42.5));
        assert_eq!(listing.link.as_deref(), Some("https://www.mercari.com/item/m123/"));
        assert_eq!(listing.image_url, None);
    }

    #[test]
    fn missing_sub_elements_degrade_per_field() {
        let listings = extract(&[
            cell(r#"<a href="/item/a/"><div data-testid="ItemCellPrice">$3</div></a>"#),
            cell(r#"<a href="/item/b/"><p>No price here</p></a>"#),
            cell(r#"<p>Unlinked</p><div data-testid="ItemCellPrice">$9</div>"#),
            cell(r#"<a><p>Anchor without href</p></a>"#),
        ]);

        assert_eq!(listings.len(), 4);
        assert_eq!(listings[0].title, None);
        assert_eq!(listings[1].price, None);
        assert_eq!(listings[1].reference_sold, None);
        assert_eq!(listings[2].link, None);
        assert_eq!(listings[3].link, None);
        assert_eq!(listings[3].title.as_deref(), Some("Anchor without href"));
    }

    #[test]
    fn absolute_hrefs_are_kept() {
        let listings = extract(&[cell(r#"<a href="https://example.com/x"><p>x</p></a>"#)]);
        assert_eq!(listings[0].link.as_deref(), Some("https://example.com/x"));
    }

    #[test]
    fn non_http_hrefs_are_not_links() {
        let listings = extract(&[cell(r#"<a href="javascript:void(0)"><p>x</p></a>"#)]);
        assert_eq!(listings[0].link, None);
    }

    #[test]
    fn preserves_page_order() {
        let titles = ["A", "B", "C"];
        let cells: Vec<String> = titles.iter().map(|t| cell(&format!("<p>{}</p>", t))).collect();
        let listings = extract(&cells);

        let got: Vec<&str> = listings.iter().filter_map(|l| l.title.as_deref()).collect();
        assert_eq!(got, titles);
    }

    #[test]
    fn tolerates_broken_markup() {
        let raw = RawPage::new(
            r#"<ul><li data-testid="ItemCell"><p>Open tag<img src=x/><div data-testid="ItemCellPrice">$5<li data-testid="ItemCell"><p>Second"#,
        );
        let listings = MercariExtractor::new().unwrap().extract(&raw).unwrap();
        assert_eq!(listings.len(), 2);
    }

    #[test]
    fn page_without_cells_is_empty_not_error() {
        assert!(extract(&[]).is_empty());
        let blank = MercariExtractor::new().unwrap().extract(&RawPage::new("  \n")).unwrap();
        assert!(blank.is_empty());
    }

    #[test]
    fn plain_text_is_unparseable() {
        let err = MercariExtractor::new()
            .unwrap()
            .extract(&RawPage::new("just some words"))
            .unwrap_err();
        assert!(matches!(err, ScoutError::Unparseable(_)));
    }

    #[test]
    fn bad_selector_is_reported() {
        let config = ExtractorConfig {
            cell_selector: "li[[".to_string(),
            ..ExtractorConfig::default()
        };
        assert!(matches!(
            MercariExtractor::with_config(&config),
            Err(ScoutError::Selector { .. })
        ));
    }
}
