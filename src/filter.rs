use crate::models::{Category, GradingCompany, SnapshotRow};

/// Display-side filters over a snapshot table. Every bound is optional;
/// an empty filter keeps all rows.
#[derive(Debug, Clone, Default)]
pub struct ListingFilter {
    pub min_price: Option<f64>,
    pub max_price: Option<f64>,
    pub min_flip_score: Option<f64>,
    /// Case-insensitive substring of the card title
    pub query: Option<String>,
    pub category: Option<Category>,
    pub grading: Option<GradingCompany>,
}

impl ListingFilter {
    pub fn matches(&self, row: &SnapshotRow) -> bool {
        if self.min_price.is_some_and(|min| row.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| row.price > max) {
            return false;
        }
        if self.min_flip_score.is_some_and(|min| row.flip_score < min) {
            return false;
        }
        if let Some(query) = self.query.as_deref().map(str::trim).filter(|q| !q.is_empty()) {
            if !row.card.to_lowercase().contains(&query.to_lowercase()) {
                return false;
            }
        }
        if self.category.is_some_and(|c| row.category() != c) {
            return false;
        }
        if self.grading.is_some() && row.grading() != self.grading {
            return false;
        }
        true
    }

    /// Rows that pass, in their original order
    pub fn apply<'a>(&self, rows: &'a [SnapshotRow]) -> Vec<&'a SnapshotRow> {
        rows.iter().filter(|row| self.matches(row)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(card: &str, price: f64, flip_score: f64) -> SnapshotRow {
        SnapshotRow {
            card: card.to_string(),
            price,
            avg_sold: price,
            flip_score,
            link: "https://www.mercari.com/item/1/".to_string(),
            image: "https://via.placeholder.com/100".to_string(),
        }
    }

    fn table() -> Vec<SnapshotRow> {
        vec![
            row("2020 Topps Chrome Luis Robert PSA 10", 42.5, 17.5),
            row("2019 Prizm Ja Morant Rookie PSA 10", 72.0, 16.0),
            row("2021 Select Trevor Lawrence Silver SGC 9", 28.0, 7.0),
        ]
    }

    fn cards<'a>(rows: &[&'a SnapshotRow]) -> Vec<&'a str> {
        rows.iter().map(|r| r.card.as_str()).collect()
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let rows = table();
        assert_eq!(ListingFilter::default().apply(&rows).len(), 3);
    }

    #[test]
    fn price_range_and_min_score() {
        let rows = table();
        let filter = ListingFilter {
            min_price: Some(10.0),
            max_price: Some(100.0),
            min_flip_score: Some(10.0),
            ..Default::default()
        };
        assert_eq!(
            cards(&filter.apply(&rows)),
            vec!["2020 Topps Chrome Luis Robert PSA 10", "2019 Prizm Ja Morant Rookie PSA 10"]
        );
    }

    #[test]
    fn query_is_case_insensitive_substring() {
        let rows = table();
        let filter = ListingFilter {
            query: Some("MORANT".to_string()),
            ..Default::default()
        };
        assert_eq!(cards(&filter.apply(&rows)), vec!["2019 Prizm Ja Morant Rookie PSA 10"]);
    }

    #[test]
    fn blank_query_is_ignored() {
        let rows = table();
        let filter = ListingFilter {
            query: Some("  ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.apply(&rows).len(), 3);
    }

    #[test]
    fn category_and_grading() {
        let rows = table();
        let football = ListingFilter {
            category: Some(Category::Football),
            ..Default::default()
        };
        assert_eq!(cards(&football.apply(&rows)), vec!["2021 Select Trevor Lawrence Silver SGC 9"]);

        let psa = ListingFilter {
            grading: Some(GradingCompany::Psa),
            ..Default::default()
        };
        assert_eq!(psa.apply(&rows).len(), 2);
    }
}
