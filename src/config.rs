use std::path::PathBuf;

use crate::error::Result;
use crate::models::PLACEHOLDER_IMAGE;
use crate::scrapers::ExtractorConfig;
use crate::storage::{SnapshotFormat, SnapshotStore};

pub const DEFAULT_OUT_DIR: &str = "snapshots";
pub const DEFAULT_PREFIX: &str = "mercari_results";

#[derive(Debug, Clone)]
pub struct ScoutConfig {
    /// Where snapshots are written (SCOUT_OUT_DIR)
    pub out_dir: PathBuf,
    /// Snapshot file name prefix (SCOUT_PREFIX)
    pub prefix: String,
    /// csv or json (SCOUT_FORMAT)
    pub format: SnapshotFormat,
    /// Image URL used for every row until thumbnails are extracted (SCOUT_PLACEHOLDER_IMAGE)
    pub placeholder_image: String,
    /// Fallback when RUST_LOG is unset (SCOUT_LOG_LEVEL)
    pub log_level: String,
    /// Base origin is read from SCOUT_BASE_URL
    pub extractor: ExtractorConfig,
}

impl Default for ScoutConfig {
    fn default() -> Self {
        Self {
            out_dir: PathBuf::from(DEFAULT_OUT_DIR),
            prefix: DEFAULT_PREFIX.to_string(),
            format: SnapshotFormat::Csv,
            placeholder_image: PLACEHOLDER_IMAGE.to_string(),
            log_level: "info".to_string(),
            extractor: ExtractorConfig::default(),
        }
    }
}

impl ScoutConfig {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys keep their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());

        Ok(Self {
            out_dir: var("SCOUT_OUT_DIR").map(PathBuf::from).unwrap_or(defaults.out_dir),
            prefix: var("SCOUT_PREFIX").unwrap_or(defaults.prefix),
            format: var("SCOUT_FORMAT")
                .map(|f| f.parse::<SnapshotFormat>())
                .transpose()?
                .unwrap_or(defaults.format),
            placeholder_image: var("SCOUT_PLACEHOLDER_IMAGE").unwrap_or(defaults.placeholder_image),
            log_level: var("SCOUT_LOG_LEVEL").unwrap_or(defaults.log_level),
            extractor: ExtractorConfig {
                base_url: var("SCOUT_BASE_URL").unwrap_or(defaults.extractor.base_url),
                ..defaults.extractor
            },
        })
    }

    pub fn store(&self) -> SnapshotStore {
        SnapshotStore::new(&self.out_dir, &self.prefix, self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ScoutError;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn unset_env_gives_defaults() {
        let config = ScoutConfig::from_lookup(lookup(&[])).unwrap();
        assert_eq!(config.out_dir, PathBuf::from(DEFAULT_OUT_DIR));
        assert_eq!(config.prefix, DEFAULT_PREFIX);
        assert_eq!(config.format, SnapshotFormat::Csv);
        assert_eq!(config.extractor.base_url, "https://www.mercari.com");
    }

    #[test]
    fn env_overrides_defaults() {
        let config = ScoutConfig::from_lookup(lookup(&[
            ("SCOUT_OUT_DIR", "/tmp/cards"),
            ("SCOUT_FORMAT", "JSON"),
            ("SCOUT_BASE_URL", "https://example.test"),
            ("SCOUT_PREFIX", " "),
        ]))
        .unwrap();
        assert_eq!(config.out_dir, PathBuf::from("/tmp/cards"));
        assert_eq!(config.format, SnapshotFormat::Json);
        assert_eq!(config.extractor.base_url, "https://example.test");
        assert_eq!(config.prefix, DEFAULT_PREFIX);
    }

    #[test]
    fn unknown_format_is_config_error() {
        let err = ScoutConfig::from_lookup(lookup(&[("SCOUT_FORMAT", "xlsx")])).unwrap_err();
        assert!(matches!(err, ScoutError::Config(_)));
    }
}
