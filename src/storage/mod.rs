pub mod csv;

use std::fs;
use std::io::{BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::str::FromStr;

use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::error::{Result, ScoutError};
use crate::models::{ListingSnapshot, SnapshotRow};

/// How many `_<n>` suffixes to try when a same-second snapshot already exists
const MAX_PUBLISH_ATTEMPTS: u32 = 100;

const TIMESTAMP_FORMAT: &str = "%Y%m%d_%H%M%S";

/// On-disk table format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SnapshotFormat {
    #[default]
    Csv,
    Json,
}

impl SnapshotFormat {
    pub fn ext(&self) -> &'static str {
        match self {
            SnapshotFormat::Csv => "csv",
            SnapshotFormat::Json => "json",
        }
    }

    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension().and_then(|e| e.to_str()).and_then(|e| e.parse().ok())
    }
}

impl FromStr for SnapshotFormat {
    type Err = ScoutError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" => Ok(SnapshotFormat::Csv),
            "json" => Ok(SnapshotFormat::Json),
            other => Err(ScoutError::Config(format!("unknown snapshot format `{}`", other))),
        }
    }
}

/// What a save call did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveOutcome {
    Written(PathBuf),
    /// Table had no rows; no file was created
    Empty,
}

/// Writes snapshots as `<prefix>_<YYYYMMDD_HHMMSS>.<ext>` under one directory.
///
/// Each file is written to a temp file in the same directory and only then
/// linked into place without replacing anything, so readers never see a
/// partial snapshot and an earlier run's file is never overwritten. Runs in
/// the same second get a `_<n>` suffix. Two processes saving into the same
/// directory at once are not otherwise coordinated.
#[derive(Debug, Clone)]
pub struct SnapshotStore {
    out_dir: PathBuf,
    prefix: String,
    format: SnapshotFormat,
}

impl SnapshotStore {
    pub fn new(out_dir: impl Into<PathBuf>, prefix: impl Into<String>, format: SnapshotFormat) -> Self {
        Self {
            out_dir: out_dir.into(),
            prefix: prefix.into(),
            format,
        }
    }

    pub fn save(&self, snapshot: &ListingSnapshot) -> Result<SaveOutcome> {
        if snapshot.is_empty() {
            warn!("No listings in snapshot, nothing written");
            return Ok(SaveOutcome::Empty);
        }

        fs::create_dir_all(&self.out_dir)?;

        let mut tmp = tempfile::Builder::new()
            .prefix(".snapshot-")
            .suffix(".tmp")
            .tempfile_in(&self.out_dir)?;

        {
            let mut writer = BufWriter::new(tmp.as_file_mut());
            write_rows(&mut writer, &snapshot.rows, self.format)?;
            writer.flush()?;
        }
        tmp.as_file().sync_all()?;

        let stamp = snapshot.taken_at.format(TIMESTAMP_FORMAT).to_string();
        let path = self.publish(tmp, &stamp)?;

        info!("💾 Saved {} listings to {}", snapshot.len(), path.display());
        Ok(SaveOutcome::Written(path))
    }

    fn file_name(&self, stamp: &str, attempt: u32) -> String {
        match attempt {
            0 => format!("{}_{}.{}", self.prefix, stamp, self.format.ext()),
            n => format!("{}_{}_{}.{}", self.prefix, stamp, n, self.format.ext()),
        }
    }

    fn publish(&self, mut tmp: NamedTempFile, stamp: &str) -> Result<PathBuf> {
        for attempt in 0..MAX_PUBLISH_ATTEMPTS {
            let path = self.out_dir.join(self.file_name(stamp, attempt));
            match tmp.persist_noclobber(&path) {
                Ok(_) => return Ok(path),
                Err(e) if e.error.kind() == ErrorKind::AlreadyExists => {
                    debug!("{} already exists, trying next suffix", path.display());
                    tmp = e.file;
                }
                Err(e) => return Err(e.error.into()),
            }
        }

        Err(ScoutError::Io(std::io::Error::new(
            ErrorKind::AlreadyExists,
            format!("no free snapshot name for {}_{}", self.prefix, stamp),
        )))
    }

    /// Most recent snapshot in the directory for this prefix, any format.
    pub fn latest(&self) -> Result<Option<PathBuf>> {
        latest_snapshot(&self.out_dir, &self.prefix)
    }
}

fn write_rows<W: Write>(mut w: W, rows: &[SnapshotRow], format: SnapshotFormat) -> Result<()> {
    match format {
        SnapshotFormat::Csv => {
            csv::write_record(&mut w, &SnapshotRow::HEADERS)?;
            for row in rows {
                csv::write_record(
                    &mut w,
                    &[
                        row.card.clone(),
                        row.price.to_string(),
                        row.avg_sold.to_string(),
                        row.flip_score.to_string(),
                        row.link.clone(),
                        row.image.clone(),
                    ],
                )?;
            }
        }
        SnapshotFormat::Json => {
            serde_json::to_writer_pretty(&mut w, rows)?;
            w.write_all(b"\n")?;
        }
    }
    Ok(())
}

/// Read a snapshot file back into rows. Format follows the file extension.
pub fn load_snapshot(path: impl AsRef<Path>) -> Result<Vec<SnapshotRow>> {
    let path = path.as_ref();
    let format = SnapshotFormat::from_path(path).ok_or_else(|| malformed(path, "unknown file extension"))?;
    let text = fs::read_to_string(path)?;

    let rows = match format {
        SnapshotFormat::Json => serde_json::from_str(&text)?,
        SnapshotFormat::Csv => parse_csv_rows(path, &text)?,
    };
    debug!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

fn parse_csv_rows(path: &Path, text: &str) -> Result<Vec<SnapshotRow>> {
    let mut records = csv::parse_records(text).into_iter();

    match records.next() {
        Some(header) if header == SnapshotRow::HEADERS => {}
        Some(header) => return Err(malformed(path, &format!("unexpected header {:?}", header))),
        None => return Ok(Vec::new()),
    }

    records
        .enumerate()
        .map(|(i, record)| -> Result<SnapshotRow> {
            let line = i + 2;
            let [card, price, avg_sold, flip_score, link, image]: [String; 6] = record
                .try_into()
                .map_err(|r: Vec<String>| malformed(path, &format!("line {}: expected 6 columns, got {}", line, r.len())))?;

            let number = |field: &str, column: &str| {
                field
                    .parse::<f64>()
                    .map_err(|_| malformed(path, &format!("line {}: bad {} `{}`", line, column, field)))
            };

            Ok(SnapshotRow {
                price: number(&price, "Price")?,
                avg_sold: number(&avg_sold, "Avg Sold")?,
                flip_score: number(&flip_score, "Flip Score")?,
                card,
                link,
                image,
            })
        })
        .collect()
}

fn malformed(path: &Path, reason: &str) -> ScoutError {
    ScoutError::Snapshot {
        path: path.display().to_string(),
        reason: reason.to_string(),
    }
}

/// Find the newest `<prefix>_<timestamp>[_n].<ext>` file in `dir`.
pub fn latest_snapshot(dir: impl AsRef<Path>, prefix: &str) -> Result<Option<PathBuf>> {
    let dir = dir.as_ref();
    if !dir.exists() {
        return Ok(None);
    }

    let mut best: Option<((String, u32), PathBuf)> = None;
    for entry in fs::read_dir(dir)? {
        let path = entry?.path();
        if SnapshotFormat::from_path(&path).is_none() {
            continue;
        }
        let Some(key) = path
            .file_stem()
            .and_then(|s| s.to_str())
            .and_then(|stem| snapshot_key(stem, prefix))
        else {
            continue;
        };
        if best.as_ref().map_or(true, |(best_key, _)| key > *best_key) {
            best = Some((key, path));
        }
    }

    Ok(best.map(|(_, path)| path))
}

/// Sort key (timestamp, collision suffix) for a snapshot file stem
fn snapshot_key(stem: &str, prefix: &str) -> Option<(String, u32)> {
    let rest = stem.strip_prefix(prefix)?.strip_prefix('_')?;
    let stamp = rest.get(..15)?;
    chrono::NaiveDateTime::parse_from_str(stamp, TIMESTAMP_FORMAT).ok()?;

    let suffix = match &rest[15..] {
        "" => 0,
        s => s.strip_prefix('_')?.parse().ok()?,
    };
    Some((stamp.to_string(), suffix))
}
