use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::metrics::Metrics;

#[derive(Debug, Error)]
pub enum ResultsError {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),
}

/// One row of the results history
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionRecord {
    pub date: DateTime<Local>,
    pub phrases: usize,
    pub words: usize,
    pub chars: usize,
    pub errors: usize,
    pub elapsed_secs: f64,
    pub wpm: f64,
    pub accuracy: f64,
}

impl SessionRecord {
    pub fn new(phrases: usize, metrics: &Metrics, date: DateTime<Local>) -> Self {
        Self {
            date,
            phrases,
            words: metrics.word_count,
            chars: metrics.total_chars,
            errors: metrics.errors,
            elapsed_secs: (metrics.duration.as_secs_f64() * 100.0).round() / 100.0,
            wpm: metrics.wpm,
            accuracy: metrics.accuracy,
        }
    }
}

/// Append-only CSV log of finished sessions
#[derive(Debug, Clone)]
pub struct ResultsLog {
    path: PathBuf,
}

impl ResultsLog {
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    pub fn append(&self, record: &SessionRecord) -> Result<(), ResultsError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let file = OpenOptions::new()
            .append(true)
            .create(true)
            .open(&self.path)?;
        // an empty file gets a header row
        let needs_header = file.metadata()?.len() == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(needs_header)
            .from_writer(file);
        writer.serialize(record)?;
        writer.flush()?;
        Ok(())
    }

    /// The last `n` records, oldest first
    pub fn recent(&self, n: usize) -> Result<Vec<SessionRecord>, ResultsError> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.path)?;
        let records = reader
            .deserialize()
            .collect::<Result<Vec<SessionRecord>, _>>()?;
        let skip = records.len().saturating_sub(n);
        Ok(records.into_iter().skip(skip).collect())
    }

    pub fn best_wpm(&self) -> Result<Option<f64>, ResultsError> {
        let records = self.recent(usize::MAX)?;
        Ok(records.iter().map(|r| r.wpm).reduce(f64::max))
    }
}
