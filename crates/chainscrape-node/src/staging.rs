//! Reads the worker's progress from its staging folder.
//!
//! The worker writes one file per staged chunk, named
//! `<first>-<last>.txt` with both block numbers zero-padded to nine digits.
//! The highest `<last>` is the staging block.

use std::io::ErrorKind;
use std::path::PathBuf;

use chainscrape_core::error::ScrapeError;

#[derive(Debug, Clone)]
pub struct StagingFolder {
    path: PathBuf,
}

impl StagingFolder {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Highest staged block. A missing or empty folder reports `0`.
    pub async fn staging_block(&self) -> Result<u64, ScrapeError> {
        let mut entries = match tokio::fs::read_dir(&self.path).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(0),
            Err(e) => return Err(self.error(e)),
        };

        let mut highest = 0;
        while let Some(entry) = entries.next_entry().await.map_err(|e| self.error(e))? {
            if let Some(last) = entry.file_name().to_str().and_then(parse_chunk_name) {
                highest = highest.max(last);
            }
        }
        Ok(highest)
    }

    fn error(&self, e: std::io::Error) -> ScrapeError {
        ScrapeError::Staging {
            path: self.path.display().to_string(),
            reason: e.to_string(),
        }
    }
}

/// Parse `000000000-000012345.txt` into its last block number.
pub fn parse_chunk_name(name: &str) -> Option<u64> {
    let stem = name.strip_suffix(".txt")?;
    let (first, last) = stem.split_once('-')?;
    let first: u64 = first.parse().ok()?;
    let last: u64 = last.parse().ok()?;
    (first <= last).then_some(last)
}
