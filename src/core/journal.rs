//! Best-effort append-only execution journal.
//!
//! Records are stored as newline-delimited JSON (JSONL) for easy
//! inspection with standard tooling. The journal is a fire-and-forget
//! observability sink: append failures are swallowed so that a full disk
//! or a permission problem can never take down a run. There is no
//! rotation or size bound; that is left to external log management.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use sha2::{Digest, Sha256};
use tokio::fs::{File, OpenOptions};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::debug;

use crate::domain::JournalRecord;

/// File-based execution journal using JSONL format
#[derive(Debug, Clone)]
pub struct Journal {
    path: PathBuf,
}

impl Journal {
    /// Create a journal handle for the given log file path
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Path of the journal file
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Append a record, discarding any failure.
    ///
    /// The error channel stops here: a full disk or bad permissions must
    /// not take down the run.
    pub async fn append(&self, record: &JournalRecord) {
        if let Err(err) = self.try_append(record).await {
            debug!(error = %err, "journal record dropped");
        }
    }

    async fn try_append(&self, record: &JournalRecord) -> Result<()> {
        let json = serde_json::to_string(record).context("Failed to serialize journal record")?;

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await
            .with_context(|| format!("Failed to open journal: {}", self.path.display()))?;

        file.write_all(format!("{}\n", json).as_bytes())
            .await
            .context("Failed to write journal record")?;
        file.flush().await.context("Failed to flush journal")?;

        Ok(())
    }

    /// Read all records back in append order.
    ///
    /// Unlike `append`, reading is allowed to fail: it is a diagnostic
    /// operation, not part of the run path.
    pub async fn replay(&self) -> Result<Vec<JournalRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let file = File::open(&self.path)
            .await
            .with_context(|| format!("Failed to open journal: {}", self.path.display()))?;

        let reader = BufReader::new(file);
        let mut lines = reader.lines();
        let mut records = Vec::new();

        while let Some(line) = lines.next_line().await? {
            if line.trim().is_empty() {
                continue;
            }
            let record: JournalRecord = serde_json::from_str(&line)
                .with_context(|| format!("Failed to parse journal record: {}", line))?;
            records.push(record);
        }

        Ok(records)
    }
}

/// Short content fingerprint (first 16 hex chars of SHA-256).
///
/// Used to correlate journal spans with the request that produced them
/// without copying the request into the journal.
pub fn fingerprint(content: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(content.as_bytes());
    let digest = hasher.finalize();
    hex::encode(&digest[..8])
}
