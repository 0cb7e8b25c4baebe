//! Durable key-value storage for step outputs.
//!
//! The store is one JSON document on disk, keyed by step id. Every read
//! loads the whole document and every write rewrites it, so callers
//! always observe the latest on-disk state at O(document size) per call.
//! There is no locking: one runner per workspace at a time is assumed.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};
use tokio::fs;

/// File-backed flow memory, surviving process restarts within a workspace
#[derive(Debug, Clone)]
pub struct FlowMemory {
    path: PathBuf,
}

impl FlowMemory {
    /// Open the store at `path`, creating an empty document if absent.
    ///
    /// Pre-existing content is preserved: the store is the workspace's
    /// durable audit trail across runs.
    pub async fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await.with_context(|| {
                format!("Failed to create memory directory: {}", parent.display())
            })?;
        }

        let memory = Self { path };
        if !memory.path.exists() {
            memory.write_document(&Map::new()).await?;
        }

        Ok(memory)
    }

    /// Path of the backing document
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Return the stored value for `key`, or None if absent.
    ///
    /// Reads the backing document fresh on every call; malformed content
    /// is a fatal parse error, not a silent reset.
    pub async fn get(&self, key: &str) -> Result<Option<Value>> {
        let document = self.read_document().await?;
        Ok(document.get(key).cloned())
    }

    /// Store `value` under `key`, rewriting the whole document
    pub async fn set(&self, key: &str, value: Value) -> Result<()> {
        let mut document = self.read_document().await?;
        document.insert(key.to_string(), value);
        self.write_document(&document).await
    }

    async fn read_document(&self) -> Result<Map<String, Value>> {
        let content = fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("Failed to read flow memory: {}", self.path.display()))?;

        serde_json::from_str(&content)
            .with_context(|| format!("Corrupted flow memory document: {}", self.path.display()))
    }

    async fn write_document(&self, document: &Map<String, Value>) -> Result<()> {
        let content = serde_json::to_string_pretty(document)
            .context("Failed to serialize flow memory document")?;

        fs::write(&self.path, content)
            .await
            .with_context(|| format!("Failed to write flow memory: {}", self.path.display()))
    }
}
