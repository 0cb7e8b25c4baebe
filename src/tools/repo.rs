//! Rooted file operations for agent-written artifacts.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;

/// File operations rooted at one directory
#[derive(Debug, Clone)]
pub struct RepoOps {
    root: PathBuf,
}

impl RepoOps {
    /// Create operations rooted at `root` (created lazily on first write)
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Root directory
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Write `content` to `rel_path` under the root, creating parents
    pub async fn write_file(&self, rel_path: &str, content: &str) -> Result<PathBuf> {
        let path = self.root.join(rel_path);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Failed to create directory: {}", parent.display()))?;
        }

        fs::write(&path, content)
            .await
            .with_context(|| format!("Failed to write file: {}", path.display()))?;

        Ok(path)
    }

    /// Ensure `rel_dir` exists and carries a `.gitkeep` marker
    pub async fn ensure_gitkeep(&self, rel_dir: &str) -> Result<()> {
        let dir = self.root.join(rel_dir);
        fs::create_dir_all(&dir)
            .await
            .with_context(|| format!("Failed to create directory: {}", dir.display()))?;

        fs::write(dir.join(".gitkeep"), "")
            .await
            .with_context(|| format!("Failed to write .gitkeep in {}", dir.display()))?;

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_write_file_creates_parents() {
        let temp = TempDir::new().unwrap();
        let repo = RepoOps::new(temp.path().join("app"));

        let path = repo.write_file("docs/README.md", "# hi\n").await.unwrap();

        assert!(path.ends_with("app/docs/README.md"));
        assert_eq!(std::fs::read_to_string(path).unwrap(), "# hi\n");
    }

    #[tokio::test]
    async fn test_ensure_gitkeep() {
        let temp = TempDir::new().unwrap();
        let repo = RepoOps::new(temp.path().join("app"));

        repo.ensure_gitkeep(".").await.unwrap();

        assert!(temp.path().join("app/.gitkeep").exists());
    }
}
