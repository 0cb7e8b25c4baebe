//! Configuration for devforge paths.
//!
//! Configuration sources (highest priority first):
//! 1. Environment variables (DEVFORGE_HOME, DEVFORGE_WORKSPACE, DEVFORGE_AGENTS)
//! 2. Config file (.devforge/config.yaml)
//! 3. Defaults (./workspace, configs/agents.yaml, ~/.devforge)
//!
//! Config file discovery:
//! - Searches current directory and parents for .devforge/config.yaml
//! - Paths in the config file are relative to the config file's parent directory

use std::path::{Path, PathBuf};
use std::sync::OnceLock;

use anyhow::{Context, Result};
use serde::Deserialize;

/// Global cached configuration (stores Result to handle init errors)
static CONFIG: OnceLock<Result<ResolvedConfig, String>> = OnceLock::new();

/// Raw config file schema (matches YAML structure)
#[derive(Debug, Clone, Deserialize)]
pub struct ConfigFile {
    pub version: String,
    #[serde(default)]
    pub paths: PathsConfig,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PathsConfig {
    /// Workspace directory (relative to the config file's parent)
    pub workspace: Option<String>,
    /// Agent configuration document (relative to the config file's parent)
    pub agents: Option<String>,
}

/// Resolved configuration with absolute or CWD-relative paths
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// devforge home directory (user-level state)
    pub home: PathBuf,
    /// Default workspace root
    pub workspace: PathBuf,
    /// Default agent configuration document
    pub agents_config: PathBuf,
    /// Path to config file (if found)
    pub config_file: Option<PathBuf>,
}

/// Find config file by searching current directory and parents
fn find_config_file() -> Option<PathBuf> {
    let mut current = std::env::current_dir().ok()?;

    loop {
        let config_path = current.join(".devforge").join("config.yaml");
        if config_path.exists() {
            return Some(config_path);
        }

        if !current.pop() {
            break;
        }
    }

    None
}

/// Load and parse config file
fn load_config_file(path: &Path) -> Result<ConfigFile> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file: {}", path.display()))?;

    serde_yaml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", path.display()))
}

/// Resolve a path that may be relative to the config file's parent
fn resolve_path(base: &Path, path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_absolute() {
        path
    } else {
        base.join(path)
            .canonicalize()
            .unwrap_or_else(|_| base.join(path_str))
    }
}

/// Load configuration from all sources
fn load_config() -> Result<ResolvedConfig> {
    let home = if let Ok(env_home) = std::env::var("DEVFORGE_HOME") {
        PathBuf::from(env_home)
    } else {
        dirs::home_dir()
            .context("Failed to determine home directory")?
            .join(".devforge")
    };

    let config_file = find_config_file();
    let (file_workspace, file_agents) = match config_file.as_deref() {
        Some(config_path) => {
            let config = load_config_file(config_path)?;

            // Base directory is the parent of .devforge/ (the project root)
            let base_dir = config_path
                .parent()
                .and_then(|p| p.parent())
                .unwrap_or(Path::new("."));

            (
                config
                    .paths
                    .workspace
                    .map(|workspace| resolve_path(base_dir, &workspace)),
                config
                    .paths
                    .agents
                    .map(|agents| resolve_path(base_dir, &agents)),
            )
        }
        None => (None, None),
    };

    let workspace = std::env::var("DEVFORGE_WORKSPACE")
        .map(PathBuf::from)
        .ok()
        .or(file_workspace)
        .unwrap_or_else(|| PathBuf::from("workspace"));

    let agents_config = std::env::var("DEVFORGE_AGENTS")
        .map(PathBuf::from)
        .ok()
        .or(file_agents)
        .unwrap_or_else(|| PathBuf::from("configs").join("agents.yaml"));

    Ok(ResolvedConfig {
        home,
        workspace,
        agents_config,
        config_file,
    })
}

/// Get the global configuration (loads once, then cached)
pub fn config() -> Result<&'static ResolvedConfig> {
    let result = CONFIG.get_or_init(|| load_config().map_err(|e| e.to_string()));

    match result {
        Ok(config) => Ok(config),
        Err(e) => anyhow::bail!("{}", e),
    }
}

/// Force reload configuration (useful for testing)
pub fn reload_config() -> Result<ResolvedConfig> {
    load_config()
}

/// Default workspace root for CLI invocations
pub fn default_workspace() -> Result<PathBuf> {
    Ok(config()?.workspace.clone())
}

/// Default agent configuration document for CLI invocations
pub fn default_agents_config() -> Result<PathBuf> {
    Ok(config()?.agents_config.clone())
}
