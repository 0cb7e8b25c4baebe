//! Agent registry loading and resolution.
//!
//! The registry translates a declarative YAML document into a live
//! mapping from agent short-name to factory. Implementations are
//! resolved against a static registration table, so a typo in the
//! config fails fast at construction instead of surfacing mid-run.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use super::{
    Agent, AgentContext, Architect, BackendDev, Echo, Integrator, Planner, Probe, QaTester,
};

/// Factory producing a fresh agent for one step invocation
pub type AgentFactory = fn(AgentContext) -> Box<dyn Agent>;

/// Agent short-names known to the builtin table
const BUILTIN_NAMES: &[&str] = &[
    "planner",
    "architect",
    "backend",
    "qa",
    "integrator",
    "echo",
    "probe",
];

/// Errors raised while resolving the declared registry.
///
/// These are fatal at construction: a broken registry must not produce
/// a partially usable runner.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RegistryError {
    #[error("unknown agent '{name}': no builtin implementation module")]
    UnknownAgent { name: String },

    #[error("agent '{name}' declares unknown type '{type_name}'")]
    UnknownType { name: String, type_name: String },
}

/// YAML schema of the agent configuration document
#[derive(Debug, Deserialize)]
struct AgentsConfig {
    agents: BTreeMap<String, AgentEntry>,
}

#[derive(Debug, Deserialize)]
struct AgentEntry {
    #[serde(rename = "type")]
    type_name: String,
}

/// Live mapping from agent short-name to factory
pub struct AgentRegistry {
    factories: BTreeMap<String, AgentFactory>,
}

impl AgentRegistry {
    /// Load and resolve the registry from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read agent config: {}", path.display()))?;

        Self::from_yaml(&content)
            .with_context(|| format!("Failed to resolve agent config: {}", path.display()))
    }

    /// Parse and resolve the registry from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let config: AgentsConfig =
            serde_yaml::from_str(content).context("Failed to parse agent config YAML")?;

        let mut factories = BTreeMap::new();
        for (name, entry) in config.agents {
            let factory = resolve_builtin(&name, &entry.type_name)?;
            factories.insert(name, factory);
        }

        Ok(Self { factories })
    }

    /// Whether a short-name is registered
    pub fn contains(&self, name: &str) -> bool {
        self.factories.contains_key(name)
    }

    /// Registered short-names, in deterministic order
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.factories.keys().map(String::as_str)
    }

    /// Instantiate a fresh agent for one invocation
    pub fn create(&self, name: &str, ctx: AgentContext) -> Option<Box<dyn Agent>> {
        self.factories.get(name).map(|factory| factory(ctx))
    }
}

impl std::fmt::Debug for AgentRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AgentRegistry")
            .field("names", &self.factories.keys().collect::<Vec<_>>())
            .finish()
    }
}

/// Resolve a declared `(short_name, type)` pair against the builtin table
fn resolve_builtin(name: &str, type_name: &str) -> Result<AgentFactory, RegistryError> {
    let factory: AgentFactory = match (name, type_name) {
        ("planner", "Planner") => |ctx| Box::new(Planner::new(ctx)),
        ("architect", "Architect") => |ctx| Box::new(Architect::new(ctx)),
        ("backend", "BackendDev") => |ctx| Box::new(BackendDev::new(ctx)),
        ("qa", "QaTester") => |ctx| Box::new(QaTester::new(ctx)),
        ("integrator", "Integrator") => |ctx| Box::new(Integrator::new(ctx)),
        ("echo", "Echo") => |ctx| Box::new(Echo::new(ctx)),
        ("probe", "Probe") => |ctx| Box::new(Probe::new(ctx)),
        _ => {
            return Err(if BUILTIN_NAMES.contains(&name) {
                RegistryError::UnknownType {
                    name: name.to_string(),
                    type_name: type_name.to_string(),
                }
            } else {
                RegistryError::UnknownAgent {
                    name: name.to_string(),
                }
            })
        }
    };
    Ok(factory)
}
