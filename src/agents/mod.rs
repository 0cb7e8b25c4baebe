//! Agent interfaces and builtin implementations.
//!
//! An agent is a polymorphic unit of work: constructed from a per-run
//! context, invoked once with an input payload, returning a titled
//! payload or an error. The runner never inspects agent internals.

pub mod architect;
pub mod backend;
pub mod echo;
pub mod integrator;
pub mod planner;
pub mod probe;
pub mod qa;
pub mod registry;

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

// Re-export the builtin agents and the registry
pub use architect::Architect;
pub use backend::BackendDev;
pub use echo::Echo;
pub use integrator::Integrator;
pub use planner::Planner;
pub use probe::Probe;
pub use qa::QaTester;
pub use registry::{AgentRegistry, RegistryError};

/// Per-run context handed to each agent at construction.
///
/// Immutable after construction; the scratch mapping is transient and
/// never persisted (durable outputs go through FlowMemory).
#[derive(Debug, Clone)]
pub struct AgentContext {
    /// Workspace root the agent may write artifacts under
    pub workspace: PathBuf,

    /// Transient in-memory scratch space
    pub scratch: HashMap<String, Value>,
}

impl AgentContext {
    /// Create a context rooted at the given workspace
    pub fn new(workspace: impl AsRef<Path>) -> Self {
        Self {
            workspace: workspace.as_ref().to_path_buf(),
            scratch: HashMap::new(),
        }
    }
}

/// The output contract every agent must fulfill
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentResult {
    /// Human-readable label for the produced payload
    pub title: String,

    /// The payload stored in FlowMemory and threaded to later steps
    pub payload: Value,
}

impl AgentResult {
    /// Create a new result
    pub fn new(title: impl Into<String>, payload: Value) -> Self {
        Self {
            title: title.into(),
            payload,
        }
    }
}

/// Trait for workflow agents
#[async_trait]
pub trait Agent: Send + Sync {
    /// Short-name the agent is registered under
    fn name(&self) -> &str;

    /// Perform the unit of work for one step
    async fn invoke(&self, input: Value) -> Result<AgentResult>;
}
