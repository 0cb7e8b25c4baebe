//! Plan and run summaries returned by the orchestrator.
//!
//! Both are plain data: `plan()` never throws and `run()` returns its
//! summary only when every step completed.

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One step as projected by a dry-run plan
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanStep {
    /// Step id (None when the declaration is malformed)
    pub id: Option<String>,

    /// Agent short-name (None when the declaration is malformed)
    pub agent: Option<String>,

    /// Input source, defaulting to the request sentinel
    pub input_from: String,
}

/// Result of a dry-run plan: validation verdict plus the projected steps
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Whether the flow passed validation
    pub ok: bool,

    /// One descriptive message per violation
    pub errors: Vec<String>,

    /// The declared steps, in order
    pub steps: Vec<PlanStep>,
}

/// Result of a completed run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Always "ok" for a run that returned instead of erroring
    pub status: String,

    /// The last executed step's payload (None for an empty flow)
    pub result: Option<Value>,
}

impl RunSummary {
    /// Build the summary for a run in which every step completed
    pub fn ok(result: Option<Value>) -> Self {
        Self {
            status: "ok".to_string(),
            result,
        }
    }
}
