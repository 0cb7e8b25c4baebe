//! devforge - YAML-declared multi-agent workflow runner
//!
//! A prototype pipeline runner: a flow is declared in YAML as an ordered
//! list of steps, each step names a registered agent and an input source,
//! and the runner executes the steps strictly in declared order.
//!
//! # Architecture
//!
//! - Step outputs are persisted to a per-workspace key-value store
//!   (`FlowMemory`), so a re-run against the same workspace sees what a
//!   prior run left behind
//! - Lifecycle events are appended to a best-effort JSONL journal that is
//!   never allowed to fail the run
//! - Flow validation produces data (`ok` + errors), not exceptions, and
//!   never gates execution
//!
//! # Modules
//!
//! - `agents`: The `Agent` trait, builtin agents, and the registry loader
//! - `core`: Orchestration logic (FlowDefinition, FlowMemory, Journal, WorkflowRunner)
//! - `domain`: Data structures (JournalRecord, PlanSummary, RunSummary)
//! - `tools`: Workspace helpers used by the builtin agents
//! - `cli`: Command-line interface
//!
//! # Usage
//!
//! ```bash
//! # Dry-run a flow (validation + step listing, no agents invoked)
//! devforge plan --workflow configs/flow.yaml
//!
//! # Execute a flow against a request document
//! devforge run --workflow configs/flow.yaml --request configs/request.json
//! ```

pub mod agents;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod tools;

// Re-export main types at crate root for convenience
pub use agents::{Agent, AgentContext, AgentRegistry, AgentResult, RegistryError};
pub use core::{FlowDefinition, FlowMemory, Journal, ValidationReport, WorkflowRunner};
pub use domain::{JournalRecord, PlanStep, PlanSummary, RecordKind, RunSummary};
