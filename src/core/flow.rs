//! Flow definitions, loading, and validation.
//!
//! Flows are defined in YAML under a top-level `workflow.steps` list.
//! The document is kept as parsed data rather than a strict schema so
//! that a structurally broken flow can still be loaded, introspected,
//! and reported on: validation produces findings, never exceptions.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::agents::AgentRegistry;
use crate::domain::PlanStep;

/// Sentinel input source naming the original request payload
pub const REQUEST_INPUT: &str = "request";

/// A parsed flow definition, immutable for the lifetime of a runner
#[derive(Debug, Clone)]
pub struct FlowDefinition {
    doc: Value,
}

impl FlowDefinition {
    /// Load a flow from a YAML file
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read flow file: {}", path.display()))?;

        Self::from_yaml(&content)
    }

    /// Parse a flow from YAML content
    pub fn from_yaml(content: &str) -> Result<Self> {
        let doc: Value = serde_yaml::from_str(content).context("Failed to parse flow YAML")?;
        Ok(Self { doc })
    }

    /// The declared `workflow.steps` list, if it exists and is a list
    pub fn steps(&self) -> Option<&Vec<Value>> {
        self.doc.get("workflow")?.get("steps")?.as_array()
    }

    /// Project the declared steps to `{id, agent, input_from}` records.
    ///
    /// Malformed fields project to `None` rather than failing; this is the
    /// dry-run view and must work for broken flows too.
    pub fn plan_steps(&self) -> Vec<PlanStep> {
        self.steps()
            .map(|steps| {
                steps
                    .iter()
                    .map(|step| PlanStep {
                        id: field_str(step, "id").map(str::to_string),
                        agent: field_str(step, "agent").map(str::to_string),
                        input_from: field_str(step, "input_from")
                            .unwrap_or(REQUEST_INPUT)
                            .to_string(),
                    })
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Validate the flow against the agent registry.
    ///
    /// Checks, per step in declared order:
    /// - `id` is a unique non-empty string
    /// - `agent` is a non-empty string registered in the registry
    /// - `input_from` is the request sentinel or the id of a step declared
    ///   strictly earlier (the step's own id is not yet visible, so
    ///   self-references and forward references are both rejected)
    ///
    /// Pure function of the flow and registry: no side effects, no errors
    /// raised. Callers decide what to do with the findings.
    pub fn validate(&self, registry: &AgentRegistry) -> ValidationReport {
        let mut errors: Vec<String> = Vec::new();

        let steps = match self.steps() {
            Some(steps) if !steps.is_empty() => steps,
            _ => {
                return ValidationReport::invalid(vec![
                    "workflow.steps must be a non-empty list".to_string()
                ])
            }
        };

        let mut seen_ids: HashSet<&str> = HashSet::new();
        for (idx, step) in steps.iter().enumerate() {
            let sid = field_str(step, "id").filter(|s| !s.is_empty());
            let agent = field_str(step, "agent").filter(|s| !s.is_empty());

            let mut id_ok = false;
            match sid {
                None => errors.push(format!("step[{idx}] has invalid 'id'")),
                Some(sid) if seen_ids.contains(sid) => {
                    errors.push(format!("duplicate step id: {sid}"))
                }
                Some(_) => id_ok = true,
            }

            match agent {
                None => errors.push(format!("step[{idx}] has invalid 'agent'")),
                Some(agent) if !registry.contains(agent) => {
                    errors.push(format!("agent not found in registry: {agent}"))
                }
                Some(_) => {}
            }

            // Checked against ids seen strictly before this step: the
            // step's own id must not satisfy its own input_from.
            if let Some(input_from) = step.get("input_from") {
                let resolvable = input_from
                    .as_str()
                    .map(|from| from == REQUEST_INPUT || seen_ids.contains(from))
                    .unwrap_or(false);
                if !resolvable {
                    let shown = input_from
                        .as_str()
                        .map(str::to_string)
                        .unwrap_or_else(|| input_from.to_string());
                    errors.push(format!(
                        "step[{idx}] input_from '{shown}' must refer to a previous step id or 'request'"
                    ));
                }
            }

            if id_ok {
                if let Some(sid) = sid {
                    seen_ids.insert(sid);
                }
            }
        }

        ValidationReport {
            ok: errors.is_empty(),
            errors,
        }
    }
}

/// Read a string field from a step mapping
fn field_str<'a>(step: &'a Value, key: &str) -> Option<&'a str> {
    step.get(key)?.as_str()
}

/// Outcome of flow validation: a verdict plus one message per violation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    pub ok: bool,
    pub errors: Vec<String>,
}

impl ValidationReport {
    /// A failed report with the given findings
    pub fn invalid(errors: Vec<String>) -> Self {
        Self { ok: false, errors }
    }
}
