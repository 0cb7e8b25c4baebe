//! Main workflow runner.
//!
//! Composes the flow definition, agent registry, flow memory, and
//! execution journal to run a pipeline end-to-end. Steps execute
//! strictly in declared order in the calling task: no retries, no
//! timeouts, no parallel branches. The first agent error aborts the
//! run; a prototype pipeline with no compensating actions must not
//! proceed past an unknown failure.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::time::Instant;

use anyhow::{anyhow, Context, Result};
use serde_json::{json, Value};
use tokio::fs;
use tracing::{debug, error, info, instrument, warn};
use uuid::Uuid;

use crate::agents::{AgentContext, AgentRegistry};
use crate::domain::{JournalRecord, PlanSummary, RecordKind, RunSummary};

use super::flow::{FlowDefinition, REQUEST_INPUT};
use super::journal::{fingerprint, Journal};
use super::memory::FlowMemory;

/// Maximum raw request length copied into a request_error record
const REQUEST_VALUE_LIMIT: usize = 2000;

/// Orchestrates one flow against one workspace.
///
/// Construction is fail-fast for configuration problems (unreadable
/// YAML, unresolvable agent types) but not for validation findings:
/// a structurally broken flow still constructs, so callers can
/// introspect why it is broken via [`plan`](Self::plan).
pub struct WorkflowRunner {
    workspace: PathBuf,
    flow: FlowDefinition,
    registry: AgentRegistry,
    memory: FlowMemory,
    journal: Journal,
}

impl WorkflowRunner {
    /// Create a runner for the given workspace, agent config, and flow.
    ///
    /// Creates the workspace (and its `logs/` directory) if absent, opens
    /// or creates `flow_state.json`, and journals a `flow_validation`
    /// record when the flow fails validation. Validation never blocks
    /// construction.
    pub async fn new(
        workspace: impl AsRef<Path>,
        agents_config: impl AsRef<Path>,
        flow_config: impl AsRef<Path>,
    ) -> Result<Self> {
        let workspace = workspace.as_ref().to_path_buf();
        fs::create_dir_all(&workspace)
            .await
            .with_context(|| format!("Failed to create workspace: {}", workspace.display()))?;

        let memory = FlowMemory::open(workspace.join("flow_state.json")).await?;
        let flow = FlowDefinition::from_file(flow_config.as_ref())?;
        let registry = AgentRegistry::from_file(agents_config.as_ref())?;

        let logs_dir = workspace.join("logs");
        fs::create_dir_all(&logs_dir)
            .await
            .with_context(|| format!("Failed to create logs directory: {}", logs_dir.display()))?;
        let journal = Journal::new(logs_dir.join("workflow.jsonl"));

        let runner = Self {
            workspace,
            flow,
            registry,
            memory,
            journal,
        };

        let report = runner.flow.validate(&runner.registry);
        if !report.ok {
            warn!(errors = ?report.errors, "flow failed validation; problems will surface at run time");
            runner
                .journal
                .append(
                    &JournalRecord::new(RecordKind::FlowValidation)
                        .with_validation(false, report.errors),
                )
                .await;
        }

        Ok(runner)
    }

    /// Workspace root this runner writes under
    pub fn workspace(&self) -> &Path {
        &self.workspace
    }

    /// The durable step-output store
    pub fn memory(&self) -> &FlowMemory {
        &self.memory
    }

    /// The execution journal
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    /// Produce a dry-run plan: validation verdict plus projected steps.
    ///
    /// Pure introspection: never mutates memory, never invokes agents,
    /// never fails. The plan is journaled as a `plan` record.
    #[instrument(skip(self))]
    pub async fn plan(&self) -> PlanSummary {
        let report = self.flow.validate(&self.registry);
        let summary = PlanSummary {
            ok: report.ok,
            errors: report.errors,
            steps: self.flow.plan_steps(),
        };

        self.journal
            .append(
                &JournalRecord::new(RecordKind::Plan)
                    .with_summary(serde_json::to_value(&summary).unwrap_or(Value::Null)),
            )
            .await;

        summary
    }

    /// Execute the flow against a request document.
    ///
    /// `request_source` is either a path to a JSON file or a JSON string.
    /// Steps named in `skip_optional` are bypassed: their memory slot is
    /// set to `{"skipped": true}` and their agent is never constructed.
    ///
    /// Returns the `{status, result}` summary after all steps complete;
    /// the first failing step journals a `step_error` record and the
    /// error propagates to the caller unchanged.
    #[instrument(skip_all, fields(request = %request_source))]
    pub async fn run(
        &self,
        request_source: &str,
        skip_optional: &HashSet<String>,
    ) -> Result<RunSummary> {
        let run_id = Uuid::new_v4();
        let request = self.load_request(request_source, run_id).await?;

        let steps = self.flow.steps().cloned().unwrap_or_default();
        info!(%run_id, steps = steps.len(), "starting run");

        self.journal
            .append(
                &JournalRecord::new(RecordKind::RunStarted)
                    .with_run(run_id)
                    .with_fingerprint(fingerprint(&request.to_string()))
                    .with_steps(steps.len()),
            )
            .await;

        // Log-only pre-run validation: execution proceeds regardless, and
        // a broken flow fails later as an ordinary lookup error.
        let report = self.flow.validate(&self.registry);
        if !report.ok {
            warn!(errors = ?report.errors, "pre-run validation failed; continuing");
            self.journal
                .append(
                    &JournalRecord::new(RecordKind::PreRunValidation)
                        .with_run(run_id)
                        .with_validation(false, report.errors),
                )
                .await;
        }

        let mut last_output: Option<Value> = None;

        for (idx, step) in steps.iter().enumerate() {
            let started = Instant::now();
            let step_id = step_str(step, idx, "id")?;
            let agent_name = step_str(step, idx, "agent")?;
            let input_from = match step.get("input_from") {
                None => REQUEST_INPUT,
                Some(value) => value
                    .as_str()
                    .ok_or_else(|| anyhow!("step[{idx}] has a non-string 'input_from'"))?,
            };

            if skip_optional.contains(step_id) {
                self.memory.set(step_id, json!({"skipped": true})).await?;
                self.journal
                    .append(
                        &JournalRecord::new(RecordKind::SkipStep)
                            .with_run(run_id)
                            .with_step(step_id, agent_name),
                    )
                    .await;
                info!(step = step_id, "step skipped");
                continue;
            }

            let input = if input_from == REQUEST_INPUT {
                request.clone()
            } else {
                self.memory.get(input_from).await?.ok_or_else(|| {
                    anyhow!("step '{step_id}' reads from '{input_from}' but no output is stored under that id")
                })?
            };

            let agent = self
                .registry
                .create(agent_name, AgentContext::new(&self.workspace))
                .ok_or_else(|| anyhow!("agent not found in registry: {agent_name}"))?;

            debug!(step = step_id, agent = agent_name, input_from, "invoking agent");

            match agent.invoke(input).await {
                Ok(result) => {
                    self.memory.set(step_id, result.payload.clone()).await?;

                    let duration_ms = started.elapsed().as_millis() as u64;
                    let output_keys = result
                        .payload
                        .as_object()
                        .map(|payload| payload.keys().cloned().collect::<Vec<_>>());

                    self.journal
                        .append(
                            &JournalRecord::new(RecordKind::StepDone)
                                .with_run(run_id)
                                .with_step(step_id, agent_name)
                                .with_input_from(input_from)
                                .with_duration(duration_ms)
                                .with_output_keys(output_keys),
                        )
                        .await;

                    info!(step = step_id, agent = agent_name, duration_ms, "step done");
                    last_output = Some(result.payload);
                }
                Err(err) => {
                    let duration_ms = started.elapsed().as_millis() as u64;
                    self.journal
                        .append(
                            &JournalRecord::new(RecordKind::StepError)
                                .with_run(run_id)
                                .with_step(step_id, agent_name)
                                .with_input_from(input_from)
                                .with_duration(duration_ms)
                                .with_error(err.to_string()),
                        )
                        .await;

                    error!(step = step_id, agent = agent_name, error = %err, "step failed; aborting run");
                    return Err(err);
                }
            }
        }

        let summary = RunSummary::ok(last_output);
        self.journal
            .append(
                &JournalRecord::new(RecordKind::RunDone)
                    .with_run(run_id)
                    .with_summary(serde_json::to_value(&summary).unwrap_or(Value::Null)),
            )
            .await;

        info!(%run_id, "run completed");
        Ok(summary)
    }

    /// Resolve the request document from a file path or a JSON string.
    ///
    /// A path that exists but holds malformed JSON propagates the parse
    /// error directly; the journaled `request_error` branch is for values
    /// that are neither an existing file nor parseable JSON.
    async fn load_request(&self, request_source: &str, run_id: Uuid) -> Result<Value> {
        let path = Path::new(request_source);
        if path.exists() {
            let content = fs::read_to_string(path)
                .await
                .with_context(|| format!("Failed to read request file: {}", path.display()))?;

            return serde_json::from_str(&content)
                .with_context(|| format!("Failed to parse request file: {}", path.display()));
        }

        match serde_json::from_str(request_source) {
            Ok(request) => Ok(request),
            Err(err) => {
                let truncated: String = request_source.chars().take(REQUEST_VALUE_LIMIT).collect();
                self.journal
                    .append(
                        &JournalRecord::new(RecordKind::RequestError)
                            .with_run(run_id)
                            .with_message("cannot parse request as a file path or JSON string")
                            .with_value(truncated)
                            .with_error(err.to_string()),
                    )
                    .await;

                error!(error = %err, "request is neither an existing file nor valid JSON");
                Err(anyhow::Error::new(err)
                    .context("request is neither an existing file nor valid JSON"))
            }
        }
    }
}

/// Read a required string field from a step mapping
fn step_str<'a>(step: &'a Value, idx: usize, key: &str) -> Result<&'a str> {
    step.get(key)
        .and_then(Value::as_str)
        .ok_or_else(|| anyhow!("step[{idx}] is missing a string '{key}'"))
}
