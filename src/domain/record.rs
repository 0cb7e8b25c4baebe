//! Journal record types for the execution journal.
//!
//! Every lifecycle event is appended as one flat JSON object with an
//! `event` discriminator; fields that do not apply to a given event kind
//! are omitted from the serialized form.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A single record in the append-only execution journal.
///
/// Records are observability data, not a source of truth: the journal is
/// best-effort and a dropped record never fails the run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JournalRecord {
    /// Kind of event
    pub event: RecordKind,

    /// When this event occurred (ISO 8601)
    pub ts: DateTime<Utc>,

    /// The run this record belongs to (absent for construction/plan records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub run_id: Option<Uuid>,

    /// Step id (for step-scoped records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub step_id: Option<String>,

    /// Agent short-name mapped to the step
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,

    /// Where the step's input came from ("request" or an earlier step id)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_from: Option<String>,

    /// Time taken in milliseconds (for executed steps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_ms: Option<u64>,

    /// Error message if the event records a failure
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,

    /// Top-level keys of the step's output payload (when it is a mapping)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_keys: Option<Vec<String>>,

    /// Validation verdict (for validation records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ok: Option<bool>,

    /// Validation findings (for validation records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,

    /// Structured summary (plan and run_done records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub summary: Option<Value>,

    /// Human-readable note (NO secrets)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    /// Offending raw value, truncated for safety (request_error records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,

    /// Short request fingerprint (run_started records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fingerprint: Option<String>,

    /// Declared step count (run_started records)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub steps: Option<usize>,
}

impl JournalRecord {
    /// Create a record of the given kind with the current timestamp
    pub fn new(event: RecordKind) -> Self {
        Self {
            event,
            ts: Utc::now(),
            run_id: None,
            step_id: None,
            agent: None,
            input_from: None,
            duration_ms: None,
            error: None,
            output_keys: None,
            ok: None,
            errors: None,
            summary: None,
            message: None,
            value: None,
            fingerprint: None,
            steps: None,
        }
    }

    /// Attach the run this record belongs to
    pub fn with_run(mut self, run_id: Uuid) -> Self {
        self.run_id = Some(run_id);
        self
    }

    /// Attach step id and agent short-name
    pub fn with_step(mut self, step_id: impl Into<String>, agent: impl Into<String>) -> Self {
        self.step_id = Some(step_id.into());
        self.agent = Some(agent.into());
        self
    }

    /// Attach the step's input source
    pub fn with_input_from(mut self, input_from: impl Into<String>) -> Self {
        self.input_from = Some(input_from.into());
        self
    }

    /// Attach elapsed time
    pub fn with_duration(mut self, duration_ms: u64) -> Self {
        self.duration_ms = Some(duration_ms);
        self
    }

    /// Attach an error message
    pub fn with_error(mut self, error: impl Into<String>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Attach the output payload's top-level key names, if any
    pub fn with_output_keys(mut self, output_keys: Option<Vec<String>>) -> Self {
        self.output_keys = output_keys;
        self
    }

    /// Attach a validation verdict
    pub fn with_validation(mut self, ok: bool, errors: Vec<String>) -> Self {
        self.ok = Some(ok);
        self.errors = Some(errors);
        self
    }

    /// Attach a structured summary
    pub fn with_summary(mut self, summary: Value) -> Self {
        self.summary = Some(summary);
        self
    }

    /// Attach a human-readable note
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach the offending raw value (already truncated by the caller)
    pub fn with_value(mut self, value: impl Into<String>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Attach a request fingerprint
    pub fn with_fingerprint(mut self, fingerprint: impl Into<String>) -> Self {
        self.fingerprint = Some(fingerprint.into());
        self
    }

    /// Attach the declared step count
    pub fn with_steps(mut self, steps: usize) -> Self {
        self.steps = Some(steps);
        self
    }
}

/// Kinds of events recorded in the execution journal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    /// Construction-time validation found problems
    FlowValidation,

    /// A plan() call produced a dry-run summary
    Plan,

    /// A run() call started
    RunStarted,

    /// A step was bypassed via the caller-supplied skip set
    SkipStep,

    /// Pre-run validation found problems (run proceeds regardless)
    PreRunValidation,

    /// An agent invocation failed; the run aborts
    StepError,

    /// A step completed and its payload was stored
    StepDone,

    /// All steps completed
    RunDone,

    /// The request document could not be resolved
    RequestError,
}
