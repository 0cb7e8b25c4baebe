//! Health-probe agent.
//!
//! Succeeds with a fixed payload unless the input asks it to fail; the
//! failure path exercises the runner's abort behavior end-to-end.

use anyhow::{bail, Result};
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};

/// Tiny agent used to verify the pipeline executes code at all
pub struct Probe;

impl Probe {
    pub fn new(_ctx: AgentContext) -> Self {
        Self
    }
}

#[async_trait]
impl Agent for Probe {
    fn name(&self) -> &str {
        "probe"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        if input.get("fail").and_then(Value::as_bool) == Some(true) {
            bail!("probe failure requested");
        }

        Ok(AgentResult::new("Probe", json!({"status": "OK"})))
    }
}
