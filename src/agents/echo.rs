//! Diagnostic agent returning its input unchanged.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::Value;

use super::{Agent, AgentContext, AgentResult};

/// Returns the input payload as the output payload
pub struct Echo;

impl Echo {
    pub fn new(_ctx: AgentContext) -> Self {
        Self
    }
}

#[async_trait]
impl Agent for Echo {
    fn name(&self) -> &str {
        "echo"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        Ok(AgentResult::new("Echo", input))
    }
}
