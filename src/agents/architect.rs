//! System-design agent.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};

/// Produces the module layout and CI plan for the brief
pub struct Architect;

impl Architect {
    pub fn new(_ctx: AgentContext) -> Self {
        Self
    }
}

#[async_trait]
impl Agent for Architect {
    fn name(&self) -> &str {
        "architect"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        let title = input.get("title").and_then(Value::as_str).unwrap_or("App");
        let tech = input.get("tech").cloned().unwrap_or_else(|| json!({}));

        let payload = json!({
            "title": title,
            "tech": tech,
            "modules": ["api", "backend", "frontend", "docs"],
            "ci": {"jobs": ["lint", "test"]},
        });

        Ok(AgentResult::new(format!("Design for {title}"), payload))
    }
}
