//! Work-breakdown planner agent.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};

/// Derives a fixed task breakdown from the request brief
pub struct Planner;

impl Planner {
    pub fn new(_ctx: AgentContext) -> Self {
        Self
    }
}

#[async_trait]
impl Agent for Planner {
    fn name(&self) -> &str {
        "planner"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        let title = input.get("title").and_then(Value::as_str).unwrap_or("App");
        let goal = input.get("goal").and_then(Value::as_str).unwrap_or("");
        let acceptance = input
            .get("acceptance")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        let tasks = [
            "intake", "research", "design", "backend", "frontend", "docs", "qa", "release",
        ];

        let payload = json!({
            "title": title,
            "goal": goal,
            "acceptance": acceptance,
            "tasks": tasks,
        });

        Ok(AgentResult::new(format!("Plan for {title}"), payload))
    }
}
