//! Integration agent.
//!
//! Assembles the build summary from earlier plan and design payloads and
//! writes it into the application directory.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};
use crate::tools::{DocBuilder, RepoOps};

/// Writes SUMMARY.md from accumulated step outputs
pub struct Integrator {
    ctx: AgentContext,
}

impl Integrator {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Agent for Integrator {
    fn name(&self) -> &str {
        "integrator"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        let app_dir = self.ctx.workspace.join("app");
        let repo = RepoOps::new(&app_dir);

        // Fan-in tolerant: the input may be a plan/design envelope or the
        // design payload itself.
        let plan = input.get("plan").cloned().unwrap_or_else(|| {
            json!({"title": input.get("title").and_then(Value::as_str).unwrap_or("App")})
        });
        let design = input
            .get("design")
            .cloned()
            .unwrap_or_else(|| json!({"modules": ["api", "backend"]}));

        let summary = DocBuilder::new().build_summary(&plan, &design);
        let summary_path = repo.write_file("SUMMARY.md", &summary).await?;

        let payload = json!({"summary_path": summary_path.display().to_string()});
        Ok(AgentResult::new("Integrated", payload))
    }
}
