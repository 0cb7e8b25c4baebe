//! Mock backend-developer agent.
//!
//! Writes the todo-app scaffold under `<workspace>/app` and reports the
//! files it produced.

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};
use crate::tools::{RepoOps, ScaffoldGen};

/// Generates the mock application scaffold
pub struct BackendDev {
    ctx: AgentContext,
}

impl BackendDev {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Agent for BackendDev {
    fn name(&self) -> &str {
        "backend"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        let app_dir = self.ctx.workspace.join("app");
        let repo = RepoOps::new(&app_dir);
        repo.ensure_gitkeep(".").await?;

        let title = input.get("title").and_then(Value::as_str).unwrap_or("App");
        let goal = input.get("goal").and_then(Value::as_str).unwrap_or("");

        let files = ScaffoldGen::new().todo_scaffold(title, goal);
        for (rel_path, content) in &files {
            repo.write_file(rel_path, content).await?;
        }

        let names: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
        let payload = json!({
            "app_dir": app_dir.display().to_string(),
            "files": names,
        });

        Ok(AgentResult::new("Backend generated", payload))
    }
}
