//! Mock QA agent.

use std::path::{Path, PathBuf};

use anyhow::Result;
use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Agent, AgentContext, AgentResult};

/// Mock test harness.
///
/// TODO: wire this to an actual test command once the scaffold carries
/// real tests; for now it always reports green.
struct TestRunner;

impl TestRunner {
    fn run_suite(&self, app_dir: &Path) -> (i64, String) {
        (0, format!("OK: tests green in {}", app_dir.display()))
    }
}

/// Reports a test verdict for the generated application
pub struct QaTester {
    ctx: AgentContext,
}

impl QaTester {
    pub fn new(ctx: AgentContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Agent for QaTester {
    fn name(&self) -> &str {
        "qa"
    }

    async fn invoke(&self, input: Value) -> Result<AgentResult> {
        let app_dir = input
            .get("app_dir")
            .and_then(Value::as_str)
            .map(PathBuf::from)
            .unwrap_or_else(|| self.ctx.workspace.join("app"));

        let (rc, report) = TestRunner.run_suite(&app_dir);
        let payload = json!({"rc": rc, "report": report});

        Ok(AgentResult::new("QA report", payload))
    }
}
