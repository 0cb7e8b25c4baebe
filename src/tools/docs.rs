//! Build-summary document assembly for the integrator agent.

use serde_json::Value;

/// Assembles the integration summary from plan and design payloads
#[derive(Debug, Default)]
pub struct DocBuilder;

impl DocBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Build the summary markdown.
    ///
    /// Inputs are normalized leniently: a missing title renders as
    /// "None", a scalar `modules` value becomes a one-element list.
    pub fn build_summary(&self, plan: &Value, design: &Value) -> String {
        let title = plan
            .get("title")
            .map(|t| t.as_str().map(str::to_string).unwrap_or_else(|| t.to_string()))
            .unwrap_or_else(|| "None".to_string());

        let modules: Vec<String> = match design.get("modules") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|m| m.as_str().map(str::to_string).unwrap_or_else(|| m.to_string()))
                .collect(),
            Some(Value::String(module)) => vec![module.clone()],
            Some(other) => vec![other.to_string()],
            None => Vec::new(),
        };

        let module_lines: Vec<String> = modules.iter().map(|m| format!("- {m}")).collect();

        format!(
            "# Build Summary\n\nScope: {title}\n\nModules:\n{}\n",
            module_lines.join("\n")
        )
    }

    /// Quick self-check that a summary carries the expected sections
    pub fn selfcheck_summary(&self, summary: &str) -> bool {
        summary.contains("# Build Summary")
            && summary.contains("Scope:")
            && summary.contains("Modules:")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_build_summary() {
        let builder = DocBuilder::new();
        let summary = builder.build_summary(
            &json!({"title": "Todo MVP"}),
            &json!({"modules": ["api", "backend"]}),
        );

        assert!(summary.contains("Scope: Todo MVP"));
        assert!(summary.contains("- api"));
        assert!(summary.contains("- backend"));
        assert!(builder.selfcheck_summary(&summary));
    }

    #[test]
    fn test_missing_title_and_scalar_modules() {
        let builder = DocBuilder::new();
        let summary = builder.build_summary(&json!({}), &json!({"modules": "api"}));

        assert!(summary.contains("Scope: None"));
        assert!(summary.contains("- api"));
    }
}
