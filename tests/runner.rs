//! Workflow Runner Integration Tests
//!
//! End-to-end execution semantics: payload threading, skip handling,
//! failure propagation, and journal/memory effects.

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use devforge::core::{FlowMemory, WorkflowRunner};
use devforge::domain::RecordKind;
use serde_json::{json, Value};
use tempfile::TempDir;

const AGENTS_YAML: &str = r#"
agents:
  echo:
    type: Echo
  probe:
    type: Probe
  planner:
    type: Planner
"#;

fn write_file(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).unwrap();
    path
}

/// Set up a temp dir with agents config, flow, and request; return
/// (tempdir, workspace, agents path, flow path, request path)
fn setup(flow_yaml: &str, request_json: &str) -> (TempDir, PathBuf, PathBuf, PathBuf, PathBuf) {
    let temp = TempDir::new().unwrap();
    let agents = write_file(temp.path(), "agents.yaml", AGENTS_YAML);
    let flow = write_file(temp.path(), "flow.yaml", flow_yaml);
    let request = write_file(temp.path(), "request.json", request_json);
    let workspace = temp.path().join("workspace");
    (temp, workspace, agents, flow, request)
}

fn no_skips() -> HashSet<String> {
    HashSet::new()
}

#[tokio::test]
async fn test_end_to_end_echo_chain() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
    - id: b
      agent: echo
      input_from: a
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"x": 1}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let summary = runner.run(request.to_str().unwrap(), &no_skips()).await.unwrap();

    assert_eq!(summary.status, "ok");
    assert_eq!(summary.result, Some(json!({"x": 1})));

    // Both steps stored the threaded payload
    assert_eq!(runner.memory().get("a").await.unwrap(), Some(json!({"x": 1})));
    assert_eq!(runner.memory().get("b").await.unwrap(), Some(json!({"x": 1})));

    // Exactly one memory entry per step
    let document: Value =
        serde_json::from_str(&std::fs::read_to_string(workspace.join("flow_state.json")).unwrap())
            .unwrap();
    assert_eq!(document.as_object().unwrap().len(), 2);

    // Journal: one step_done per step, then run_done
    let records = runner.journal().replay().await.unwrap();
    let step_done: Vec<_> = records
        .iter()
        .filter(|r| r.event == RecordKind::StepDone)
        .collect();
    assert_eq!(step_done.len(), 2);
    assert_eq!(step_done[0].step_id.as_deref(), Some("a"));
    assert_eq!(step_done[0].input_from.as_deref(), Some("request"));
    assert_eq!(step_done[1].step_id.as_deref(), Some("b"));
    assert_eq!(step_done[1].input_from.as_deref(), Some("a"));
    assert_eq!(step_done[1].output_keys, Some(vec!["x".to_string()]));

    assert_eq!(
        records
            .iter()
            .filter(|r| r.event == RecordKind::RunDone)
            .count(),
        1
    );
}

#[tokio::test]
async fn test_memory_round_trip_across_instances() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"k": "v"}"#);

    {
        let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
        runner.run(request.to_str().unwrap(), &no_skips()).await.unwrap();
    }

    // A fresh FlowMemory over the same backing path sees the payload
    let memory = FlowMemory::open(workspace.join("flow_state.json")).await.unwrap();
    assert_eq!(memory.get("a").await.unwrap(), Some(json!({"k": "v"})));
}

#[tokio::test]
async fn test_skip_semantics() {
    // probe would fail on this request, so the run only succeeds if the
    // skipped agent is never invoked
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
    - id: b
      agent: probe
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"fail": true}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let skip: HashSet<String> = ["b".to_string()].into_iter().collect();
    let summary = runner.run(request.to_str().unwrap(), &skip).await.unwrap();

    assert_eq!(summary.status, "ok");
    assert_eq!(
        runner.memory().get("b").await.unwrap(),
        Some(json!({"skipped": true}))
    );

    let records = runner.journal().replay().await.unwrap();
    let skips: Vec<_> = records
        .iter()
        .filter(|r| r.event == RecordKind::SkipStep)
        .collect();
    assert_eq!(skips.len(), 1);
    assert_eq!(skips[0].step_id.as_deref(), Some("b"));
    assert_eq!(skips[0].agent.as_deref(), Some("probe"));
}

#[tokio::test]
async fn test_skipped_step_is_not_the_result() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
    - id: b
      agent: echo
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"x": 1}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let skip: HashSet<String> = ["b".to_string()].into_iter().collect();
    let summary = runner.run(request.to_str().unwrap(), &skip).await.unwrap();

    // Last executed (not skipped) step provides the result
    assert_eq!(summary.result, Some(json!({"x": 1})));
}

#[tokio::test]
async fn test_failure_propagation() {
    let flow = r#"
workflow:
  steps:
    - id: s1
      agent: probe
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"fail": true}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let err = runner
        .run(request.to_str().unwrap(), &no_skips())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("probe failure requested"));

    let records = runner.journal().replay().await.unwrap();
    let errors: Vec<_> = records
        .iter()
        .filter(|r| r.event == RecordKind::StepError)
        .collect();
    assert_eq!(errors.len(), 1);
    assert_eq!(errors[0].step_id.as_deref(), Some("s1"));
    assert_eq!(errors[0].agent.as_deref(), Some("probe"));
    assert!(errors[0].error.as_deref().unwrap().contains("probe failure"));

    assert!(records.iter().all(|r| r.event != RecordKind::RunDone));

    // Nothing was stored for the failed step
    assert_eq!(runner.memory().get("s1").await.unwrap(), None);
}

#[tokio::test]
async fn test_request_as_json_string() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
"#;
    let (_temp, workspace, agents, flow, _request) = setup(flow, "{}");

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let summary = runner.run(r#"{"inline": true}"#, &no_skips()).await.unwrap();

    assert_eq!(summary.result, Some(json!({"inline": true})));
}

#[tokio::test]
async fn test_request_error_is_journaled_and_fatal() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
"#;
    let (_temp, workspace, agents, flow, _request) = setup(flow, "{}");

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let err = runner
        .run("definitely not json", &no_skips())
        .await
        .unwrap_err();

    // The original parse error is preserved under the context
    assert!(err.downcast_ref::<serde_json::Error>().is_some());

    let records = runner.journal().replay().await.unwrap();
    let request_errors: Vec<_> = records
        .iter()
        .filter(|r| r.event == RecordKind::RequestError)
        .collect();
    assert_eq!(request_errors.len(), 1);
    assert_eq!(
        request_errors[0].value.as_deref(),
        Some("definitely not json")
    );
    assert!(records.iter().all(|r| r.event != RecordKind::StepDone));
}

#[tokio::test]
async fn test_oversized_request_value_is_truncated() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
"#;
    let (_temp, workspace, agents, flow, _request) = setup(flow, "{}");

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let garbage = format!("not json {}", "x".repeat(5000));
    runner.run(&garbage, &no_skips()).await.unwrap_err();

    let records = runner.journal().replay().await.unwrap();
    let record = records
        .iter()
        .find(|r| r.event == RecordKind::RequestError)
        .unwrap();
    assert_eq!(record.value.as_ref().unwrap().chars().count(), 2000);
}

#[tokio::test]
async fn test_stale_memory_feeds_a_later_run() {
    // Documented behavior: a re-run against the same workspace may
    // consume output a prior run left behind.
    let first_flow = r#"
workflow:
  steps:
    - id: a
      agent: echo
"#;
    let second_flow = r#"
workflow:
  steps:
    - id: b
      agent: echo
      input_from: a
"#;
    let (_temp, workspace, agents, first, request) = setup(first_flow, r#"{"x": 1}"#);
    let second = write_file(_temp.path(), "second.yaml", second_flow);

    let runner = WorkflowRunner::new(&workspace, &agents, &first).await.unwrap();
    runner.run(request.to_str().unwrap(), &no_skips()).await.unwrap();

    // The second flow is invalid on its own ('a' is not declared in it),
    // but execution proceeds and resolves 'a' from the prior run's state.
    let resumed = WorkflowRunner::new(&workspace, &agents, &second).await.unwrap();
    assert!(!resumed.plan().await.ok);

    let summary = resumed
        .run(r#"{"ignored": true}"#, &no_skips())
        .await
        .unwrap();
    assert_eq!(summary.result, Some(json!({"x": 1})));
}

#[tokio::test]
async fn test_missing_input_reference_fails_the_run() {
    let flow = r#"
workflow:
  steps:
    - id: b
      agent: echo
      input_from: a
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"x": 1}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let err = runner
        .run(request.to_str().unwrap(), &no_skips())
        .await
        .unwrap_err();

    assert!(err.to_string().contains("no output is stored"));
}

#[tokio::test]
async fn test_unresolved_agent_surfaces_at_run_time() {
    let flow = r#"
workflow:
  steps:
    - id: a
      agent: ghost
"#;
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"x": 1}"#);

    // Construction succeeds: validation reports, it does not gate
    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let err = runner
        .run(request.to_str().unwrap(), &no_skips())
        .await
        .unwrap_err();

    assert!(err
        .to_string()
        .contains("agent not found in registry: ghost"));
}

#[tokio::test]
async fn test_empty_flow_completes_with_no_result() {
    let flow = "workflow:\n  steps: []\n";
    let (_temp, workspace, agents, flow, request) = setup(flow, r#"{"x": 1}"#);

    let runner = WorkflowRunner::new(&workspace, &agents, &flow).await.unwrap();
    let summary = runner.run(request.to_str().unwrap(), &no_skips()).await.unwrap();

    assert_eq!(summary.status, "ok");
    assert_eq!(summary.result, None);
}

#[tokio::test]
async fn test_construction_fails_on_bad_registry() {
    let temp = TempDir::new().unwrap();
    let agents = write_file(
        temp.path(),
        "agents.yaml",
        "agents:\n  mystery:\n    type: Mystery\n",
    );
    let flow = write_file(
        temp.path(),
        "flow.yaml",
        "workflow:\n  steps:\n    - id: a\n      agent: mystery\n",
    );

    let result = WorkflowRunner::new(temp.path().join("workspace"), &agents, &flow).await;
    assert!(result.is_err());
}
