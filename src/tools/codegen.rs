//! Static scaffold templates for the mock backend agent.
//!
//! The generated app is a tiny Flask todo service: enough surface for
//! the QA and integrator mocks to have something real to point at.

/// Main application source for the todo scaffold
const APP_MAIN: &str = r#"from flask import Flask, request, jsonify

app = Flask(__name__)

DB = {}
CID = 0

@app.get("/health")
def health():
    return jsonify({"status": "ok"}), 200

@app.get("/todos")
def list_all():
    return jsonify(list(DB.values())), 200

@app.post("/todos")
def create():
    global CID
    data = request.get_json(force=True)
    CID += 1
    item = {"id": CID, "title": data.get("title", ""), "done": False}
    DB[CID] = item
    return jsonify(item), 201

@app.get("/todos/<int:tid>")
def get_one(tid: int):
    item = DB.get(tid)
    if not item:
        return jsonify({"error": "not_found"}), 404
    return jsonify(item)

@app.post("/todos/<int:tid>/done")
def mark_done(tid: int):
    item = DB.get(tid)
    if not item:
        return jsonify({"error": "not_found"}), 404
    item["done"] = True
    return jsonify(item)

@app.delete("/todos/<int:tid>")
def delete(tid: int):
    if tid in DB:
        del DB[tid]
        return jsonify({"ok": True})
    return jsonify({"error": "not_found"}), 404

if __name__ == "__main__":
    app.run(debug=True)
"#;

/// README template with `{{title}}` / `{{goal}}` placeholders
const README_TPL: &str = r#"# {{title}}

{{goal}}

## Run

```bash
python app.py
```
"#;

/// Generator for the todo-app scaffold
#[derive(Debug, Default)]
pub struct ScaffoldGen;

impl ScaffoldGen {
    pub fn new() -> Self {
        Self
    }

    /// Produce `(relative path, content)` pairs for the scaffold
    pub fn todo_scaffold(&self, title: &str, goal: &str) -> Vec<(String, String)> {
        let readme = README_TPL
            .replace("{{title}}", title)
            .replace("{{goal}}", goal);

        vec![
            ("app.py".to_string(), APP_MAIN.to_string()),
            ("README.md".to_string(), readme),
        ]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scaffold_files() {
        let files = ScaffoldGen::new().todo_scaffold("Todo MVP", "Tiny todo service");

        let paths: Vec<&str> = files.iter().map(|(p, _)| p.as_str()).collect();
        assert_eq!(paths, ["app.py", "README.md"]);
    }

    #[test]
    fn test_app_has_health_and_crud_routes() {
        let files = ScaffoldGen::new().todo_scaffold("T", "");
        let app = &files[0].1;

        assert!(app.contains("/health"));
        assert!(app.contains("/todos"));
        assert!(app.contains("mark_done"));
    }

    #[test]
    fn test_readme_substitution() {
        let files = ScaffoldGen::new().todo_scaffold("Todo MVP", "Track things");
        let readme = &files[1].1;

        assert!(readme.starts_with("# Todo MVP"));
        assert!(readme.contains("Track things"));
        assert!(!readme.contains("{{"));
    }
}
