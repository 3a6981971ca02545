//! End-to-end tests for the routemetac binary.
//!
//! Each test writes a `.ts` file into a temp dir, runs the binary on it and
//! checks exit status, stdout/stderr and any files written.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};

const FIXTURE: &str = include_str!("../../../fixtures/simple_endpoint.ts");

const SMALL: &str = r#"class RouteMap {
    route(method: string, path: string, handler: (q: any) => any): this {
        return this;
    }
}
const routes = new RouteMap();
routes.route("GET", "/n", (q: { n: number }) => q.n);
export default routes;
"#;

fn routemetac(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_routemetac"))
        .args(args)
        .output()
        .expect("failed to invoke routemetac")
}

/// Write `source` as `main.ts` in a fresh temp dir.
fn write_source(source: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("failed to create temp dir");
    let path = dir.path().join("main.ts");
    std::fs::write(&path, source).expect("failed to write main.ts");
    (dir, path)
}

fn path_str(path: &Path) -> &str {
    path.to_str().expect("temp paths are UTF-8")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

// ── rewrite ────────────────────────────────────────────────────────────

#[test]
fn rewrite_prints_the_program() {
    let (_dir, file) = write_source(SMALL);
    let output = routemetac(&["rewrite", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert_eq!(
        stdout(&output),
        SMALL.replace("q.n);", "q.n, { paramsTypeId: 0, returnTypeId: 1 });")
    );
}

#[test]
fn rewrite_writes_output_and_derived_manifest() {
    let (dir, file) = write_source(FIXTURE);
    let out = dir.path().join("out.ts");
    let output = routemetac(&["rewrite", path_str(&file), "-o", path_str(&out)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).is_empty());
    assert!(stderr(&output).contains("Rewrote:"), "{}", stderr(&output));

    let text = std::fs::read_to_string(&out).unwrap();
    assert!(text.contains("}, { paramsTypeId: 0, returnTypeId: 1 });"), "{}", text);
    assert!(text.contains("}, { paramsTypeId: 2, returnTypeId: 3 });"), "{}", text);

    let manifest = std::fs::read_to_string(dir.path().join("out.types.json")).unwrap();
    let manifest: serde_json::Value = serde_json::from_str(&manifest).unwrap();
    let keys: Vec<&String> = manifest.as_object().unwrap().keys().collect();
    assert_eq!(keys, ["0", "1", "2", "3"]);
    assert_eq!(manifest["1"]["name"], "anonymousObject");
    assert_eq!(manifest["1"]["fields"]["birthDate"]["name"], "date");
    assert_eq!(
        manifest["1"]["fields"]["favoriteColors"]["elementType"]["name"],
        "string"
    );
}

#[test]
fn explicit_manifest_path() {
    let (dir, file) = write_source(SMALL);
    let manifest = dir.path().join("types.json");
    let output = routemetac(&["rewrite", path_str(&file), "--manifest", path_str(&manifest)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let value: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&manifest).unwrap()).unwrap();
    assert_eq!(
        value,
        serde_json::json!({
            "0": { "name": "anonymousObject", "fields": { "n": { "name": "number" } } },
            "1": { "name": "number" }
        })
    );
}

#[test]
fn config_beside_the_input_is_picked_up() {
    let (dir, file) = write_source(SMALL);
    std::fs::write(
        dir.path().join("routemeta.toml"),
        "[meta]\nparams-field = \"input\"\nreturn-field = \"output\"\n",
    )
    .unwrap();
    let output = routemetac(&["rewrite", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("q.n, { input: 0, output: 1 });"), "{}", stdout(&output));
}

#[test]
fn bad_config_fails() {
    let (dir, file) = write_source(SMALL);
    let config = dir.path().join("custom.toml");
    std::fs::write(&config, "[registry\n").unwrap();
    let output = routemetac(&["rewrite", path_str(&file), "--config", path_str(&config)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Failed to parse routemeta.toml"), "{}", stderr(&output));
}

#[test]
fn type_errors_are_warnings() {
    let source = SMALL.replace("export default", "nope;\nexport default");
    let (_dir, file) = write_source(&source);
    let output = routemetac(&["rewrite", path_str(&file), "--no-color"]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stderr(&output).contains("T0001"), "{}", stderr(&output));
    assert!(stdout(&output).contains("returnTypeId: 1"));
}

// ── failures ───────────────────────────────────────────────────────────

#[test]
fn wrong_export_type_exits_with_a_diagnostic() {
    let (_dir, file) =
        write_source("class Router {}\nconst router = new Router();\nexport default router;\n");
    let output = routemetac(&["rewrite", path_str(&file), "--no-color"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stdout(&output).is_empty());
    let err = stderr(&output);
    assert!(err.contains("R0004"), "{}", err);
    assert!(err.contains("found `Router`"), "{}", err);
    assert!(err.contains("error: Rewrite failed due to errors above."), "{}", err);
}

#[test]
fn failed_rewrites_write_nothing() {
    let source = SMALL.replace("(q: { n: number }) => q.n", "handle");
    let (dir, file) = write_source(&source);
    let out = dir.path().join("out.ts");
    let output = routemetac(&["rewrite", path_str(&file), "-o", path_str(&out)]);
    assert_eq!(output.status.code(), Some(1));
    assert!(!out.exists());
    assert!(!dir.path().join("out.types.json").exists());
}

#[test]
fn parse_errors_as_json_lines() {
    let (_dir, file) = write_source("const = 1;\n");
    let output = routemetac(&["rewrite", path_str(&file), "--json"]);
    assert_eq!(output.status.code(), Some(1));
    let lines: Vec<serde_json::Value> = stderr(&output)
        .lines()
        .map(|line| serde_json::from_str(line).expect("every stderr line is JSON"))
        .collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0]["code"], "P0001");
    assert_eq!(lines[0]["spans"][0]["start"], 6);
    assert_eq!(lines[1]["code"], "C0001");
    assert_eq!(lines[1]["message"], "Parsing failed due to errors above.");
}

#[test]
fn missing_input_file() {
    let output = routemetac(&["rewrite", "/nonexistent/main.ts"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("is not a file"), "{}", stderr(&output));
}

// ── check ──────────────────────────────────────────────────────────────

#[test]
fn check_lists_call_sites() {
    let (_dir, file) = write_source(FIXTURE);
    let output = routemetac(&["check", path_str(&file)]);
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let lines: Vec<&str> = out.lines().collect();
    assert_eq!(lines[0], "anchor: RouteMap.route");
    assert_eq!(lines[1], "call sites: 2");
    assert!(lines[2].ends_with(" aliasedRouteMap.route"), "{}", out);
    assert!(lines[3].ends_with(" register"), "{}", out);
}

#[test]
fn check_reports_anchor_failures() {
    let (_dir, file) = write_source("const x = 1;\n");
    let output = routemetac(&["check", path_str(&file), "--no-color"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("R0001"), "{}", stderr(&output));
}
