//! Integration tests for tablestyle CLI

use std::fs;
use std::process::Command;

fn run_tablestyle(args: &[&str]) -> (String, String, bool) {
    let mut cmd_args = vec!["run", "-p", "tablestyle", "--"];
    cmd_args.extend(args);

    let output = Command::new("cargo")
        .args(&cmd_args)
        .current_dir(env!("CARGO_MANIFEST_DIR").to_string() + "/..")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    let success = output.status.success();

    (stdout, stderr, success)
}

fn demo(name: &str) -> String {
    format!("{}/demos/{}", env!("CARGO_MANIFEST_DIR"), name)
}

#[test]
fn test_cli_help() {
    let (stdout, _, success) = run_tablestyle(&["--help"]);

    assert!(success);
    assert!(stdout.contains("tablestyle"));
    assert!(stdout.contains("render"));
    assert!(stdout.contains("show"));
    assert!(stdout.contains("--verbose"));
}

#[test]
fn test_cli_version() {
    let (stdout, _, success) = run_tablestyle(&["--version"]);

    assert!(success);
    assert!(stdout.contains("tablestyle"));
}

#[test]
fn test_show_prints_fragment() {
    let (stdout, _, success) = run_tablestyle(&["show", &demo("t_000.json")]);

    assert!(success);
    assert!(stdout.contains("Highlight decrease and bars"));
    assert!(stdout.contains("<table class=\"ui celled table selectable\">"));
    assert!(stdout.contains("<th>Something</th>"));
    assert!(stdout.contains("<th>y</th>"));
    assert!(stdout.contains("background-color: #FFB3BA"));
    assert!(stdout.contains("29.4%"));
}

#[test]
fn test_show_relabel_template_and_right_bars() {
    let (stdout, _, success) = run_tablestyle(&["show", &demo("t_001.json")]);

    assert!(success);
    assert!(stdout.contains("Column &#x27;x&#x27;"));
    assert!(stdout.contains("270deg"));
}

#[test]
fn test_show_json_output() {
    let (stdout, _, success) =
        run_tablestyle(&["show", &demo("t_002.json"), "--output", "json"]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["class"], "ui celled table");
    assert_eq!(parsed["labels"], serde_json::json!(["x", "y"]));

    let rows = parsed["rows"].as_array().expect("rows array");
    assert_eq!(rows.len(), 5);
    assert_eq!(rows[0]["cells"][0]["class"], "error");
    assert_eq!(rows[2]["cells"][0]["class"], "disabled");
    assert_eq!(rows[2]["cells"][0]["content"], "n/a");
    assert_eq!(rows[3]["cells"][0]["class"], "positive");
    assert_eq!(rows[0]["cells"][1]["content"], "0.412");
}

#[test]
fn test_render_writes_document() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("page.html");
    let out_arg = out.to_string_lossy().to_string();

    let (stdout, _, success) = run_tablestyle(&[
        "render",
        &demo("t_000.json"),
        &demo("t_001.json"),
        &demo("t_002.json"),
        "--out",
        &out_arg,
        "--title",
        "Demo tables",
    ]);

    assert!(success);
    assert!(stdout.contains("page.html"));
    assert!(stdout.contains("Conditional classes"));

    let html = fs::read_to_string(&out).unwrap();
    assert!(html.starts_with("<!DOCTYPE html>"));
    assert!(html.contains("<title>Demo tables</title>"));
    assert_eq!(html.matches("<table").count(), 3);
    // Definition sources are embedded escaped
    assert!(html.contains("&quot;highlight_decrease&quot;"));
}

#[test]
fn test_render_json_summary() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("summary.html");
    let out_arg = out.to_string_lossy().to_string();

    let (stdout, _, success) = run_tablestyle(&[
        "render",
        &demo("t_002.json"),
        "--out",
        &out_arg,
        "--output",
        "json",
    ]);

    assert!(success);
    let parsed: serde_json::Value = serde_json::from_str(&stdout).expect("Invalid JSON output");
    assert_eq!(parsed["output"], out_arg.as_str());
    assert_eq!(parsed["tables"][0]["name"], "Conditional classes");
    assert_eq!(parsed["tables"][0]["rows"], 5);
    assert_eq!(parsed["tables"][0]["columns"], 2);
    assert!(out.exists());
}

#[test]
fn test_missing_definition() {
    let (_, stderr, success) = run_tablestyle(&["show", "/nonexistent/table.json"]);

    assert!(!success);
    assert!(stderr.contains("Error"));
    assert!(stderr.contains("failed to read"));
}

#[test]
fn test_failing_operation_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    fs::write(
        &path,
        r#"{
            "columns": { "x": [1, 2] },
            "operations": [
                { "op": "highlight_max", "column": "missing", "color": "red" }
            ]
        }"#,
    )
    .unwrap();

    let (_, stderr, success) = run_tablestyle(&["show", &path.to_string_lossy()]);

    assert!(!success);
    assert!(stderr.contains("Error"));
}

#[test]
fn test_no_subcommand_prints_help() {
    let (stdout, _, success) = run_tablestyle(&[]);

    assert!(!success);
    assert!(stdout.contains("Usage"));
}
