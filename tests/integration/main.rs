//! Integration tests for Tendril
//!
//! These tests drive the whole pipeline over a temporary repository, both
//! through the library and through the compiled binary.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

use serde_json::Value;
use tendril_core::{EntityKey, UsageReference};
use tendril_indexer::{Coordinator, TendrilConfig};

fn write(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

const ADD: &str = "export function add(a: number, b: number): number {
  return a + b;
}
";

fn repo() -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let root = dir.path().canonicalize().unwrap();
    write(
        &root,
        "src/components/Button.tsx",
        "export function Button(props: { label: string }) {
  return <button>{props.label}</button>;
}
",
    );
    write(
        &root,
        "src/components/index.ts",
        "import { Button } from './Button';
export { Button };
export const Primary = Button;
",
    );
    write(
        &root,
        "src/App.tsx",
        r#"import { Button } from './components/Button';

export const App = () => (
  <div>
    <Button label="a" />
    <Button label="b" />
  </div>
);
"#,
    );
    write(&root, "src/util.ts", ADD);
    (dir, root)
}

fn tendril(root: &Path, args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_tendril"))
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .expect("Failed to execute tendril")
}

fn analyze_json(root: &Path, args: &[&str]) -> Vec<Value> {
    let mut full = vec!["analyze", "--json"];
    full.extend_from_slice(args);
    let output = tendril(root, &full);
    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    serde_json::from_slice(&output.stdout).unwrap()
}

fn regenerated(reports: &[Value]) -> Vec<String> {
    reports
        .iter()
        .filter(|r| r["needs_regeneration"] == true)
        .map(|r| r["key"]["name"].as_str().unwrap().to_string())
        .collect()
}

/// Test that the CLI can be invoked
#[test]
fn test_cli_invocation() {
    let output = Command::new(env!("CARGO_BIN_EXE_tendril"))
        .arg("--help")
        .output()
        .expect("Failed to execute command");

    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Incremental usage and change analysis"));
    assert!(stdout.contains("analyze"));
    assert!(stdout.contains("usages"));
}

#[test]
fn test_second_run_regenerates_nothing() {
    let (_dir, root) = repo();

    let first = analyze_json(&root, &[]);
    assert_eq!(regenerated(&first), vec!["App", "Button", "Primary", "add"]);
    assert!(root.join(".tendril/analysis-cache.json").is_file());

    let second = analyze_json(&root, &[]);
    assert!(regenerated(&second).is_empty());

    let forced = analyze_json(&root, &["--force"]);
    assert_eq!(regenerated(&forced).len(), 4);
}

#[test]
fn test_body_change_regenerates_only_that_entity() {
    let (_dir, root) = repo();
    analyze_json(&root, &[]);

    write(&root, "src/util.ts", &ADD.replace("a + b", "b + a"));
    let reports = analyze_json(&root, &[]);
    assert_eq!(regenerated(&reports), vec!["add"]);

    // comments and reformatting alone change nothing
    write(
        &root,
        "src/util.ts",
        "// Sum of two numbers.
export function add(a: number,
                    b: number): number {
  return b + a; // commutative
}
",
    );
    let reports = analyze_json(&root, &[]);
    assert!(regenerated(&reports).is_empty());
}

#[test]
fn test_barrel_usages_are_excluded() {
    let (_dir, root) = repo();
    let analysis = Coordinator::new(&root, TendrilConfig::default()).analyze().unwrap();

    let button = analysis
        .find(&EntityKey::new(root.join("src/components/Button.tsx"), "Button"))
        .unwrap();
    assert_eq!(
        button.usages,
        vec![
            UsageReference::new(root.join("src/App.tsx"), 5),
            UsageReference::new(root.join("src/App.tsx"), 6),
        ]
    );

    // without the barrel pattern the re-export file counts as a user
    let config = TendrilConfig {
        barrel_patterns: Vec::new(),
        ..TendrilConfig::default()
    };
    let analysis = Coordinator::new(&root, config).analyze().unwrap();
    let button = analysis
        .find(&EntityKey::new(root.join("src/components/Button.tsx"), "Button"))
        .unwrap();
    let barrel_use = UsageReference::new(root.join("src/components/index.ts"), 3);
    assert!(button.usages.contains(&barrel_use));
}

#[test]
fn test_version_mismatched_cache_starts_fresh() {
    let (_dir, root) = repo();
    write(
        &root,
        ".tendril/analysis-cache.json",
        r#"{
  "formatVersion": "0",
  "lastGenerated": null,
  "entries": {
    "src/util.ts:add": { "implementationHash": "stale", "interfaceHash": "stale" }
  }
}"#,
    );

    let reports = analyze_json(&root, &[]);
    assert_eq!(regenerated(&reports).len(), 4);

    let raw = fs::read_to_string(root.join(".tendril/analysis-cache.json")).unwrap();
    let cache: Value = serde_json::from_str(&raw).unwrap();
    assert_eq!(cache["formatVersion"], "1");
    assert_ne!(cache["entries"]["src/util.ts:add"]["implementationHash"], "stale");
    assert!(cache["lastGenerated"].is_string());
}

#[test]
fn test_usages_command_and_clear() {
    let (_dir, root) = repo();

    let output = tendril(&root, &["usages", "Button"]);
    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("src/App.tsx:5"));
    assert!(stdout.contains("src/App.tsx:6"));
    // a lookup is a full run and leaves the cache behind
    assert!(root.join(".tendril/analysis-cache.json").is_file());
    let reports = analyze_json(&root, &[]);
    assert!(regenerated(&reports).is_empty());

    assert!(tendril(&root, &["clear"]).status.success());
    assert!(!root.join(".tendril").exists());
}

#[test]
fn test_invalid_config_is_rejected() {
    let (_dir, root) = repo();
    write(&root, "tendril.toml", "similarity_threshold = 2.0\n");

    let output = tendril(&root, &["analyze"]);
    assert!(!output.status.success());
    assert!(String::from_utf8_lossy(&output.stderr).contains("similarity_threshold"));
}
