use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use tempfile::TempDir;

fn scry_binary() -> PathBuf {
    let mut path = std::env::current_exe().unwrap();
    path.pop(); // remove test binary name
    path.pop(); // remove deps/
    path.push("scry");
    path
}

fn write(root: &Path, rel: &str, body: &str) {
    let path = root.join(rel);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, body).unwrap();
}

fn setup_repo() -> TempDir {
    let tmp = TempDir::new().unwrap();
    let root = tmp.path();
    write(
        root,
        "pkg/ignore/ignore.go",
        "package ignore\n\n// Matcher holds patterns.\ntype Matcher struct {\n\tglobs []string\n}\n\n\
         func (m *Matcher) Ignored(rel string) bool {\n\t// match rel against the ignore patterns\n\
         \treturn len(m.globs) > 0\n}\n",
    );
    write(
        root,
        "pkg/scan/scan.go",
        "package scan\n\nfunc ListFiles(root string) []string {\n\t// walk the tree and skip ignored paths\n\treturn nil\n}\n",
    );
    write(
        root,
        "README.md",
        "# Demo\n\nA demo repository.\n\n## Ignore rules\n\nPatterns in .gitignore and .scryignore exclude files.\n",
    );
    write(root, "pkg/scan/scan_test.go", "package scan\n\nfunc TestListFiles() {}\n");
    tmp
}

/// Runs scry with `--root <root>` and returns (stdout, stderr, exit code).
fn run_scry(root: &Path, args: &[&str]) -> (String, String, i32) {
    let binary = scry_binary();
    let output = Command::new(&binary)
        .arg("--root")
        .arg(root)
        .args(args)
        .output()
        .unwrap_or_else(|e| panic!("Failed to run scry binary at {:?}: {}", binary, e));

    let stdout = String::from_utf8_lossy(&output.stdout).to_string();
    let stderr = String::from_utf8_lossy(&output.stderr).to_string();
    (stdout, stderr, output.status.code().unwrap_or(-1))
}

#[test]
fn test_index_creates_database() {
    let repo = setup_repo();
    let (stdout, stderr, code) = run_scry(repo.path(), &["index"]);
    assert_eq!(code, 0, "index failed: stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("indexed 3 file(s)"), "stdout={}", stdout);
    assert!(repo.path().join(".scry/index.db").is_file());
}

#[test]
fn test_index_is_incremental() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["--json", "index"]);
    assert_eq!(code, 0);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["files_indexed"], 0);
    assert_eq!(summary["files_unchanged"], 3);

    let (stdout, _, code) = run_scry(repo.path(), &["--json", "index", "--clean"]);
    assert_eq!(code, 0);
    let summary: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(summary["files_indexed"], 3);
}

#[test]
fn test_json_index_emits_progress_on_stderr() {
    let repo = setup_repo();
    let (_, stderr, code) = run_scry(repo.path(), &["--json", "index"]);
    assert_eq!(code, 0);

    let events: Vec<serde_json::Value> = stderr
        .lines()
        .filter_map(|l| serde_json::from_str(l).ok())
        .filter(|v: &serde_json::Value| v["type"] == "progress")
        .collect();
    assert_eq!(events[0]["stage"], "scan");
    assert_eq!(events[0]["files_total"], 3);
    assert_eq!(events.iter().filter(|e| e["stage"] == "index").count(), 3);
}

#[test]
fn test_quiet_suppresses_progress() {
    let repo = setup_repo();
    let (_, stderr, code) = run_scry(repo.path(), &["--json", "--quiet", "index"]);
    assert_eq!(code, 0);
    assert!(!stderr.contains("\"progress\""), "stderr={}", stderr);
}

#[test]
fn test_commands_require_an_index() {
    let repo = setup_repo();
    let cases: [&[&str]; 3] = [&["search", "ignore"], &["ask", "how does ignore work"], &["status"]];
    for args in cases {
        let (_, stderr, code) = run_scry(repo.path(), args);
        assert_eq!(code, 3, "{:?}: stderr={}", args, stderr);
        assert!(stderr.contains("scry index"));
    }
}

#[test]
fn test_search_finds_chunks() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, stderr, code) = run_scry(repo.path(), &["search", "ignore"]);
    assert_eq!(code, 0, "stderr={}", stderr);
    assert!(stdout.contains("pkg/ignore/ignore.go:"), "stdout={}", stdout);
    assert!(!stdout.contains("scan_test.go"));
}

#[test]
fn test_search_json_and_limit() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["--json", "search", "ignore patterns", "--limit", "1"]);
    assert_eq!(code, 0);
    let hits: Vec<serde_json::Value> = serde_json::from_str(&stdout).unwrap();
    assert_eq!(hits.len(), 1);
    assert!(hits[0]["score"].as_f64().unwrap() > 0.0);
    assert!(hits[0]["path"].is_string());
}

#[test]
fn test_search_no_results() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["search", "kubernetes"]);
    assert_eq!(code, 5);
    assert!(stdout.contains("No results."));
}

#[test]
fn test_ask_answers_with_evidence() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, stderr, code) = run_scry(repo.path(), &["ask", "how do ignore patterns work"]);
    assert_eq!(code, 0, "stdout={}, stderr={}", stdout, stderr);
    assert!(stdout.contains("relevant evidence chunk(s)."), "stdout={}", stdout);
    assert!(stdout.contains("pkg/ignore/ignore.go:"), "stdout={}", stdout);
}

#[test]
fn test_ask_declines_without_evidence() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["ask", "kubernetes deployment"]);
    assert_eq!(code, 5);
    assert!(stdout.contains("I don't know (reason: no_evidence)"), "stdout={}", stdout);
}

#[test]
fn test_ask_declines_low_score_from_config() {
    let repo = setup_repo();
    write(repo.path(), ".scry.toml", "[ask]\nmin_score = 1000.0\n");
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["ask", "how do ignore patterns work"]);
    assert_eq!(code, 5);
    assert!(stdout.contains("I don't know (reason: low_score)"), "stdout={}", stdout);

    let (stdout, _, code) = run_scry(repo.path(), &["--json", "ask", "how do ignore patterns work"]);
    assert_eq!(code, 5);
    let decision: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(decision["reason"], "low_score");
    assert_eq!(decision["evidence"].as_array().unwrap().len(), 0);
}

#[test]
fn test_status_reports_counts() {
    let repo = setup_repo();
    run_scry(repo.path(), &["index"]);

    let (stdout, _, code) = run_scry(repo.path(), &["--json", "status"]);
    assert_eq!(code, 0);
    let status: serde_json::Value = serde_json::from_str(&stdout).unwrap();
    assert_eq!(status["files"], 3);
    assert!(status["chunks"].as_i64().unwrap() >= 3);
    assert!(status["terms"].as_i64().unwrap() > 0);

    let (stdout, _, code) = run_scry(repo.path(), &["status"]);
    assert_eq!(code, 0);
    assert!(stdout.contains("Files:     3"), "stdout={}", stdout);
}

#[test]
fn test_explicit_config_must_exist() {
    let repo = setup_repo();
    let missing = repo.path().join("missing.toml");
    let (_, stderr, code) = run_scry(repo.path(), &["--config", missing.to_str().unwrap(), "status"]);
    assert_eq!(code, 1);
    assert!(stderr.contains("Failed to read config file"), "stderr={}", stderr);
}

#[test]
fn test_usage_errors_exit_2() {
    let repo = setup_repo();
    let (_, _, code) = run_scry(repo.path(), &[]);
    assert_eq!(code, 2);
    let (_, _, code) = run_scry(repo.path(), &["frobnicate"]);
    assert_eq!(code, 2);
}
