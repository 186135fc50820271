//! End-to-end CLI tests: build the fixture content and inspect the output.

use std::path::{Path, PathBuf};
use std::process::{Command, Output};
use tempfile::TempDir;

fn fixtures() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("fixtures/content")
}

fn run(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_mongo-guide"))
        .args(args)
        .output()
        .expect("failed to run mongo-guide")
}

fn path_arg(path: &Path) -> &str {
    path.to_str().unwrap()
}

struct Site {
    _tmp: TempDir,
    out: PathBuf,
}

impl Site {
    fn build() -> Self {
        let tmp = TempDir::new().unwrap();
        let out = tmp.path().join("dist");
        let temp_dir = tmp.path().join("work");
        let source = fixtures();
        let result = run(&[
            "build",
            "--source",
            path_arg(&source),
            "--output",
            path_arg(&out),
            "--temp-dir",
            path_arg(&temp_dir),
        ]);
        assert!(
            result.status.success(),
            "build failed: {}",
            String::from_utf8_lossy(&result.stderr)
        );
        Site { _tmp: tmp, out }
    }

    fn read(&self, rel: &str) -> String {
        std::fs::read_to_string(self.out.join(rel))
            .unwrap_or_else(|e| panic!("cannot read {rel}: {e}"))
    }
}

/// Values of `attr="..."` in document order.
fn attr_values(html: &str, attr: &str) -> Vec<String> {
    let needle = format!("{attr}=\"");
    html.split(needle.as_str())
        .skip(1)
        .filter_map(|rest| rest.split('"').next())
        .map(str::to_string)
        .collect()
}

#[test]
fn build_writes_every_page() {
    let site = Site::build();
    for rel in [
        "index.html",
        "404.html",
        "search-index.json",
        "beginner/index.html",
        "beginner/introduction/index.html",
        "beginner/crud-operations/index.html",
        "intermediate/indexes/index.html",
        "intermediate/aggregation/index.html",
        "advanced/replication/index.html",
        "advanced/scratch-notes/index.html",
    ] {
        assert!(site.out.join(rel).exists(), "missing {rel}");
    }
    assert!(!site.out.join("beginner/sharding-basics").exists());
}

#[test]
fn scan_then_generate_builds_from_manifest() {
    let tmp = TempDir::new().unwrap();
    let source = fixtures();
    let temp_dir = tmp.path().join("work");
    let out = tmp.path().join("dist");

    let scanned = run(&["scan", "--source", path_arg(&source), "--temp-dir", path_arg(&temp_dir)]);
    assert!(scanned.status.success());
    assert!(temp_dir.join("manifest.json").exists());

    let generated = run(&[
        "generate",
        "--source",
        path_arg(&source),
        "--output",
        path_arg(&out),
        "--temp-dir",
        path_arg(&temp_dir),
    ]);
    assert!(
        generated.status.success(),
        "generate failed: {}",
        String::from_utf8_lossy(&generated.stderr)
    );
    assert!(out.join("beginner/crud-operations/index.html").exists());
    assert!(String::from_utf8_lossy(&generated.stdout).contains("Generated 3 levels"));
}

#[test]
fn generate_without_manifest_fails() {
    let tmp = TempDir::new().unwrap();
    let result = run(&[
        "generate",
        "--output",
        path_arg(&tmp.path().join("dist")),
        "--temp-dir",
        path_arg(&tmp.path().join("missing")),
    ]);
    assert!(!result.status.success());
}

#[test]
fn toc_targets_match_article_ids() {
    let site = Site::build();
    let html = site.read("beginner/crud-operations/index.html");

    let targets = attr_values(&html, "data-target");
    assert_eq!(
        targets,
        vec![
            "crud-operations",
            "overview",
            "create",
            "inserting-one-document",
            "inserting-many-documents",
            "read",
            "overview-1",
            "comparison-operators",
            "in-and-nin-operators",
            "update",
            "delete",
        ]
    );

    let ids = attr_values(&html, "id");
    for target in &targets {
        assert!(ids.contains(target), "no element with id {target}");
    }
    assert!(!ids.iter().any(|id| id.contains("start-the-shell")));
}

#[test]
fn toc_starts_on_first_heading() {
    let site = Site::build();
    let html = site.read("beginner/introduction/index.html");
    assert!(html.contains(r##"class="active" href="#what-is-mongodb""##));
    assert_eq!(html.matches(r#"class="active""#).count(), 1);
}

#[test]
fn document_without_headings_shows_placeholder() {
    let tmp = TempDir::new().unwrap();
    let source = tmp.path().join("content");
    std::fs::create_dir_all(source.join("010-basics")).unwrap();
    std::fs::write(source.join("010-basics/010-plain.md"), "Only prose here.\n").unwrap();
    let out = tmp.path().join("dist");

    let result = run(&[
        "build",
        "--source",
        path_arg(&source),
        "--output",
        path_arg(&out),
        "--temp-dir",
        path_arg(&tmp.path().join("work")),
    ]);
    assert!(result.status.success());

    let html = std::fs::read_to_string(out.join("basics/plain/index.html")).unwrap();
    assert!(html.contains("No headings found"));
}

#[test]
fn search_index_has_sections() {
    let site = Site::build();
    let index: serde_json::Value = serde_json::from_str(&site.read("search-index.json")).unwrap();
    let entries = index.as_array().unwrap();
    let crud = entries
        .iter()
        .find(|e| e["url"] == "/beginner/crud-operations/")
        .unwrap();
    let ids: Vec<&str> = crud["sections"]
        .as_array()
        .unwrap()
        .iter()
        .filter_map(|s| s["id"].as_str())
        .collect();
    assert!(ids.contains(&"in-and-nin-operators"));
}

#[test]
fn check_reports_valid_content() {
    let source = fixtures();
    let result = run(&["check", "--source", path_arg(&source)]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("Content is valid"));
    assert!(stdout.contains("001 Getting Started"));
}

#[test]
fn check_fails_on_empty_level() {
    let tmp = TempDir::new().unwrap();
    std::fs::create_dir_all(tmp.path().join("010-empty")).unwrap();
    std::fs::write(tmp.path().join("010-empty/index.md"), "# Empty\n").unwrap();

    let result = run(&["check", "--source", path_arg(tmp.path())]);
    assert!(!result.status.success());
}

#[test]
fn toc_command_prints_outline() {
    let source = fixtures();
    let result = run(&[
        "toc",
        "beginner",
        "crud-operations",
        "--source",
        path_arg(&source),
    ]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("    Overview  #overview\n"));
    assert!(stdout.contains("        Overview  #overview-1\n"));
}

#[test]
fn toc_command_unknown_topic_fails() {
    let source = fixtures();
    let result = run(&["toc", "beginner", "nope", "--source", path_arg(&source)]);
    assert!(!result.status.success());
    assert!(String::from_utf8_lossy(&result.stderr).contains("nope"));
}

#[test]
fn search_command_links_headings() {
    let source = fixtures();
    let result = run(&["search", "$nin", "--source", path_arg(&source)]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("/beginner/crud-operations/#in-and-nin-operators"));
}

#[test]
fn search_limit_flag_caps_results() {
    let source = fixtures();
    let result = run(&["search", "the", "--limit", "1", "--source", path_arg(&source)]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.trim_end().ends_with("1 match"));
}

#[test]
fn gen_config_round_trips() {
    let result = run(&["gen-config"]);
    assert!(result.status.success());
    let stdout = String::from_utf8_lossy(&result.stdout);
    assert!(stdout.contains("[toc]"));
    assert!(stdout.contains("scroll_threshold"));
}
