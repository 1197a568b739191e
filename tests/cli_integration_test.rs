use std::fs;
use std::path::Path;
use tempfile::TempDir;
use testmap::cli::OutputFormat;
use testmap::commands::analyze::{run, AnalyzeConfig};

fn write(root: &Path, rel: &str, text: &str) {
    let path = root.join(rel);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, text).unwrap();
}

fn scaffold(dir: &TempDir) {
    write(
        dir.path(),
        "CMakeLists.txt",
        "project(demo_app)\nset(CMAKE_CXX_STANDARD 20)\nadd_executable(demo src/main.cpp)\nfind_package(Boost)\n",
    );
    write(
        dir.path(),
        "include/demo/codec.hpp",
        "#pragma once\nnamespace demo {\nbool decode(const uint8_t* data, size_t len);\n}\n",
    );
    write(
        dir.path(),
        "third_party/vendored/junk.hpp",
        "namespace vendored { void parse(const uint8_t* p, size_t n); }\n",
    );
    write(
        dir.path(),
        "testmap.toml",
        "ignore = [\"third_party/**\"]\nmanifest = \"deps.json\"\n",
    );
    write(
        dir.path(),
        "deps.json",
        r#"{"dependencies": [{"name": "fmt", "version": "10.0"}]}"#,
    );
}

#[test]
fn analyze_honors_config_ignore_and_manifest() {
    let dir = TempDir::new().unwrap();
    scaffold(&dir);
    let out = dir.path().join("report.json");

    run(AnalyzeConfig {
        path: dir.path().to_path_buf(),
        format: OutputFormat::Json,
        output: Some(out.clone()),
        manifest: None,
        jobs: None,
        no_parallel: true,
    })
    .unwrap();

    let report: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(out).unwrap()).unwrap();

    assert_eq!(report["project"]["name"], "demo_app");
    assert_eq!(report["project"]["cpp_standard"], "20");
    assert_eq!(report["project"]["type"], "executable");

    // The ignored vendored namespace never shows up.
    let modules = report["modules"].as_array().unwrap();
    assert_eq!(modules.len(), 1);
    assert_eq!(modules[0]["name"], "demo");

    let functions = report["key_functions"].as_array().unwrap();
    assert_eq!(functions.len(), 1);
    assert_eq!(functions[0]["name"], "demo::decode");
    assert_eq!(functions[0]["priority"], "P0");
    assert_eq!(functions[0]["category"], "parsing/encoding");
}

#[test]
fn analyze_writes_markdown_tiers() {
    let dir = TempDir::new().unwrap();
    scaffold(&dir);
    let out = dir.path().join("report.md");

    run(AnalyzeConfig {
        path: dir.path().to_path_buf(),
        format: OutputFormat::Markdown,
        output: Some(out.clone()),
        manifest: None,
        jobs: None,
        no_parallel: true,
    })
    .unwrap();

    let text = fs::read_to_string(out).unwrap();
    assert!(text.contains("# Test Priority Report: demo_app"));
    assert!(text.contains("### P0: Parsing & Encoding (highest priority) (1 functions)"));
    assert!(text.contains("`bool decode(const uint8_t*, size_t)`"));
}

#[test]
fn analyze_rejects_missing_manifest_override() {
    let dir = TempDir::new().unwrap();
    scaffold(&dir);

    let result = run(AnalyzeConfig {
        path: dir.path().to_path_buf(),
        format: OutputFormat::Json,
        output: None,
        manifest: Some(dir.path().join("missing.json")),
        jobs: None,
        no_parallel: true,
    });
    assert!(result.is_err());
}
