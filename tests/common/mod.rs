//! Common test utilities and fixtures for integration tests.

#![allow(dead_code)]

use sentinel_packs::MergedConfig;
use sentinel_packs::generator::DEFAULT_AUTHOR;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Creates a temporary directory for test fixtures.
pub fn create_temp_dir() -> TempDir {
    tempfile::tempdir().expect("Failed to create temp directory")
}

/// Writes `files` (relative path, content) under `<dir>/corpus` and returns the corpus root.
pub fn create_mock_corpus(dir: &TempDir, files: &[(&str, &str)]) -> PathBuf {
    let root = dir.path().join("corpus");
    std::fs::create_dir_all(&root).expect("Failed to create corpus root");

    for (path, content) in files {
        let file_path = root.join(path);
        if let Some(parent) = file_path.parent() {
            std::fs::create_dir_all(parent).expect("Failed to create parent directories");
        }
        std::fs::write(&file_path, content).expect("Failed to write file");
    }

    root
}

/// A small corpus shaped like the Sentinel-Queries repository.
pub fn sentinel_corpus_files() -> Vec<(&'static str, &'static str)> {
    vec![
        ("Network/DNS/q1.kql", "DnsEvents\n| take 10\n"),
        (
            "Network/DNS/q2.kql",
            "// desc2\n\nDnsEvents\n| where Name has \"example\"\n",
        ),
        (
            "Azure Active Directory/Risky-Signins.kql",
            "// Finds risky sign-ins\n// over the last day\nSigninLogs\n| where RiskLevelDuringSignIn == \"high\"\n",
        ),
        ("Azure Active Directory/Empty.kql", "\n   \n"),
        ("Diagrams/diagram.kql", "ShouldNotAppear"),
        ("Broken/only-blank.kql", ""),
        ("Broken/notes.md", "not a query"),
        ("top-level.kql", "// At the root\nSecurityEvent\n"),
    ]
}

/// Configuration for a quiet run from `input` into `output`.
pub fn test_config(input: &Path, output: &Path) -> MergedConfig {
    MergedConfig {
        input: input.to_path_buf(),
        output: output.to_path_buf(),
        format: "yaml".to_string(),
        author: DEFAULT_AUTHOR.to_string(),
        extension: "kql".to_string(),
        root_label: "root".to_string(),
        exclude: vec![
            "Diagrams".to_string(),
            "Workbooks".to_string(),
            ".git".to_string(),
        ],
        dry_run: false,
        validate_only: false,
        verbose: 0,
        quiet: true,
    }
}

/// Parse a written YAML pack.
pub fn read_yaml(path: &Path) -> serde_yaml::Value {
    let text = std::fs::read_to_string(path).expect("Failed to read pack file");
    serde_yaml::from_str(&text).expect("Pack file is not valid YAML")
}

/// Sorted file names in a directory.
pub fn list_files(dir: &Path) -> Vec<String> {
    let mut names: Vec<String> = std::fs::read_dir(dir)
        .expect("Failed to read directory")
        .map(|entry| {
            entry
                .expect("Failed to read entry")
                .file_name()
                .to_string_lossy()
                .into_owned()
        })
        .collect();
    names.sort();
    names
}

/// Path of the compiled binary under test.
pub fn sentinel_packs_bin() -> &'static str {
    env!("CARGO_BIN_EXE_sentinel-packs")
}
