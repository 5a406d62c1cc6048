//! Integration tests for the sentinel-packs pipeline and CLI.

mod common;

use std::process::Command;

/// Verify the binary can be invoked and shows help.
#[test]
fn test_cli_help() {
    let output = Command::new(common::sentinel_packs_bin())
        .args(["--help"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("sentinel-packs") || stdout.contains("Usage"));
}

/// Verify the binary shows version information.
#[test]
fn test_cli_version() {
    let output = Command::new(common::sentinel_packs_bin())
        .args(["--version"])
        .output()
        .expect("Failed to execute command");

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains(env!("CARGO_PKG_VERSION")));
}

mod pipeline {
    use super::common::{
        create_mock_corpus, create_temp_dir, list_files, read_yaml, sentinel_corpus_files,
        test_config,
    };
    use sentinel_packs::run;
    use sentinel_packs::utils::error::PackError;

    #[test]
    fn test_end_to_end_multi_query_folder() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(
            &temp_dir,
            &[
                ("Network/DNS/q1.kql", "T1"),
                ("Network/DNS/q2.kql", "// desc2\nT2"),
            ],
        );
        let out = temp_dir.path().join("generated-packs");

        let summary = run(test_config(&corpus, &out)).unwrap();
        assert_eq!(summary.packs_generated, 1);
        assert_eq!(summary.queries_processed, 2);

        let doc = read_yaml(&out.join("network-dns.yaml"));
        assert_eq!(doc["name"].as_str(), Some("Network/DNS"));
        assert_eq!(
            doc["description"].as_str(),
            Some("Queries from Network/DNS category")
        );
        assert_eq!(doc["author"].as_str(), Some("reprise99/Sentinel-Queries"));
        assert!(doc.get("query").is_none());

        let queries = doc["queries"].as_sequence().unwrap();
        assert_eq!(queries.len(), 2);
        assert_eq!(queries[0]["name"].as_str(), Some("q1"));
        assert_eq!(queries[0]["query"].as_str(), Some("T1"));
        assert!(queries[0].get("description").is_none());
        assert_eq!(queries[1]["name"].as_str(), Some("q2"));
        assert_eq!(queries[1]["query"].as_str(), Some("T2"));
        assert_eq!(queries[1]["description"].as_str(), Some("desc2"));
    }

    #[test]
    fn test_full_corpus() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &sentinel_corpus_files());
        let out = temp_dir.path().join("packs");

        let summary = run(test_config(&corpus, &out)).unwrap();

        assert_eq!(summary.packs_generated, 3);
        assert_eq!(summary.queries_processed, 4);
        assert_eq!(summary.files_skipped, 2);
        assert_eq!(summary.empty_folders, 1);
        assert!(summary.written);
        assert_eq!(summary.outputs.len(), 3);
        assert_eq!(
            list_files(&out),
            vec!["azure-active-directory.yaml", "network-dns.yaml", "root.yaml"]
        );

        let aad = read_yaml(&out.join("azure-active-directory.yaml"));
        assert_eq!(
            aad["description"].as_str(),
            Some("Finds risky sign-ins over the last day")
        );
        assert_eq!(
            aad["query"].as_str(),
            Some("SigninLogs\n| where RiskLevelDuringSignIn == \"high\"")
        );
        assert!(aad.get("queries").is_none());

        let root = read_yaml(&out.join("root.yaml"));
        assert_eq!(root["name"].as_str(), Some("root"));
        assert_eq!(root["description"].as_str(), Some("At the root"));
        assert_eq!(root["query"].as_str(), Some("SecurityEvent"));
    }

    #[test]
    fn test_empty_files_never_appear_in_packs() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(
            &temp_dir,
            &[
                ("Mixed/a.kql", "QueryA"),
                ("Mixed/b.kql", "\n\n"),
                ("Mixed/c.kql", "QueryC"),
            ],
        );
        let out = temp_dir.path().join("out");

        let summary = run(test_config(&corpus, &out)).unwrap();
        assert_eq!(summary.files_skipped, 1);

        let doc = read_yaml(&out.join("mixed.yaml"));
        let names: Vec<_> = doc["queries"]
            .as_sequence()
            .unwrap()
            .iter()
            .map(|q| q["name"].as_str().unwrap().to_string())
            .collect();
        assert_eq!(names, vec!["a", "c"]);
    }

    #[test]
    fn test_comment_only_file_is_kept_with_comments_as_body() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &[("Notes/note.kql", "// just a note\n")]);
        let out = temp_dir.path().join("out");

        run(test_config(&corpus, &out)).unwrap();

        let doc = read_yaml(&out.join("notes.yaml"));
        assert_eq!(doc["description"].as_str(), Some("just a note"));
        assert_eq!(doc["query"].as_str(), Some("// just a note"));
    }

    #[test]
    fn test_excluded_folders_are_skipped() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(
            &temp_dir,
            &[
                ("Workbooks/w.kql", "W"),
                ("Sub/Diagrams/d.kql", "D"),
                ("Kept/k.kql", "K"),
            ],
        );
        let out = temp_dir.path().join("out");

        let summary = run(test_config(&corpus, &out)).unwrap();
        assert_eq!(summary.packs_generated, 1);
        assert_eq!(list_files(&out), vec!["kept.yaml"]);
    }

    #[test]
    fn test_missing_input_is_fatal_and_writes_nothing() {
        let temp_dir = create_temp_dir();
        let missing = temp_dir.path().join("Sentinel-Queries");
        let out = temp_dir.path().join("out");

        let err = run(test_config(&missing, &out)).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<PackError>(),
            Some(PackError::InputNotFound { .. })
        ));
        assert!(!out.exists());
    }

    #[test]
    fn test_output_is_reproducible() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &sentinel_corpus_files());
        let first = temp_dir.path().join("first");
        let second = temp_dir.path().join("second");

        run(test_config(&corpus, &first)).unwrap();
        run(test_config(&corpus, &second)).unwrap();

        for name in list_files(&first) {
            let a = std::fs::read(first.join(&name)).unwrap();
            let b = std::fs::read(second.join(&name)).unwrap();
            assert_eq!(a, b, "{name} differs between runs");
        }
    }

    #[test]
    fn test_json_format() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &[("Identity/q.kql", "// Desc\nIdentityInfo")]);
        let out = temp_dir.path().join("out");

        let mut config = test_config(&corpus, &out);
        config.format = "json".to_string();
        run(config).unwrap();

        let text = std::fs::read_to_string(out.join("identity.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["name"], "Identity");
        assert_eq!(value["description"], "Desc");
        assert_eq!(value["query"], "IdentityInfo");
    }

    #[test]
    fn test_dry_run_and_validate_only_write_nothing() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &sentinel_corpus_files());

        for (dry_run, validate_only) in [(true, false), (false, true)] {
            let out = temp_dir.path().join(format!("out-{dry_run}-{validate_only}"));
            let mut config = test_config(&corpus, &out);
            config.dry_run = dry_run;
            config.validate_only = validate_only;

            let summary = run(config).unwrap();
            assert_eq!(summary.packs_generated, 3);
            assert!(!summary.written);
            assert!(summary.outputs.is_empty());
            assert!(!out.exists());
        }
    }

    #[test]
    fn test_crlf_files_produce_plain_newlines() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(
            &temp_dir,
            &[
                ("Windows/a.kql", "// First\r\nSecurityEvent\r\n| take 5\r\n"),
                ("Windows/b.kql", "DeviceEvents\r\n| count\r\n"),
            ],
        );
        let out = temp_dir.path().join("out");

        run(test_config(&corpus, &out)).unwrap();

        let text = std::fs::read_to_string(out.join("windows.yaml")).unwrap();
        assert!(!text.contains("\\r"), "escaped carriage return in:\n{text}");
        let doc = read_yaml(&out.join("windows.yaml"));
        let queries = doc["queries"].as_sequence().unwrap();
        assert_eq!(queries[0]["query"].as_str(), Some("SecurityEvent\n| take 5"));
        assert_eq!(queries[1]["query"].as_str(), Some("DeviceEvents\n| count"));
    }

    #[test]
    fn test_nameless_file_does_not_stop_other_folders() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(
            &temp_dir,
            &[("Alpha/.kql", "A"), ("Alpha/b.kql", "B"), ("Beta/c.kql", "C")],
        );
        let out = temp_dir.path().join("out");

        let summary = run(test_config(&corpus, &out)).unwrap();
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(list_files(&out), vec!["alpha.yaml", "beta.yaml"]);
        assert_eq!(read_yaml(&out.join("alpha.yaml"))["query"].as_str(), Some("B"));
    }

    #[test]
    fn test_unreadable_file_is_skipped() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &[("Bin/good.kql", "Good")]);
        std::fs::write(corpus.join("Bin/bad.kql"), [0xff, 0xfe, 0xfd]).unwrap();
        let out = temp_dir.path().join("out");

        let summary = run(test_config(&corpus, &out)).unwrap();
        assert_eq!(summary.files_skipped, 1);
        assert_eq!(summary.queries_processed, 1);
        let doc = read_yaml(&out.join("bin.yaml"));
        assert_eq!(doc["query"].as_str(), Some("Good"));
    }
}

mod cli_runs {
    use super::common::{
        create_mock_corpus, create_temp_dir, list_files, sentinel_corpus_files,
        sentinel_packs_bin,
    };
    use std::process::Command;

    #[test]
    fn test_cli_generates_packs() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &sentinel_corpus_files());
        let out = temp_dir.path().join("generated-packs");

        let output = Command::new(sentinel_packs_bin())
            .arg(&corpus)
            .arg(&out)
            .arg("-q")
            .current_dir(temp_dir.path())
            .output()
            .expect("Failed to execute command");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        assert_eq!(list_files(&out).len(), 3);
    }

    #[test]
    fn test_cli_missing_input_exits_with_error() {
        let temp_dir = create_temp_dir();
        let missing = temp_dir.path().join("nope");
        let out = temp_dir.path().join("out");

        let output = Command::new(sentinel_packs_bin())
            .arg(&missing)
            .arg(&out)
            .current_dir(temp_dir.path())
            .output()
            .expect("Failed to execute command");

        assert_eq!(output.status.code(), Some(1));
        let stderr = String::from_utf8_lossy(&output.stderr);
        assert!(stderr.contains("Input path not found"), "stderr: {stderr}");
        assert!(!out.exists());
    }

    #[test]
    fn test_cli_reads_config_file() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &[("Azure/a.kql", "AzureActivity")]);
        let config_path = temp_dir.path().join("custom.toml");
        std::fs::write(
            &config_path,
            format!(
                "[general]\ninput = {:?}\noutput = \"packs\"\nformat = \"json\"\nauthor = \"soc\"\n",
                corpus.to_string_lossy()
            ),
        )
        .unwrap();

        let output = Command::new(sentinel_packs_bin())
            .args(["--config", config_path.to_str().unwrap(), "-q"])
            .current_dir(temp_dir.path())
            .output()
            .expect("Failed to execute command");

        assert!(
            output.status.success(),
            "stderr: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        let text = std::fs::read_to_string(temp_dir.path().join("packs/azure.json")).unwrap();
        let value: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(value["author"], "soc");
    }

    #[test]
    fn test_cli_dry_run_prints_plan() {
        let temp_dir = create_temp_dir();
        let corpus = create_mock_corpus(&temp_dir, &sentinel_corpus_files());
        let out = temp_dir.path().join("out");

        let output = Command::new(sentinel_packs_bin())
            .arg(&corpus)
            .arg(&out)
            .arg("--dry-run")
            .current_dir(temp_dir.path())
            .output()
            .expect("Failed to execute command");

        assert!(output.status.success());
        let stdout = String::from_utf8_lossy(&output.stdout);
        assert!(stdout.contains("Dry Run"), "stdout: {stdout}");
        assert!(stdout.contains("network-dns.yaml"), "stdout: {stdout}");
        assert!(!out.exists());
    }
}
