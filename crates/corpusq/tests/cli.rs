//! CLI integration tests for `corpusq ask`/`select`.

// Integration tests live outside cfg(test) by design
#![allow(clippy::tests_outside_test_module)]

use std::fs;

use assert_cmd::Command;
use predicates::prelude::*;

fn temp_dir() -> tempfile::TempDir {
    tempfile::tempdir().unwrap()
}

fn corpusq() -> Command {
    #[allow(deprecated)]
    Command::cargo_bin("corpusq").unwrap()
}

const TWO_DOC_CORPUS: &str = r#"[
    {
        "content": "storage system overview volume one",
        "source": "a.pdf",
        "page": 1,
        "domain": "storage",
        "doc_type": "guide",
        "product": "sys"
    },
    {
        "content": "weather forecast sunny day tomorrow",
        "source": "b.pdf",
        "page": 1,
        "domain": "weather",
        "doc_type": "guide",
        "product": "misc"
    }
]"#;

const AMBIGUOUS_CORPUS: &str = r#"[
    {
        "content": "storage system overview volume one",
        "source": "a.pdf",
        "page": 1,
        "domain": "storage_a",
        "doc_type": "guide",
        "product": "sys_a"
    },
    {
        "content": "storage system overview volume two",
        "source": "b.pdf",
        "page": 1,
        "domain": "storage_b",
        "doc_type": "guide",
        "product": "sys_b"
    }
]"#;

const RELAXED_GAP_CONFIG: &str = "\
min_gap = 0.5
min_group_gap = 0.5
enable_sig_tiebreak = false
enable_anchor_tiebreak = false
";

mod ask {
    use super::*;

    #[test]
    fn clear_match_resolves_to_ok_with_a_table() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, TWO_DOC_CORPUS).unwrap();

        corpusq()
            .current_dir(dir.path())
            .args(["ask", "storage system overview volume one", "--corpus"])
            .arg(&corpus)
            .assert()
            .success()
            .stdout(predicate::str::contains("Status: ok"))
            .stdout(predicate::str::contains("a.pdf"));
    }

    #[test]
    fn unrelated_query_is_refused() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, TWO_DOC_CORPUS).unwrap();

        corpusq()
            .current_dir(dir.path())
            .args(["ask", "zzz totally unrelated gibberish term", "--corpus"])
            .arg(&corpus)
            .assert()
            .failure()
            .stdout(predicate::str::contains("Status: refuse"))
            .stdout(predicate::str::contains("Insufficient relevance"));
    }

    #[test]
    fn json_output_parses_as_valid_json() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, TWO_DOC_CORPUS).unwrap();

        let output = corpusq()
            .current_dir(dir.path())
            .args(["ask", "storage system overview volume one", "--corpus"])
            .arg(&corpus)
            .args(["--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: serde_json::Value = serde_json::from_slice(&output).unwrap();
        assert_eq!(value["status"], "ok");
        assert_eq!(value["source_documents"][0]["filename"], "a.pdf");
    }

    #[test]
    fn ambiguous_query_presents_multiple_options() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, AMBIGUOUS_CORPUS).unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, RELAXED_GAP_CONFIG).unwrap();

        corpusq()
            .current_dir(dir.path())
            .args(["ask", "storage system overview", "--corpus"])
            .arg(&corpus)
            .args(["--config"])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("Status: ambiguous"))
            .stdout(predicate::str::contains("Option"));

        assert!(dir.path().join(".corpusq_pending.json").exists());
    }
}

mod select {
    use super::*;

    #[test]
    fn resolves_a_pending_ambiguous_query() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, AMBIGUOUS_CORPUS).unwrap();
        let config = dir.path().join("config.toml");
        fs::write(&config, RELAXED_GAP_CONFIG).unwrap();

        let ask_json = corpusq()
            .current_dir(dir.path())
            .args(["ask", "storage system overview", "--corpus"])
            .arg(&corpus)
            .args(["--config"])
            .arg(&config)
            .args(["--json"])
            .assert()
            .success()
            .get_output()
            .stdout
            .clone();

        let value: serde_json::Value = serde_json::from_slice(&ask_json).unwrap();
        let option_id = value["options"][0]["option_id"].as_u64().unwrap();

        corpusq()
            .current_dir(dir.path())
            .args(["select", "storage system overview", "--option"])
            .arg(option_id.to_string())
            .args(["--corpus"])
            .arg(&corpus)
            .args(["--config"])
            .arg(&config)
            .assert()
            .success()
            .stdout(predicate::str::contains("Status: ok"));

        assert!(!dir.path().join(".corpusq_pending.json").exists());
    }

    #[test]
    fn fails_with_no_pending_query() {
        let dir = temp_dir();
        let corpus = dir.path().join("corpus.json");
        fs::write(&corpus, TWO_DOC_CORPUS).unwrap();

        corpusq()
            .current_dir(dir.path())
            .args(["select", "nothing was asked", "--option", "1", "--corpus"])
            .arg(&corpus)
            .assert()
            .failure()
            .stderr(predicate::str::contains("no pending ambiguous query"));
    }
}
