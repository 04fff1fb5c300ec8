//! End-to-end tests for the gomodup CLI
//!
//! These tests verify:
//! - Each subcommand produces the `{"result": ...}` response shape
//! - Failures produce `{"error": ...}` and exit code 1
//! - `run` dispatches `{"function": ..., "args": ...}` requests
//!
//! None of them reach a module proxy.

use assert_cmd::Command;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::Path;
use tempfile::TempDir;

const GO_MOD: &str = "module example.com/app

go 1.21

require (
	example.com/mod v1.2.0
	golang.org/x/text v0.14.0 // indirect
)

exclude example.com/mod v1.3.0
";

/// Create a module with a go.mod and a couple of importing files
fn create_test_module() -> TempDir {
    let temp_dir = tempfile::tempdir().expect("Failed to create temp directory");
    let root = temp_dir.path();
    fs::write(root.join("go.mod"), GO_MOD).unwrap();
    fs::write(
        root.join("main.go"),
        "package main\n\nimport \"example.com/mod\"\n\nfunc main() { mod.Run() }\n",
    )
    .unwrap();
    fs::create_dir_all(root.join("pkg/api")).unwrap();
    fs::write(
        root.join("pkg/api/api.go"),
        "package api\n\nimport (\n\t\"net/http\"\n\n\tm \"example.com/mod/server\"\n)\n",
    )
    .unwrap();
    temp_dir
}

fn gomodup(dir: &Path) -> Command {
    let mut cmd = Command::cargo_bin("gomodup").unwrap();
    cmd.arg("--dir").arg(dir).env("GOPROXY", "https://proxy.golang.org,direct");
    cmd
}

fn parse_output(output: &[u8]) -> Value {
    serde_json::from_slice(output).expect("Output should be valid JSON")
}

mod edit_json {
    use super::*;

    #[test]
    fn test_edit_json_output_schema() {
        let temp_dir = create_test_module();

        let output = gomodup(temp_dir.path())
            .arg("edit-json")
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = parse_output(&output.stdout);
        let result = &json["result"];
        assert_eq!(result["Module"]["Path"], "example.com/app");
        assert_eq!(result["Go"], "1.21");
        assert_eq!(result["Require"][0]["Path"], "example.com/mod");
        assert_eq!(result["Require"][0]["Version"], "v1.2.0");
        assert!(result["Require"][0].get("Indirect").is_none());
        assert_eq!(result["Require"][1]["Indirect"], true);
        assert_eq!(result["Exclude"][0]["Version"], "v1.3.0");
        assert!(json.get("error").is_none());
    }

    #[test]
    fn test_edit_json_missing_manifest() {
        let temp_dir = TempDir::new().unwrap();

        gomodup(temp_dir.path())
            .arg("edit-json")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("\"error\""))
            .stdout(predicate::str::contains("manifest file not found"));
    }

    #[test]
    fn test_pretty_output() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .args(["edit-json", "--pretty"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("{\n  \"result\""));
    }
}

mod update_dependency_file {
    use super::*;

    #[test]
    fn test_minor_update_from_stdin() {
        let temp_dir = create_test_module();
        let root = temp_dir.path();

        gomodup(root)
            .arg("update-dependency-file")
            .write_stdin(r#"{"dependencies":[{"name":"example.com/mod","version":"v1.4.0","indirect":false}]}"#)
            .assert()
            .success()
            .stdout("{\"result\":[]}\n");

        let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
        assert!(go_mod.contains("\texample.com/mod v1.4.0\n"));
        assert!(go_mod.contains("exclude example.com/mod v1.3.0\n"));
    }

    #[test]
    fn test_major_update_from_args_file() {
        let temp_dir = create_test_module();
        let root = temp_dir.path();
        let payload_dir = TempDir::new().unwrap();
        let payload = payload_dir.path().join("payload.json");
        fs::write(
            &payload,
            r#"{"dependencies":[{"name":"example.com/mod/v2","version":"2.0.0","previousVersion":"v1.2.0"}]}"#,
        )
        .unwrap();

        let output = gomodup(root)
            .arg("update-dependency-file")
            .arg("--args")
            .arg(&payload)
            .output()
            .unwrap();
        assert!(output.status.success());

        let json = parse_output(&output.stdout);
        assert_eq!(json["result"], serde_json::json!(["main.go", "pkg/api/api.go"]));

        let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
        assert!(go_mod.contains("\texample.com/mod/v2 v2.0.0\n"));
        assert!(!go_mod.contains("example.com/mod v1.2.0"));

        let api = fs::read_to_string(root.join("pkg/api/api.go")).unwrap();
        assert!(api.contains("m \"example.com/mod/v2/server\""));
    }

    #[test]
    fn test_invalid_version_leaves_manifest() {
        let temp_dir = create_test_module();
        let root = temp_dir.path();

        gomodup(root)
            .arg("update-dependency-file")
            .write_stdin(r#"{"dependencies":[{"name":"example.com/mod","version":"latest"}]}"#)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("\"error\""));

        assert_eq!(fs::read_to_string(root.join("go.mod")).unwrap(), GO_MOD);
    }

    #[test]
    fn test_invalid_payload() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .arg("update-dependency-file")
            .write_stdin("{not json")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("invalid request payload"));
    }
}

mod get_updated_version {
    use super::*;

    #[test]
    fn test_missing_dependency() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .arg("get-updated-version")
            .write_stdin(r#"{"dependency":null}"#)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("invalid argument"));
    }

    #[test]
    fn test_pseudo_version_returned_unchanged() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .arg("get-updated-version")
            .write_stdin(
                r#"{"dependency":{"name":"example.com/mod","version":"v0.0.0-20230101120000-abcdefabcdef"}}"#,
            )
            .assert()
            .success()
            .stdout("{\"result\":\"v0.0.0-20230101120000-abcdefabcdef\"}\n");
    }

    #[test]
    fn test_goproxy_off() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .args(["get-updated-version", "--goproxy", "off"])
            .write_stdin(r#"{"dependency":{"name":"example.com/mod","version":"v1.2.0"}}"#)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("no usable module proxy"));
    }
}

mod run_requests {
    use super::*;

    #[test]
    fn test_run_dispatches_function() {
        let temp_dir = create_test_module();

        let output = gomodup(temp_dir.path())
            .arg("run")
            .write_stdin(r#"{"function":"editJson","args":{}}"#)
            .output()
            .unwrap();
        assert!(output.status.success());
        assert_eq!(
            parse_output(&output.stdout)["result"]["Module"]["Path"],
            "example.com/app"
        );
    }

    #[test]
    fn test_run_update_dependency_file() {
        let temp_dir = create_test_module();
        let root = temp_dir.path();

        gomodup(root)
            .arg("run")
            .write_stdin(
                r#"{"function":"updateDependencyFile","args":{"dependencies":[{"name":"golang.org/x/text","version":"v0.15.0","indirect":true}]}}"#,
            )
            .assert()
            .success();

        let go_mod = fs::read_to_string(root.join("go.mod")).unwrap();
        assert!(go_mod.contains("\tgolang.org/x/text v0.15.0 // indirect\n"));
    }

    #[test]
    fn test_run_unknown_function() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .arg("run")
            .write_stdin(r#"{"function":"getVcsRemoteForImport","args":{}}"#)
            .assert()
            .code(1)
            .stdout(predicate::str::contains("unknown function"));
    }
}

mod exit_codes {
    use super::*;

    #[test]
    fn test_exit_code_help() {
        Command::cargo_bin("gomodup")
            .unwrap()
            .arg("--help")
            .assert()
            .success()
            .stdout(predicate::str::contains("update-dependency-file"));
    }

    #[test]
    fn test_exit_code_version() {
        Command::cargo_bin("gomodup")
            .unwrap()
            .arg("--version")
            .assert()
            .success()
            .stdout(predicate::str::contains("gomodup"));
    }

    #[test]
    fn test_nonexistent_dir() {
        let temp_dir = TempDir::new().unwrap();

        gomodup(&temp_dir.path().join("missing"))
            .arg("edit-json")
            .assert()
            .code(1)
            .stdout(predicate::str::contains("not a directory"));
    }

    #[test]
    fn test_verbose_logs_to_stderr() {
        let temp_dir = create_test_module();

        gomodup(temp_dir.path())
            .args(["edit-json", "--verbose"])
            .assert()
            .success()
            .stdout(predicate::str::starts_with("{\"result\""))
            .stderr(predicate::str::contains("gomodup v"));
    }
}
