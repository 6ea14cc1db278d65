//! Integration test suite for the `hassert` CLI
use assert_cmd::Command;

/// Helper function to run the `hassert` binary with the given arguments and
/// return a [`assert_cmd::assert::Assert`].
fn run_main(args: &[&str]) -> assert_cmd::assert::Assert {
    let mut cmd =
        Command::cargo_bin("hassert").expect("Failed to find main binary");
    cmd.env("NO_COLOR", "1");
    cmd.args(args);
    cmd.assert()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn stdout_of(assert: &assert_cmd::assert::Assert) -> String {
        String::from_utf8(assert.get_output().stdout.clone())
            .expect("Invalid UTF-8 output")
    }

    #[test]
    fn passing_checks() {
        let assert = run_main(&[
            "check",
            "tests/data/body.json",
            "--has",
            "object.str",
            "--where",
            "int=123",
            "--where",
            "float=1.5",
            "--where",
            "bool=false",
            "--where",
            "arr.0.str=array",
            "--where-not",
            "object.str=Hello Worlds",
            "--where-type",
            "nums=array-int",
            "--length",
            "nums=3",
            "--gte",
            "int=100",
            "--lt",
            "float=2.0",
        ])
        .success()
        .code(0);
        assert!(stdout_of(&assert).starts_with("PASS 10 checks passed"));
    }

    #[test]
    fn failing_check_reports_first_failure() {
        let assert = run_main(&[
            "check",
            "tests/data/body.json",
            "--where",
            "str=Goodbye",
            "--has",
            "missing",
        ])
        .failure()
        .code(1);
        assert_eq!(stdout_of(&assert).trim(), "FAIL has missing");
    }

    #[test]
    fn string_literal_does_not_match_number() {
        run_main(&["check", "tests/data/body.json", "--where", r#"int="123""#])
            .failure()
            .code(1);
    }

    #[test]
    fn scalar_body_is_malformed_input() {
        let assert = run_main(&[
            "check",
            "tests/data/scalar.json",
            "--has",
            "a",
        ])
        .failure()
        .code(2);
        assert!(stdout_of(&assert).contains("ERROR body must be a JSON object"));
    }

    #[test]
    fn body_from_stdin() {
        let mut cmd =
            Command::cargo_bin("hassert").expect("Failed to find main binary");
        cmd.env("NO_COLOR", "1")
            .args(["check", "--gte", "int=1"])
            .write_stdin(r#"{"int": 2}"#)
            .assert()
            .success();
    }

    #[test]
    fn unreadable_stdin_body() {
        let mut cmd =
            Command::cargo_bin("hassert").expect("Failed to find main binary");
        cmd.args(["check", "--has", "a"])
            .write_stdin("<html></html>")
            .assert()
            .failure()
            .code(2);
    }

    #[test]
    fn invalid_type_name() {
        run_main(&["check", "tests/data/body.json", "--where-type", "int=integer"])
            .failure();
    }

    #[test]
    fn nonexistent_file() {
        run_main(&["check", "does/not/exist.json"]).failure().code(2);
    }

    #[test]
    fn resolve_nested_value() {
        let assert = run_main(&["resolve", "arr.0", "tests/data/body.json"])
            .success()
            .code(0);
        let output_str = stdout_of(&assert);

        let mut lines = output_str.lines();
        let path_line = lines.next().expect("expected path header line");
        assert_eq!(path_line, "arr.0:");

        let value_str: String = lines.collect::<Vec<_>>().join("\n");
        let output_json: Value = serde_json::from_str(value_str.trim())
            .expect("Failed to parse output JSON");
        assert_eq!(output_json, serde_json::json!({"str": "array"}));
    }

    #[test]
    fn resolve_missing_path_prints_nothing() {
        let assert = run_main(&["resolve", "does.not.exist", "tests/data/body.json"])
            .failure()
            .code(1);
        assert!(stdout_of(&assert).trim().is_empty());
    }

    #[test]
    fn resolve_has_no_depth_flag() {
        run_main(&["resolve", "int", "tests/data/body.json", "--depth"])
            .failure()
            .code(2);
    }

    #[test]
    fn generate_man_pages() {
        let dir = tempfile::tempdir().expect("tempdir");
        let out = dir.path().to_str().expect("utf-8 path");
        run_main(&["generate", "man", "--output-dir", out]).success();
        assert!(dir.path().join("hassert.1").exists());
        assert!(dir.path().join("hassert-check.1").exists());
        assert!(dir.path().join("hassert-generate-shell.1").exists());
    }
}
