//! End-to-end tests for the canister helper binary
//!
//! Each test builds a scratch dfx project with:
//! 1. a `dfx.json` manifest and init argument templates
//! 2. shell test scripts (run with `sh`)
//! 3. a fake `dfx` that records its arguments and fails on request
//!
//! and then drives the binary through piped stdin or the `deploy` subcommand.

#![cfg(unix)]

use std::fs;
use std::io::Write;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};

const MANIFEST: &str = r#"{
  "version": 1,
  "canisters": {
    "ledger": { "type": "custom", "candid": "ledger.did", "wasm": "ledger.wasm" },
    "backend": { "type": "motoko", "main": "src/backend/main.mo" }
  }
}"#;

const FAKE_DFX: &str = r#"#!/bin/sh
echo "$*" >> "$(dirname "$0")/calls.log"
if [ "$1" = "identity" ]; then
  echo "2vxsx-fae"
  exit 0
fi
step="$2"
if [ "$1" = "build" ]; then
  step="build"
fi
if [ -n "$FAIL_STEP" ] && [ "$step" = "$FAIL_STEP" ]; then
  echo "fake dfx: $step failed" >&2
  exit 1
fi
echo "fake dfx: $*"
"#;

/// Scratch project with paths and cleanup
struct TestContext {
    _temp: tempfile::TempDir,
    root: PathBuf,
}

impl TestContext {
    fn new() -> Self {
        let temp = tempfile::tempdir().expect("Failed to create temp dir");
        // The binary sees the canonical working directory
        let root = temp.path().canonicalize().expect("Failed to resolve temp dir");

        fs::write(root.join("dfx.json"), MANIFEST).expect("Failed to write manifest");
        fs::create_dir_all(root.join("tests")).expect("Failed to create tests dir");
        fs::create_dir_all(root.join("args_templates")).expect("Failed to create templates dir");
        fs::create_dir_all(root.join("bin")).expect("Failed to create bin dir");

        fs::write(
            root.join("canister-helper.toml"),
            r#"
[scripts]
extension = "sh"
interpreter = "sh"

[dfx]
path = "./bin/dfx"

[templates.values]
fee = "10_000"
"#,
        )
        .expect("Failed to write config");

        let dfx = root.join("bin").join("dfx");
        fs::write(&dfx, FAKE_DFX).expect("Failed to write fake dfx");
        fs::set_permissions(&dfx, fs::Permissions::from_mode(0o755))
            .expect("Failed to make fake dfx executable");

        Self { _temp: temp, root }
    }

    fn write_script(&self, name: &str, body: &str) {
        fs::write(self.root.join("tests").join(name), body).expect("Failed to write script");
    }

    fn write_template(&self, canister: &str, body: &str) {
        fs::write(
            self.root
                .join("args_templates")
                .join(format!("{}.template", canister)),
            body,
        )
        .expect("Failed to write template");
    }

    fn helper(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_canister-helper"));
        cmd.current_dir(&self.root)
            .env("HELPER_BIN", env!("CARGO_BIN_EXE_canister-helper"))
            .env("NO_COLOR", "1")
            .env_remove("FAIL_STEP")
            .env_remove("RUST_LOG");
        cmd
    }

    /// Run the interactive session with the given menu answers
    fn run_session(&self, answers: &str) -> Output {
        let mut child = self
            .helper()
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("Failed to start canister-helper");
        child
            .stdin
            .take()
            .unwrap()
            .write_all(answers.as_bytes())
            .expect("Failed to write answers");
        child.wait_with_output().expect("Failed to wait for session")
    }

    /// Run the deploy subcommand for a payload
    fn run_deploy(&self, payload: &str, fail_step: Option<&str>, extra: &[&str]) -> Output {
        let mut cmd = self.helper();
        cmd.arg("deploy").arg(payload).args(extra);
        if let Some(step) = fail_step {
            cmd.env("FAIL_STEP", step);
        }
        cmd.output().expect("Failed to run deploy")
    }

    fn payload(&self, selected: &str) -> String {
        let ledger_template = self.root.join("args_templates").join("ledger.template");
        let template = if ledger_template.exists() {
            format!("\"{}\"", ledger_template.display())
        } else {
            "null".to_string()
        };
        format!(
            r#"{{"canisters": {{"ledger": {{"type": "custom", "template_path": {}}}, "backend": {{"type": "motoko", "template_path": null}}}}, "selected_canister": "{}"}}"#,
            template, selected
        )
    }

    fn dfx_calls(&self) -> Vec<String> {
        fs::read_to_string(self.root.join("bin").join("calls.log"))
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn logs(&self) -> Vec<PathBuf> {
        let mut logs: Vec<PathBuf> = fs::read_dir(self.root.join("logs"))
            .map(|entries| entries.filter_map(|e| e.ok()).map(|e| e.path()).collect())
            .unwrap_or_default();
        logs.sort();
        logs
    }
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).into_owned()
}

fn read(path: &Path) -> String {
    fs::read_to_string(path).unwrap_or_else(|e| panic!("Failed to read {}: {}", path.display(), e))
}

#[test]
fn test_exit_immediately() {
    let ctx = TestContext::new();
    let output = ctx.run_session("0\n");

    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("TEST SCRIPTS"));
    assert!(out.contains("ERROR: NO TEST SCRIPTS AVAILABLE."));
    assert!(out.contains("Exiting..."));
}

#[test]
fn test_malformed_config_falls_back_to_defaults() {
    let ctx = TestContext::new();
    fs::write(ctx.root.join("canister-helper.toml"), "[paths\n").unwrap();

    let output = ctx.run_session("0\n");
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("WARNING: INVALID CONFIGURATION FILE"));
    assert!(out.contains("USING DEFAULT SETTINGS."));
    assert!(out.contains("TEST SCRIPTS"));
    assert!(out.contains("Exiting..."));
}

#[test]
fn test_script_receives_payload_and_output_is_logged() {
    let ctx = TestContext::new();
    ctx.write_template("ledger", "(record { owner = principal \"{principal}\" })");
    ctx.write_script(
        "echo_payload.sh",
        "echo \"payload: $1\"\necho \"warning from script\" >&2\n",
    );

    let output = ctx.run_session("1\n2\n0\n");
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("1. echo_payload.sh"));
    assert!(out.contains("Running echo_payload.sh..."));
    assert!(out.contains("Execution of echo_payload.sh logged to"));
    assert!(out.contains("NO TEMPLATE FILE FOUND"));

    let logs = ctx.logs();
    assert_eq!(logs.len(), 1);
    let name = logs[0].file_name().unwrap().to_string_lossy().into_owned();
    assert_eq!(name.len(), "YYYYMMDD_HHMMSS.log".len());
    assert!(name.ends_with(".log"));

    let log = read(&logs[0]);
    assert!(log.starts_with("Execution Log for echo_payload.sh\n"));
    assert!(log.contains("warning from script"));

    let payload_line = log
        .lines()
        .find_map(|l| l.strip_prefix("payload: "))
        .expect("payload line missing from log");
    let payload: serde_json::Value = serde_json::from_str(payload_line).unwrap();
    assert_eq!(payload["selected_canister"], "backend");
    assert_eq!(payload["canisters"]["backend"]["template_path"], serde_json::Value::Null);
    assert!(payload["canisters"]["ledger"]["template_path"]
        .as_str()
        .unwrap()
        .ends_with("args_templates/ledger.template"));
    assert_eq!(payload["canisters"]["ledger"]["wasm"], "ledger.wasm");
}

#[test]
fn test_missing_manifest_only_offers_abort() {
    let ctx = TestContext::new();
    fs::remove_file(ctx.root.join("dfx.json")).unwrap();
    ctx.write_script("noop.sh", "exit 0\n");

    let output = ctx.run_session("1\n1\n0\n0\n");
    assert!(output.status.success());

    let out = stdout(&output);
    assert!(out.contains("'DFX.JSON' FILE NOT FOUND"));
    assert!(out.contains("ERROR: NO CANISTERS FOUND IN DFX.JSON."));
    assert!(out.contains("Invalid choice. Try again."));
    assert!(out.contains("Returning to main menu..."));
    assert!(ctx.logs().is_empty());
}

#[test]
fn test_deploy_renders_template_and_installs() {
    let ctx = TestContext::new();
    ctx.write_template(
        "ledger",
        "(record { minting_account = principal \"{principal}\"; fee = {fee}; name = \"{canister_name}\" })",
    );

    let output = ctx.run_deploy(&ctx.payload("ledger"), None, &[]);
    assert!(output.status.success(), "deploy failed: {}", stdout(&output));

    let rendered = ctx.root.join("args").join("ledger.candid");
    assert_eq!(
        read(&rendered),
        "(record { minting_account = principal \"2vxsx-fae\"; fee = 10_000; name = \"ledger\" })"
    );
    assert_eq!(
        ctx.dfx_calls(),
        vec![
            "identity get-principal".to_string(),
            "canister create ledger".to_string(),
            "build ledger".to_string(),
            format!("canister install ledger --argument-file {}", rendered.display()),
        ]
    );
    assert!(stdout(&output).contains("1 test, 1 passed, 0 failed"));
}

#[test]
fn test_deploy_build_failure_rolls_back() {
    let ctx = TestContext::new();

    let output = ctx.run_deploy(&ctx.payload("backend"), Some("build"), &[]);
    assert_eq!(output.status.code(), Some(1));

    assert_eq!(
        ctx.dfx_calls(),
        vec![
            "canister create backend",
            "build backend",
            "canister stop backend",
            "canister delete backend",
        ]
    );
    assert!(stdout(&output).contains("1 test, 0 passed, 1 failed"));
}

#[test]
fn test_deploy_require_args_blocks_missing_template() {
    let ctx = TestContext::new();

    let output = ctx.run_deploy(&ctx.payload("backend"), None, &["--require-args"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(ctx.dfx_calls().is_empty());
}

#[test]
fn test_deploy_rejects_invalid_payload() {
    let ctx = TestContext::new();

    let output = ctx.run_deploy("{not json", None, &[]);
    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Invalid canister payload"));
}

#[test]
fn test_session_runs_builtin_deploy_script() {
    let ctx = TestContext::new();
    ctx.write_template("ledger", "(principal \"{principal}\")");
    ctx.write_script("deploy.sh", "\"$HELPER_BIN\" deploy \"$1\"\n");

    let output = ctx.run_session("1\n1\n0\n");
    assert!(output.status.success());

    let logs = ctx.logs();
    assert_eq!(logs.len(), 1);
    let log = read(&logs[0]);
    assert!(log.contains("Test #1:"));
    assert!(log.contains("1 test, 1 passed, 0 failed"));
    assert_eq!(read(&ctx.root.join("args").join("ledger.candid")), "(principal \"2vxsx-fae\")");
}
