//! Test script invocation
//!
//! A test script receives the whole canister set plus the selected canister
//! as one JSON argument. Its exit code and output are passed through to the
//! console and the execution log without interpretation.

mod counters;
mod execution;
mod payload;

pub use counters::RunCounters;
pub use execution::{log_file_path, run_logged, ExecutionReport};
pub use payload::TestPayload;

use std::process::Command;

use crate::common::{Result, Settings};

/// Build the command that runs `script` with `payload` as its argument
pub fn script_command(settings: &Settings, script: &str, payload: &str) -> Command {
    let script_path = settings.scripts_dir.join(script);
    let mut cmd = match &settings.interpreter {
        Some(interpreter) => {
            let mut cmd = Command::new(interpreter);
            cmd.arg(&script_path);
            cmd
        }
        None => Command::new(&script_path),
    };
    cmd.arg(payload).current_dir(&settings.root);
    cmd
}

/// Run a test script for the selected canister and log its output
pub fn run_script(settings: &Settings, script: &str, payload: &TestPayload) -> Result<ExecutionReport> {
    let json = payload.to_json()?;
    let mut cmd = script_command(settings, script, &json);
    tracing::info!(
        script,
        canister = %payload.selected_canister,
        "running test script"
    );
    run_logged(script, &mut cmd, &settings.logs_dir)
}
