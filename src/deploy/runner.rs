//! Canister deployment sequence
//!
//! create → build → install, strictly in that order. The first failing step
//! ends the sequence and triggers a best-effort stop + delete rollback.

use colored::Colorize;
use std::fmt;
use std::path::Path;

use crate::common::Result;

/// A single platform CLI invocation against one canister
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CanisterCommand<'a> {
    Create,
    Build,
    Install { argument_file: Option<&'a Path> },
    Stop,
    Delete,
}

impl CanisterCommand<'_> {
    pub fn name(&self) -> &'static str {
        match self {
            CanisterCommand::Create => "create",
            CanisterCommand::Build => "build",
            CanisterCommand::Install { .. } => "install",
            CanisterCommand::Stop => "stop",
            CanisterCommand::Delete => "delete",
        }
    }
}

/// The platform CLI as seen by the deployment sequence
pub trait CanisterCli {
    /// Run one command; `Err` means it could not start or exited non-zero
    fn run(&mut self, canister: &str, command: CanisterCommand<'_>) -> Result<()>;

    /// Principal of the current identity
    fn principal(&mut self) -> Result<String>;
}

/// Where a deployment stands
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeployState {
    Pending,
    Created,
    Built,
    Installed,
    Done,
    /// Failed while running the named step
    Failed(&'static str),
}

impl fmt::Display for DeployState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeployState::Pending => write!(f, "pending"),
            DeployState::Created => write!(f, "created"),
            DeployState::Built => write!(f, "built"),
            DeployState::Installed => write!(f, "installed"),
            DeployState::Done => write!(f, "done"),
            DeployState::Failed(step) => write!(f, "failed at {}", step),
        }
    }
}

/// Result of deploying one canister
#[derive(Debug, Clone)]
pub struct DeployOutcome {
    pub canister: String,
    pub state: DeployState,
    pub error: Option<String>,
}

impl DeployOutcome {
    pub fn succeeded(&self) -> bool {
        self.state == DeployState::Done
    }
}

impl fmt::Display for DeployOutcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.canister, self.state)?;
        if let Some(error) = &self.error {
            write!(f, ": {}", error)?;
        }
        Ok(())
    }
}

/// Deploy a canister, rolling back on the first failed step
///
/// `argument_file` is passed to install when a template was rendered.
pub fn deploy<C: CanisterCli + ?Sized>(
    cli: &mut C,
    canister: &str,
    argument_file: Option<&Path>,
) -> DeployOutcome {
    let mut state = DeployState::Pending;

    loop {
        let (command, next) = match state {
            DeployState::Pending => (CanisterCommand::Create, DeployState::Created),
            DeployState::Created => (CanisterCommand::Build, DeployState::Built),
            DeployState::Built => (
                CanisterCommand::Install { argument_file },
                DeployState::Installed,
            ),
            DeployState::Installed => {
                state = DeployState::Done;
                break;
            }
            DeployState::Done | DeployState::Failed(_) => break,
        };

        if let CanisterCommand::Install {
            argument_file: Some(file),
        } = command
        {
            println!("  {} {}", "Init arguments:".dimmed(), file.display());
        }

        match cli.run(canister, command) {
            Ok(()) => {
                println!("  {} {} {}", "✓".green(), command.name(), canister.dimmed());
                state = next;
            }
            Err(e) => {
                println!("  {} {} {}: {}", "✗".red(), command.name(), canister, e);
                tracing::warn!(canister, step = command.name(), error = %e, "deployment step failed");
                rollback(cli, canister);
                return DeployOutcome {
                    canister: canister.to_string(),
                    state: DeployState::Failed(command.name()),
                    error: Some(e.to_string()),
                };
            }
        }
    }

    DeployOutcome {
        canister: canister.to_string(),
        state,
        error: None,
    }
}

/// Stop then delete, reporting but otherwise ignoring failures
fn rollback<C: CanisterCli + ?Sized>(cli: &mut C, canister: &str) {
    println!("  {} {}", "Rolling back".yellow(), canister);
    for command in [CanisterCommand::Stop, CanisterCommand::Delete] {
        match cli.run(canister, command) {
            Ok(()) => println!("  {} {} {}", "✓".green(), command.name(), canister.dimmed()),
            Err(e) => {
                println!("  {} rollback {} {}: {}", "!".yellow(), command.name(), canister, e);
                tracing::warn!(canister, step = command.name(), error = %e, "rollback step failed");
            }
        }
    }
}
