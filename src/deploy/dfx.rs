//! `dfx` command invocation

use std::path::PathBuf;
use std::process::{Command, Stdio};

use super::runner::{CanisterCli, CanisterCommand};
use crate::common::{Error, Result, Settings};

/// Runs `dfx` in the project root, output inherited from this process
#[derive(Debug, Clone)]
pub struct Dfx {
    program: PathBuf,
    project_root: PathBuf,
    network: Option<String>,
}

impl Dfx {
    pub fn new(program: PathBuf, project_root: PathBuf, network: Option<String>) -> Self {
        Self {
            program,
            project_root,
            network,
        }
    }

    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(
            settings.dfx.clone(),
            settings.root.clone(),
            settings.network.clone(),
        )
    }

    /// Command line arguments for a canister command
    pub fn args(&self, canister: &str, command: CanisterCommand<'_>) -> Vec<String> {
        let mut args: Vec<String> = match command {
            CanisterCommand::Build => vec!["build".into(), canister.into()],
            CanisterCommand::Create
            | CanisterCommand::Install { .. }
            | CanisterCommand::Stop
            | CanisterCommand::Delete => {
                vec!["canister".into(), command.name().into(), canister.into()]
            }
        };

        if let CanisterCommand::Install {
            argument_file: Some(file),
        } = command
        {
            args.push("--argument-file".into());
            args.push(file.display().to_string());
        }

        if let Some(network) = &self.network {
            args.push("--network".into());
            args.push(network.clone());
        }

        args
    }

    fn command(&self) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.current_dir(&self.project_root).stdin(Stdio::null());
        cmd
    }

    fn command_line(&self, args: &[String]) -> String {
        let mut line = self
            .program
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.program.display().to_string());
        for arg in args {
            line.push(' ');
            line.push_str(arg);
        }
        line
    }
}

impl CanisterCli for Dfx {
    fn run(&mut self, canister: &str, command: CanisterCommand<'_>) -> Result<()> {
        let args = self.args(canister, command);
        let line = self.command_line(&args);
        tracing::info!(command = %line, "running");

        let status = self
            .command()
            .args(&args)
            .status()
            .map_err(|e| Error::spawn(&self.program, &e))?;

        tracing::debug!(command = %line, %status, "finished");
        if status.success() {
            Ok(())
        } else {
            Err(Error::command_failed(&line, &status.to_string()))
        }
    }

    fn principal(&mut self) -> Result<String> {
        let output = self
            .command()
            .args(["identity", "get-principal"])
            .stderr(Stdio::piped())
            .output()
            .map_err(|e| Error::spawn(&self.program, &e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(Error::Identity(format!(
                "{} ({})",
                stderr.trim(),
                output.status
            )));
        }

        let principal = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if principal.is_empty() {
            return Err(Error::Identity("dfx printed an empty principal".to_string()));
        }
        Ok(principal)
    }
}
