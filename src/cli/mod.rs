//! Interactive session
//!
//! One loop iteration: pick a script, load the manifest afresh, pick a
//! canister, run the script. Everything short of a broken console is
//! reported and leads back to the script menu.

pub mod menu;

use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::common::{Result, Settings};
use crate::console;
use crate::project::{list_scripts, load_manifest, locate_templates, Canisters};
use crate::testing::{self, TestPayload};

pub use menu::Prompter;

/// What the session does after an iteration
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Exit,
}

/// The menu-driven loop
pub struct Session<R, W> {
    settings: Settings,
    prompter: Prompter<R, W>,
}

impl<R: BufRead, W: Write> Session<R, W> {
    pub fn new(settings: Settings, input: R, output: W) -> Self {
        Self {
            settings,
            prompter: Prompter::new(input, output),
        }
    }

    pub fn output(&self) -> &W {
        self.prompter.output()
    }

    /// Run until the user exits from the script menu
    pub fn run(&mut self) -> Result<()> {
        while self.step()? == Flow::Continue {}
        Ok(())
    }

    /// One pass through the menus
    pub fn step(&mut self) -> Result<Flow> {
        let scripts = match list_scripts(&self.settings.scripts_dir, &self.settings.script_extension) {
            Ok(scripts) => scripts,
            Err(e) => {
                tracing::debug!(
                    dir = %self.settings.scripts_dir.display(),
                    error = %e,
                    "cannot read scripts directory"
                );
                let dir_name = console::display_name(&self.settings.scripts_dir);
                self.warn(&format!("'{}' directory not found.", dir_name))?;
                Vec::new()
            }
        };
        let Some(script) = menu::select_script(&mut self.prompter, &scripts)? else {
            writeln!(self.prompter.output_mut(), "{}", "Exiting...".bold())?;
            return Ok(Flow::Exit);
        };

        let Some(canisters) = self.load_canisters()? else {
            self.back_to_menu()?;
            return Ok(Flow::Continue);
        };

        let Some(selected) = menu::select_canister(&mut self.prompter, &canisters, None)? else {
            self.back_to_menu()?;
            return Ok(Flow::Continue);
        };

        let payload = TestPayload::new(canisters, selected);
        match testing::run_script(&self.settings, &script, &payload) {
            Ok(report) => {
                tracing::info!(
                    script = %script,
                    status = %report.status,
                    log = %report.log_path.display(),
                    "test script finished"
                );
            }
            Err(e) => {
                tracing::error!(script = %script, error = %e, "test script could not run");
                writeln!(
                    self.prompter.output_mut(),
                    "\n{}",
                    format!("UNEXPECTED ERROR OCCURRED. DETAILS: {}", e).red().bold()
                )?;
            }
        }

        self.back_to_menu()?;
        Ok(Flow::Continue)
    }

    /// Load the manifest and attach templates
    ///
    /// Returns `None` once the user has aborted the error-only canister menu.
    fn load_canisters(&mut self) -> io::Result<Option<Canisters>> {
        let mut canisters = match load_manifest(&self.settings.manifest) {
            Ok(canisters) => canisters,
            Err(e) => {
                tracing::warn!(error = %e, "manifest unavailable");
                self.warn(&e.to_string())?;
                Canisters::default()
            }
        };

        if canisters.is_empty() {
            let manifest_name = self
                .settings
                .manifest
                .file_name()
                .map(|n| n.to_string_lossy().to_uppercase())
                .unwrap_or_default();
            let message = format!("ERROR: NO CANISTERS FOUND IN {}.", manifest_name);
            menu::select_canister(&mut self.prompter, &canisters, Some(&message))?;
            return Ok(None);
        }

        if !self.settings.templates_dir.is_dir() {
            let dir_name = console::display_name(&self.settings.templates_dir);
            self.warn(&format!("'{}' directory not found.", dir_name))?;
        }
        locate_templates(
            &mut canisters,
            &self.settings.templates_dir,
            &self.settings.template_extension,
        );
        Ok(Some(canisters))
    }

    fn warn(&mut self, message: &str) -> io::Result<()> {
        console::warning(self.prompter.output_mut(), message)
    }

    fn back_to_menu(&mut self) -> io::Result<()> {
        writeln!(
            self.prompter.output_mut(),
            "\n{}\n",
            "Returning to main menu...".yellow().bold()
        )
    }
}

/// Run the interactive session on the process console
pub fn run(settings: Settings) -> Result<()> {
    console::banner();
    let stdin = io::stdin();
    let mut session = Session::new(settings, stdin.lock(), io::stdout());
    session.run()
}
