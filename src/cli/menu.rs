//! Numbered selection menus
//!
//! Menus are written to any `Write` and answers read from any `BufRead`, so
//! the loops can be driven from tests. `0` always cancels.

use colored::Colorize;
use std::io::{self, BufRead, Write};

use crate::project::Canisters;

const RULE_WIDTH: usize = 53;

/// Reads numbered choices, re-prompting until one is valid
pub struct Prompter<R, W> {
    input: R,
    output: W,
}

impl<R: BufRead, W: Write> Prompter<R, W> {
    pub fn new(input: R, output: W) -> Self {
        Self { input, output }
    }

    pub fn output(&self) -> &W {
        &self.output
    }

    pub fn output_mut(&mut self) -> &mut W {
        &mut self.output
    }

    /// Ask for a number in `0..=max`
    ///
    /// Returns `None` for `0` and at end of input, otherwise the 1-based
    /// choice. Anything else is reported and asked again.
    pub fn choose(&mut self, prompt: &str, max: usize) -> io::Result<Option<usize>> {
        let mut line = String::new();
        loop {
            write!(self.output, "{}", format!("{}: ", prompt).bold())?;
            self.output.flush()?;

            line.clear();
            if self.input.read_line(&mut line)? == 0 {
                writeln!(self.output)?;
                return Ok(None);
            }

            match line.trim().parse::<usize>() {
                Ok(0) => return Ok(None),
                Ok(choice) if choice <= max => return Ok(Some(choice)),
                Ok(_) => writeln!(self.output, "{}", "Invalid choice. Try again.".red())?,
                Err(_) => writeln!(self.output, "{}", "Please enter a valid number.".red())?,
            }
        }
    }
}

fn header<W: Write>(out: &mut W, title: &str) -> io::Result<()> {
    let fill = RULE_WIDTH.saturating_sub(title.len() + 1);
    writeln!(out, "{} {}\n", title.bold(), ">".repeat(fill).bold())
}

fn footer<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(out, "{}", "^".repeat(RULE_WIDTH).bold())
}

/// Show the test scripts and return the chosen file name
pub fn select_script<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    scripts: &[String],
) -> io::Result<Option<String>> {
    let out = prompter.output_mut();
    header(out, "TEST SCRIPTS")?;
    if scripts.is_empty() {
        writeln!(out, "{}", "ERROR: NO TEST SCRIPTS AVAILABLE.".bold())?;
    } else {
        for (idx, script) in scripts.iter().enumerate() {
            writeln!(out, "{}", format!("{}. {}", idx + 1, script).green())?;
        }
    }
    writeln!(out, "\n{}", "0. Exit".bold())?;
    footer(out)?;

    let choice = prompter.choose("Select a test script by number", scripts.len())?;
    Ok(choice.map(|n| scripts[n - 1].clone()))
}

/// Show the canisters and return the chosen name
///
/// With an `error` the list is replaced by the message and only abort is
/// accepted.
pub fn select_canister<R: BufRead, W: Write>(
    prompter: &mut Prompter<R, W>,
    canisters: &Canisters,
    error: Option<&str>,
) -> io::Result<Option<String>> {
    let out = prompter.output_mut();
    writeln!(out)?;
    header(out, "AVAILABLE CANISTERS")?;

    let selectable = match error {
        Some(message) => {
            writeln!(out, "{}\n", message.red().bold())?;
            0
        }
        None => {
            for (idx, canister) in canisters.iter().enumerate() {
                writeln!(out, "{}", format!("{}. {}", idx + 1, canister.name).green())?;
                writeln!(out, "{}", "   Info:".yellow().bold())?;
                for (key, value) in canister.info.attributes() {
                    writeln!(out, "      {} {}", format!("{}:", key).yellow().bold(), value)?;
                }
                let template = match &canister.info.template_path {
                    Some(path) => path.display().to_string(),
                    None => "NO TEMPLATE FILE FOUND".red().bold().to_string(),
                };
                writeln!(out, "{} {}\n", "   Template Path:".yellow().bold(), template)?;
            }
            canisters.len()
        }
    };

    writeln!(out, "{}", "0. Abort".bold())?;
    footer(out)?;

    let choice = prompter.choose("Select a canister by number", selectable)?;
    Ok(choice.and_then(|n| canisters.iter().nth(n - 1).map(|c| c.name.clone())))
}
