//! Built-in deploy script
//!
//! `canister-helper deploy '<payload>'` is the canonical test script: it
//! renders the init argument template of each target canister, then runs the
//! create/build/install sequence with rollback on failure. Paths come from
//! the project settings, never from the script's working directory.

pub mod dfx;
pub mod runner;
pub mod template;

pub use dfx::Dfx;
pub use runner::{deploy, CanisterCli, CanisterCommand, DeployOutcome, DeployState};
pub use template::{substitute, TemplateRenderer};

use colored::Colorize;

use crate::common::{Error, Result, Settings};
use crate::testing::{RunCounters, TestPayload};

/// Options of the deploy subcommand
#[derive(Debug, Clone, Default)]
pub struct DeployOptions {
    /// Deploy every canister in the payload, not only the selected one
    pub all: bool,
    /// Fail canisters that have no init argument template
    pub require_args: bool,
}

/// Placeholder values for one canister, runtime values first
///
/// `owner_principal` is the name older helper templates use for the principal.
fn template_values(principal: &str, canister: &str, settings: &Settings) -> Vec<(String, String)> {
    let mut values = vec![
        ("principal".to_string(), principal.to_string()),
        ("owner_principal".to_string(), principal.to_string()),
        ("canister_name".to_string(), canister.to_string()),
    ];
    values.extend(settings.template_values.iter().cloned());
    values
}

/// Deploy the payload's target canisters and tally the results
///
/// A template that disappeared between discovery and rendering aborts the
/// whole run; a failed deployment step only fails that canister's test.
pub fn run<C: CanisterCli + ?Sized>(
    settings: &Settings,
    cli: &mut C,
    payload: &TestPayload,
    options: &DeployOptions,
) -> Result<RunCounters> {
    let selected = payload.selected()?;
    let targets: Vec<_> = if options.all {
        payload.canisters.iter().collect()
    } else {
        vec![selected]
    };

    let renderer = TemplateRenderer::from_settings(settings);
    let mut principal: Option<String> = None;
    let mut counters = RunCounters::new();

    for canister in targets {
        let id = counters.begin();
        println!(
            "\n{} {}",
            format!("Test #{}:", id).blue().bold(),
            format!("deploy {}", canister.name).white().bold()
        );

        let argument_file = match &canister.info.template_path {
            Some(template) => {
                if principal.is_none() {
                    let p = cli.principal()?;
                    println!("  {} {}", "Principal:".dimmed(), p);
                    principal = Some(p);
                }
                let values = template_values(
                    principal.as_deref().unwrap_or_default(),
                    &canister.name,
                    settings,
                );
                Some(renderer.render(template, &values)?)
            }
            None if options.require_args => {
                let err = Error::TemplateRequired(canister.name.clone());
                println!("  {} {}", "✗".red(), err);
                counters.record(false);
                continue;
            }
            None => None,
        };

        let outcome = deploy(cli, &canister.name, argument_file.as_deref());
        tracing::info!(
            canister = %outcome.canister,
            state = %outcome.state,
            "deployment finished"
        );
        if outcome.succeeded() {
            println!("  {} {}", "✓".green().bold(), "Deployed".green().bold());
        } else {
            println!(
                "  {} {} {}",
                "✗".red().bold(),
                "Deployment failed:".red().bold(),
                outcome
            );
        }
        counters.record(outcome.succeeded());
    }

    Ok(counters)
}
