//! Canister helper - interactive test script runner for dfx projects

use clap::Parser;
use colored::Colorize;
use canister_helper::commands::Commands;
use canister_helper::deploy::{self, DeployOptions, Dfx};
use canister_helper::{cli, common, Settings, TestPayload};

#[derive(Parser)]
#[command(name = "canister-helper", about = "Run test scripts against dfx canisters")]
#[command(version, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

fn main() {
    common::logging::init_cli();

    let cli = Cli::parse();

    let result = std::env::current_dir()
        .map_err(common::Error::from)
        .and_then(|root| {
            Settings::load_or_default(&root, &mut std::io::stdout()).map_err(common::Error::from)
        })
        .and_then(|settings| match cli.command {
            None => cli::run(settings).map(|()| true),
            Some(Commands::Deploy {
                payload,
                all,
                require_args,
            }) => run_deploy(&settings, &payload, DeployOptions { all, require_args }),
        });

    match result {
        Ok(true) => {}
        Ok(false) => std::process::exit(1),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}

/// Returns whether every deployment passed
fn run_deploy(settings: &Settings, payload: &str, options: DeployOptions) -> common::Result<bool> {
    let payload = TestPayload::parse(payload)?;
    let mut dfx = Dfx::from_settings(settings);
    let counters = deploy::run(settings, &mut dfx, &payload, &options)?;

    let summary = counters.summary();
    if counters.all_passed() {
        println!("\n{} {}", "✓".green().bold(), summary.green().bold());
    } else {
        println!("\n{} {}", "✗".red().bold(), summary.red().bold());
    }
    Ok(counters.all_passed())
}
