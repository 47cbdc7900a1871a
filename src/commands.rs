//! CLI command definitions
//!
//! Without a subcommand the binary starts the interactive session.

use clap::Subcommand;

#[derive(Subcommand)]
pub enum Commands {
    /// Deploy the canister(s) described by a test payload (used by test scripts)
    #[command(hide = true)]
    Deploy {
        /// JSON payload: {"canisters": {...}, "selected_canister": "<name>"}
        payload: String,

        /// Deploy every canister in the payload instead of only the selected one
        #[arg(long)]
        all: bool,

        /// Fail canisters that have no init argument template
        #[arg(long)]
        require_args: bool,
    },
}
