//! Canister helper - interactive test script runner for dfx projects
//!
//! Lists the test scripts of a project, lets the developer pick one of the
//! canisters declared in `dfx.json`, and runs the script against it with the
//! output logged to a timestamped file. The built-in `deploy` script renders
//! init argument templates and drives `dfx` through create, build and
//! install, rolling back on failure.

pub mod cli;
pub mod commands;
pub mod common;
pub mod console;
pub mod deploy;
pub mod project;
pub mod testing;

// Re-export commonly used types for tests
pub use common::{Error, Result, Settings};
pub use project::{Canister, CanisterInfo, Canisters};
pub use testing::TestPayload;
