//! Console formatting helpers
//!
//! Stateless wrappers around `colored` for messages printed outside the
//! menus.

use colored::Colorize;
use std::io::{self, Write};

const BANNER_WIDTH: usize = 53;

/// Print the startup banner
pub fn banner() {
    let version = format!("v{}", env!("CARGO_PKG_VERSION"));
    println!("\n{}", "~".repeat(BANNER_WIDTH).bold());
    println!("{}", "  CANISTER HELPER".bold());
    println!(
        "{}",
        "  pick a test script, pick a canister, watch it deploy".dimmed()
    );
    println!(
        "{}{}\n",
        "~".repeat(BANNER_WIDTH.saturating_sub(version.len())).bold(),
        version.bold()
    );
}

/// Write a warning in upper case, the way missing project files are reported
pub fn warning<W: Write + ?Sized>(out: &mut W, message: &str) -> io::Result<()> {
    writeln!(out, "\n{}", format!("WARNING: {}", message.to_uppercase()).bold())
}

/// Name of a project file or directory as shown in warnings
pub fn display_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
