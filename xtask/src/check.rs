use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo, finished, OnFailure};

/// Bare-metal target the driver is checked against.
const EMBEDDED_TARGET: &str = "thumbv7em-none-eabihf";

pub fn run() -> Result<()> {
    println!();
    println!("{}", "🔍 Checking driver builds...".cyan().bold());
    println!();

    let start = Instant::now();

    cargo(
        "Checking driver on host (std + tracing)",
        &["check", "-p", "ads114s0x", "--features", "std", "--all-targets"],
        OnFailure::Abort,
    )?;
    cargo(
        "Checking driver on Cortex-M (no_std + defmt)",
        &["check", "-p", "ads114s0x", "--target", EMBEDDED_TARGET, "--features", "defmt"],
        OnFailure::Abort,
    )?;
    cargo(
        "Checking platform crate (no_std)",
        &["check", "-p", "platform", "--target", EMBEDDED_TARGET, "--no-default-features"],
        OnFailure::Abort,
    )?;
    cargo(
        "Running clippy lints",
        &["clippy", "--workspace", "--all-targets", "--", "-D", "warnings"],
        OnFailure::Warn,
    )?;
    if cargo("Checking code formatting", &["fmt", "--all", "--check"], OnFailure::Warn)?.is_none() {
        eprintln!("     Run 'cargo fmt --all' to fix");
    }

    finished("All checks", start);
    Ok(())
}
