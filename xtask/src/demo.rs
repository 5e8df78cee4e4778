use anyhow::{Context, Result};
use colored::Colorize;
use std::process::Command;

/// Run the `simulated_capture` example with output streamed to the terminal.
pub fn run(log: &str) -> Result<()> {
    println!();
    println!("{}", "📈 Simulated streaming capture".cyan().bold());
    println!();

    let status = Command::new("cargo")
        .args([
            "run",
            "-p",
            "ads114s0x",
            "--example",
            "simulated_capture",
            "--features",
            "std",
        ])
        .env("RUST_LOG", log)
        .status()
        .context("Failed to run simulated_capture")?;

    if !status.success() {
        anyhow::bail!("simulated_capture exited with {status}");
    }
    Ok(())
}
