use anyhow::Result;
use colored::Colorize;
use std::time::Instant;

use crate::step::{cargo, finished, OnFailure};

pub fn run(open: bool) -> Result<()> {
    println!();
    println!("{}", "📚 Building documentation...".cyan().bold());
    println!();

    let start = Instant::now();

    let mut args = vec!["doc", "--workspace", "--no-deps", "--features", "ads114s0x/std"];
    if open {
        args.push("--open");
    }
    cargo("Documentation build", &args, OnFailure::Abort)?;

    if !open {
        println!(
            "   {}",
            "Open target/doc/ads114s0x/index.html in your browser".dimmed()
        );
        println!("   {}", "Or run 'cargo run -p xtask -- doc --open'".dimmed());
        println!();
    }

    finished("Documentation", start);
    Ok(())
}
