// Declare modules
pub mod cli;
pub mod config;
pub mod encoding;
pub mod formatter;
pub mod models;
pub mod scanner;
pub mod size;

use anyhow::Result;
use clap::Parser;

use self::cli::Cli;
use self::config::resolve_config;
use self::scanner::Scanner;

/// Parses arguments, resolves configuration and writes the report.
pub fn run() -> Result<()> {
    // 1. Parse Args
    let args = Cli::parse();

    // 2. Resolve Configuration (presets + CLI)
    let config = resolve_config(args)?;

    // 3. Validate root before touching the output file
    let scanner = Scanner::new(&config)?;

    // 4. Scan and stream the report
    let stats = scanner.scan_to_file(&config.output)?;
    log::info!(
        "Wrote {} directories and {} files to {}",
        stats.directories,
        stats.files,
        config.output.display()
    );

    println!("Folder structure saved to {}", config.output.display());

    Ok(())
}
