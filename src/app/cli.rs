use clap::Parser;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    author,
    version,
    about = "Scan a directory tree and save a detailed structure report"
)]
pub struct Cli {
    /// Directory to scan
    #[arg(long, default_value = ".")]
    pub path: PathBuf,

    /// File to write the report to
    #[arg(long, default_value = "folder_structure_detailed.txt")]
    pub output: PathBuf,

    /// Directory names to skip, including everything below them
    #[arg(long, num_args = 0..)]
    pub exclude_dirs: Option<Vec<String>>,

    /// File name suffixes to skip (e.g. '.pyc')
    #[arg(long, num_args = 0..)]
    pub exclude_files: Option<Vec<String>>,

    /// Use a named preset from presets.toml
    #[arg(long)]
    pub preset: Option<String>,

    /// Read presets from this file instead of ~/.config/folder_report/presets.toml
    #[arg(long)]
    pub presets_file: Option<PathBuf>,
}
