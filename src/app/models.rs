use chrono::{DateTime, Local};
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;
use std::time::Duration;

/// Fully resolved scan settings. Not modified once the scan starts.
#[derive(Debug, Clone)]
pub struct ScanConfig {
    pub root: PathBuf,
    pub output: PathBuf,
    /// Directory basenames skipped together with their whole subtree.
    pub exclude_dirs: Vec<String>,
    /// Literal, case-sensitive file name suffixes.
    pub exclude_files: Vec<String>,
    /// Lower-cased, dot-prefixed extensions eligible for content embedding.
    pub text_extensions: Vec<String>,
    /// Files must be strictly smaller than this to have content embedded.
    pub max_content_size: u64,
}

/// One directory as the walker sees it on entry.
#[derive(Debug)]
pub struct DirectoryVisit {
    pub path: PathBuf,
    pub depth: usize,
    /// Immediate child files, sorted by name, excluded suffixes removed.
    pub files: Vec<(OsString, FileOutcome)>,
    /// Sum of the sizes of `files` that could be stat'd. Not recursive.
    pub size: u64,
    /// Problems listing the directory itself.
    pub errors: Vec<String>,
}

/// Metadata gathered for a single file.
#[derive(Debug, Clone)]
pub struct FileEntry {
    pub path: PathBuf,
    pub size: u64,
    pub modified: DateTime<Local>,
    /// `None` when the platform cannot report birth time.
    pub created: Option<DateTime<Local>>,
    /// Lower-cased with a leading dot, empty when the name has none.
    pub extension: String,
}

/// Result of stat'ing a listed file.
#[derive(Debug)]
pub enum FileOutcome {
    Found(FileEntry),
    Failed(io::Error),
}

/// Running totals for one scan.
#[derive(Debug, Clone)]
pub struct ScanStats {
    pub directories: u64,
    pub files: u64,
    pub total_size: u64,
    pub started_at: DateTime<Local>,
    pub finished_at: Option<DateTime<Local>>,
    pub elapsed: Duration,
}

impl ScanStats {
    pub fn new(started_at: DateTime<Local>) -> Self {
        Self {
            directories: 0,
            files: 0,
            total_size: 0,
            started_at,
            finished_at: None,
            elapsed: Duration::ZERO,
        }
    }
}
