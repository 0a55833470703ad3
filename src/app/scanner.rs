use crate::app::encoding::read_text;
use crate::app::formatter::ReportWriter;
use crate::app::models::{DirectoryVisit, FileEntry, FileOutcome, ScanConfig, ScanStats};
use anyhow::{bail, Context, Result};
use chrono::{DateTime, Local};
use ignore::WalkBuilder;
use pathdiff::diff_paths;
use std::collections::HashSet;
use std::ffi::{OsStr, OsString};
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

/// Depth-first, top-down walker that streams a report while it goes.
///
/// Each call to [`Scanner::scan`] owns its own [`ScanStats`], so a scanner
/// can be reused.
pub struct Scanner<'a> {
    root: PathBuf,
    config: &'a ScanConfig,
    exclude_dirs: Arc<HashSet<OsString>>,
}

impl<'a> Scanner<'a> {
    /// Fails if the configured root does not exist or is not a directory.
    pub fn new(config: &'a ScanConfig) -> Result<Self> {
        let root = fs::canonicalize(&config.root)
            .with_context(|| format!("Failed to resolve root path {}", config.root.display()))?;
        if !root.is_dir() {
            bail!("Root path {} is not a directory", root.display());
        }

        let exclude_dirs = config.exclude_dirs.iter().map(OsString::from).collect();

        Ok(Self {
            root,
            config,
            exclude_dirs: Arc::new(exclude_dirs),
        })
    }

    /// Create (or truncate) `output` and write the report into it.
    pub fn scan_to_file(&self, output: &Path) -> Result<ScanStats> {
        let file = File::create(output)
            .with_context(|| format!("Failed to open {} for writing", output.display()))?;
        self.scan(BufWriter::new(file))
    }

    pub fn scan<W: Write>(&self, out: W) -> Result<ScanStats> {
        let clock = Instant::now();
        let mut stats = ScanStats::new(Local::now());
        let mut report = ReportWriter::new(out);

        log::info!("Starting scan of {}", self.root.display());
        report.write_header(&stats.started_at, &self.root)?;

        let mut pending = vec![self.root.clone()];
        while let Some(dir) = pending.pop() {
            let (visit, subdirs) = self.visit_directory(&dir);
            self.write_directory(&mut report, &visit, &mut stats)?;
            // Reversed so the first child is visited next.
            pending.extend(subdirs.into_iter().rev());
        }

        stats.finished_at = Some(Local::now());
        stats.elapsed = clock.elapsed();
        report.write_footer(&stats)?;
        report.flush()?;

        log::info!(
            "Scan finished: {} directories, {} files in {:?}",
            stats.directories,
            stats.files,
            stats.elapsed
        );
        Ok(stats)
    }

    /// List one directory level, stat its files, and return the
    /// subdirectories still to walk. Excluded directories never make it
    /// into the listing.
    fn visit_directory(&self, dir: &Path) -> (DirectoryVisit, Vec<PathBuf>) {
        let depth = diff_paths(dir, &self.root).map_or(0, |rel| rel.components().count());
        log::debug!("Visiting {} (depth {})", dir.display(), depth);

        let exclude = Arc::clone(&self.exclude_dirs);
        let walker = WalkBuilder::new(dir)
            .standard_filters(false)
            .follow_links(false)
            .max_depth(Some(1))
            .sort_by_file_name(|a, b| a.cmp(b))
            .filter_entry(move |entry| {
                entry.depth() == 0
                    || !entry.file_type().is_some_and(|ft| ft.is_dir())
                    || !exclude.contains(entry.file_name())
            })
            .build();

        let mut names = Vec::new();
        let mut subdirs = Vec::new();
        let mut errors = Vec::new();

        for result in walker {
            match result {
                Ok(entry) if entry.depth() == 0 => {}
                Ok(entry) => {
                    if entry.file_type().is_some_and(|ft| ft.is_dir()) {
                        subdirs.push(entry.into_path());
                    } else if entry.path_is_symlink() && entry.path().is_dir() {
                        log::debug!("Not following directory link {}", entry.path().display());
                    } else {
                        names.push(entry.file_name().to_os_string());
                    }
                }
                Err(err) => {
                    log::warn!("Error listing {}: {}", dir.display(), err);
                    errors.push(err.to_string());
                }
            }
        }

        let mut files = Vec::with_capacity(names.len());
        let mut size = 0;
        for name in names {
            if self.is_excluded_file(&name) {
                continue;
            }
            let outcome = stat_file(dir.join(&name));
            if let FileOutcome::Found(entry) = &outcome {
                size += entry.size;
            }
            files.push((name, outcome));
        }

        let visit = DirectoryVisit {
            path: dir.to_path_buf(),
            depth,
            files,
            size,
            errors,
        };
        (visit, subdirs)
    }

    fn write_directory<W: Write>(
        &self,
        report: &mut ReportWriter<W>,
        visit: &DirectoryVisit,
        stats: &mut ScanStats,
    ) -> Result<()> {
        stats.total_size += visit.size;

        let name = visit
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| visit.path.display().to_string());
        report.write_directory(visit.depth, &name, visit.size, &visit.path)?;
        stats.directories += 1;

        for reason in &visit.errors {
            report.write_listing_error(visit.depth, reason)?;
        }

        let file_depth = visit.depth + 1;
        for (name, outcome) in &visit.files {
            let name = name.to_string_lossy();
            match outcome {
                FileOutcome::Found(entry) => {
                    stats.files += 1;
                    report.write_file(file_depth, &name, entry)?;
                    if self.wants_content(entry) {
                        match read_text(&entry.path) {
                            Ok(text) => report.write_content(file_depth, &text)?,
                            Err(err) => {
                                log::warn!("Could not read {}: {}", entry.path.display(), err);
                                report.write_content_error(file_depth, &err)?;
                            }
                        }
                    }
                }
                FileOutcome::Failed(err) => {
                    log::warn!("Could not stat {}: {}", visit.path.join(&*name).display(), err);
                    report.write_access_error(file_depth, &name, err)?;
                }
            }
        }

        report.end_directory()?;
        Ok(())
    }

    /// Literal suffix match, so `ve.pyc` is caught by `.pyc` and `X.PYC` is not.
    fn is_excluded_file(&self, name: &OsStr) -> bool {
        let name = name.to_string_lossy();
        self.config
            .exclude_files
            .iter()
            .any(|suffix| name.ends_with(suffix.as_str()))
    }

    fn wants_content(&self, entry: &FileEntry) -> bool {
        entry.size < self.config.max_content_size
            && self.config.text_extensions.iter().any(|ext| *ext == entry.extension)
    }
}

/// Follows symlinks, so a dangling link is a failure.
fn stat_file(path: PathBuf) -> FileOutcome {
    let metadata = match fs::metadata(&path) {
        Ok(md) => md,
        Err(err) => return FileOutcome::Failed(err),
    };
    let modified = match metadata.modified() {
        Ok(ts) => DateTime::<Local>::from(ts),
        Err(err) => return FileOutcome::Failed(err),
    };
    let extension = path
        .extension()
        .map(|ext| format!(".{}", ext.to_string_lossy().to_lowercase()))
        .unwrap_or_default();

    FileOutcome::Found(FileEntry {
        size: metadata.len(),
        modified,
        created: metadata.created().ok().map(DateTime::<Local>::from),
        extension,
        path,
    })
}
