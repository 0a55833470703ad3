use crate::app::encoding::ContentError;
use crate::app::models::{FileEntry, ScanStats};
use crate::app::size::{format_bytes, format_count};
use chrono::{DateTime, Local};
use std::io::{self, Write};
use std::path::Path;
use std::time::Duration;

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

fn indent(depth: usize) -> String {
    "  ".repeat(depth)
}

fn rule(width: usize) -> String {
    "=".repeat(width)
}

pub fn format_timestamp(ts: &DateTime<Local>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// `H:MM:SS.ffffff`
pub fn format_elapsed(elapsed: Duration) -> String {
    let secs = elapsed.as_secs();
    format!(
        "{}:{:02}:{:02}.{:06}",
        secs / 3600,
        (secs / 60) % 60,
        secs % 60,
        elapsed.subsec_micros()
    )
}

/// Streams the report to `out` as the walker produces it.
pub struct ReportWriter<W: Write> {
    out: W,
}

impl<W: Write> ReportWriter<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn write_header(&mut self, started_at: &DateTime<Local>, root: &Path) -> io::Result<()> {
        writeln!(self.out, "Folder Structure Detailed Scan Report")?;
        writeln!(self.out, "Scan started: {}", format_timestamp(started_at))?;
        writeln!(self.out, "Root path: {}", root.display())?;
        writeln!(self.out, "{}\n", rule(80))
    }

    pub fn write_directory(&mut self, depth: usize, name: &str, size: u64, path: &Path) -> io::Result<()> {
        let pad = indent(depth);
        writeln!(self.out, "\n{}📁 {}/ ({})", pad, name, format_bytes(size))?;
        writeln!(self.out, "{}   Path: {}", pad, path.display())
    }

    /// Marker for a directory whose listing was incomplete.
    pub fn write_listing_error(&mut self, depth: usize, reason: &str) -> io::Result<()> {
        writeln!(self.out, "{}❌ (listing error: {})", indent(depth + 1), reason)
    }

    /// Closes a directory section.
    pub fn end_directory(&mut self) -> io::Result<()> {
        writeln!(self.out)
    }

    pub fn write_file(&mut self, depth: usize, name: &str, entry: &FileEntry) -> io::Result<()> {
        let pad = indent(depth);
        let created = entry
            .created
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_else(|| "unavailable".to_string());

        writeln!(self.out, "\n{}📄 {}", pad, name)?;
        writeln!(self.out, "{}   Size: {}", pad, format_bytes(entry.size))?;
        writeln!(self.out, "{}   Created: {}", pad, created)?;
        writeln!(self.out, "{}   Modified: {}", pad, format_timestamp(&entry.modified))
    }

    pub fn write_access_error(&mut self, depth: usize, name: &str, err: &io::Error) -> io::Result<()> {
        writeln!(self.out, "{}❌ {} (access error: {})", indent(depth), name, err)
    }

    /// Line-numbered content block. Numbering starts at 1 for every file.
    pub fn write_content(&mut self, depth: usize, text: &str) -> io::Result<()> {
        let pad = indent(depth);
        writeln!(self.out, "{}   Content:", pad)?;
        writeln!(self.out, "{}   {}", pad, rule(40))?;
        // `\r\n` and lone `\r` both end a line.
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        for (line_num, line) in text.split_terminator('\n').enumerate() {
            writeln!(self.out, "{}   {:>4} | {}", pad, line_num + 1, line)?;
        }
        writeln!(self.out, "{}   {}", pad, rule(40))
    }

    pub fn write_content_error(&mut self, depth: usize, err: &ContentError) -> io::Result<()> {
        writeln!(self.out, "{}   Content read failed: {}", indent(depth), err)
    }

    pub fn write_footer(&mut self, stats: &ScanStats) -> io::Result<()> {
        let finished = stats
            .finished_at
            .as_ref()
            .map(format_timestamp)
            .unwrap_or_default();

        writeln!(self.out, "\n{}", rule(80))?;
        writeln!(self.out, "Scan statistics:")?;
        writeln!(self.out, "Total directories: {}", format_count(stats.directories))?;
        writeln!(self.out, "Total files: {}", format_count(stats.files))?;
        writeln!(self.out, "Total size: {}", format_bytes(stats.total_size))?;
        writeln!(self.out, "Scan started: {}", format_timestamp(&stats.started_at))?;
        writeln!(self.out, "Scan finished: {}", finished)?;
        writeln!(self.out, "Elapsed: {}", format_elapsed(stats.elapsed))
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    #[cfg(test)]
    fn into_inner(self) -> W {
        self.out
    }
}
