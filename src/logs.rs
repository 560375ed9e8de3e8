//! Append-only text log store.
//!
//! One line per record, append order, no deduplication. Appends are done by
//! the consumer task only; introducing more writers would require
//! serializing them externally.

use crate::event::Severity;
use chrono::Local;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

/// How far back `search` looks, in lines.
const SEARCH_DEPTH: usize = 5000;

pub struct LogManager {
    path: PathBuf,
}

impl LogManager {
    /// Creates the log directory if needed. The log file itself is created
    /// lazily on first append.
    pub fn new(base_dir: impl AsRef<Path>) -> io::Result<Self> {
        let base_dir = base_dir.as_ref();
        fs::create_dir_all(base_dir)?;
        Ok(Self {
            path: base_dir.join("netwarden.log"),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Appends one `{ts} | {LEVEL:<7} | {message}` line.
    pub fn append(&self, level: Severity, message: &str) -> io::Result<()> {
        let ts = Local::now().format("%Y-%m-%d %H:%M:%S");
        let line = format!("{ts} | {:<7} | {message}\n", level.label());
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())
    }

    pub fn info(&self, message: &str) -> io::Result<()> {
        self.append(Severity::Info, message)
    }

    pub fn warn(&self, message: &str) -> io::Result<()> {
        self.append(Severity::Warn, message)
    }

    pub fn error(&self, message: &str) -> io::Result<()> {
        self.append(Severity::Error, message)
    }

    /// The last `n` lines in append order. Empty when the file does not
    /// exist yet.
    pub fn read_last(&self, n: usize) -> io::Result<Vec<String>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }
        let content = fs::read_to_string(&self.path)?;
        let lines: Vec<&str> = content.lines().collect();
        let start = lines.len().saturating_sub(n);
        Ok(lines[start..].iter().map(|s| s.to_string()).collect())
    }

    /// Case-insensitive substring search over the most recent
    /// [`SEARCH_DEPTH`] lines, capped at `n` matches. An empty or
    /// whitespace-only keyword behaves exactly like [`read_last`](Self::read_last).
    pub fn search(&self, keyword: &str, n: usize) -> io::Result<Vec<String>> {
        let keyword = keyword.trim().to_lowercase();
        if keyword.is_empty() {
            return self.read_last(n);
        }

        let mut matches = Vec::new();
        for line in self.read_last(SEARCH_DEPTH)? {
            if line.to_lowercase().contains(&keyword) {
                matches.push(line);
                if matches.len() >= n {
                    break;
                }
            }
        }
        Ok(matches)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn manager() -> (tempfile::TempDir, LogManager) {
        let dir = tempdir().unwrap();
        let logs = LogManager::new(dir.path()).unwrap();
        (dir, logs)
    }

    #[test]
    fn read_last_on_missing_file_is_empty() {
        let (_dir, logs) = manager();
        assert!(logs.read_last(10).unwrap().is_empty());
    }

    #[test]
    fn append_then_read_last_preserves_order_and_cap() {
        let (_dir, logs) = manager();
        for i in 0..20 {
            logs.info(&format!("line {i}")).unwrap();
        }

        let lines = logs.read_last(5).unwrap();
        assert_eq!(lines.len(), 5);
        assert!(lines[0].contains("line 15"));
        assert!(lines[4].contains("line 19"));
    }

    #[test]
    fn lines_carry_level_labels() {
        let (_dir, logs) = manager();
        logs.warn("suspicious").unwrap();
        logs.error("broken").unwrap();

        let lines = logs.read_last(2).unwrap();
        assert!(lines[0].contains("WARN"));
        assert!(lines[1].contains("ERROR"));
    }

    #[test]
    fn empty_keyword_equals_read_last() {
        let (_dir, logs) = manager();
        for i in 0..15 {
            logs.info(&format!("entry {i}")).unwrap();
        }
        assert_eq!(logs.search("", 10).unwrap(), logs.read_last(10).unwrap());
        assert_eq!(logs.search("   ", 10).unwrap(), logs.read_last(10).unwrap());
    }

    #[test]
    fn search_is_case_insensitive() {
        let (_dir, logs) = manager();
        logs.append(Severity::Info, "an error occurred").unwrap();
        logs.info("all fine").unwrap();

        let matches = logs.search("ERROR", 10).unwrap();
        assert_eq!(matches.len(), 1);
        assert!(matches[0].contains("an error occurred"));
    }

    #[test]
    fn search_caps_results_at_n() {
        let (_dir, logs) = manager();
        for i in 0..10 {
            logs.warn(&format!("blocked {i}")).unwrap();
        }
        assert_eq!(logs.search("blocked", 3).unwrap().len(), 3);
    }

    #[test]
    fn search_matches_level_column() {
        let (_dir, logs) = manager();
        logs.append(Severity::Danger, "rate exceeded").unwrap();
        let matches = logs.search("danger", 10).unwrap();
        assert_eq!(matches.len(), 1);
    }
}
