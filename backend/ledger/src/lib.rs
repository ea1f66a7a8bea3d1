//! # Ledger
//!
//! Flat file holding every submitted score.
//!
//! ## Format
//! - One record per line: `score|timestamp|ip`
//! - No header, no escaping, no version field
//! - A missing third field reads back as `"unknown"`
//! - Blank or malformed lines are skipped on load
//!
//! ## Access
//! - Append only, the file is opened and closed on every write
//! - No locking, concurrent writers rely on `O_APPEND` keeping single lines intact
//! - Reads load the whole file and rank in memory
use std::{
    fs::{self, OpenOptions},
    io::{self, ErrorKind, Write},
    path::{Path, PathBuf},
};

use thiserror::Error;
use tracing::warn;

pub mod record;

pub use record::{ScoreRecord, rank};

pub const LEADERBOARD_SIZE: usize = 10;

#[derive(Error, Debug)]
pub enum LedgerError {
    #[error("Failed to create {}: {source}", .path.display())]
    Create { path: PathBuf, source: io::Error },

    #[error("Failed to append to {}: {source}", .path.display())]
    Append { path: PathBuf, source: io::Error },
}

#[derive(Debug, Clone)]
pub struct Ledger {
    path: PathBuf,
}

impl Ledger {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Creates an empty file if none exists. Returns whether it was created.
    pub fn ensure_exists(&self) -> Result<bool, LedgerError> {
        match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&self.path)
        {
            Ok(_) => Ok(true),
            Err(e) if e.kind() == ErrorKind::AlreadyExists => Ok(false),
            Err(source) => Err(LedgerError::Create {
                path: self.path.clone(),
                source,
            }),
        }
    }

    /// Every readable record in file order. Read failures are logged and
    /// treated as an empty file.
    pub fn load(&self) -> Vec<ScoreRecord> {
        match fs::read_to_string(&self.path) {
            Ok(contents) => record::parse_lines(&contents),
            Err(e) if e.kind() == ErrorKind::NotFound => Vec::new(),
            Err(e) => {
                warn!("Error loading scores from {}: {e}", self.path.display());
                Vec::new()
            }
        }
    }

    pub fn append(&self, record: &ScoreRecord) -> Result<(), LedgerError> {
        let to_error = |source: io::Error| LedgerError::Append {
            path: self.path.clone(),
            source,
        };

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(to_error)?;

        file.write_all(record.to_line().as_bytes()).map_err(to_error)
    }

    pub fn top(&self, limit: usize) -> Vec<ScoreRecord> {
        rank(self.load(), limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(score: i64, timestamp: &str, ip: &str) -> ScoreRecord {
        ScoreRecord {
            score,
            timestamp: timestamp.to_string(),
            ip: ip.to_string(),
        }
    }

    #[test]
    fn test_load_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("scores.txt"));

        assert!(ledger.load().is_empty());
        assert!(ledger.top(LEADERBOARD_SIZE).is_empty());
    }

    #[test]
    fn test_load_unreadable_path_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path());

        assert!(ledger.load().is_empty());
    }

    #[test]
    fn test_append_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("scores.txt"));

        let first = ScoreRecord::new(42, "10.0.0.1");
        let second = record(7, "2024-01-01 09:00:00", "10.0.0.2");

        ledger.append(&first).unwrap();
        ledger.append(&second).unwrap();

        assert_eq!(ledger.load(), vec![first, second]);
    }

    #[test]
    fn test_append_writes_format() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let ledger = Ledger::new(&path);

        ledger
            .append(&record(100, "2024-01-01 10:00:00", "1.2.3.4"))
            .unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "100|2024-01-01 10:00:00|1.2.3.4\n"
        );
    }

    #[test]
    fn test_append_failure() {
        let dir = tempfile::tempdir().unwrap();
        let ledger = Ledger::new(dir.path().join("missing").join("scores.txt"));

        let result = ledger.append(&record(1, "t", "ip"));

        assert!(matches!(result, Err(LedgerError::Append { .. })));
    }

    #[test]
    fn test_top_orders_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        fs::write(
            &path,
            "50|2024-01-01 09:00:00|5.6.7.8\n100|2024-01-01 10:00:00|1.2.3.4\n",
        )
        .unwrap();

        assert_eq!(
            Ledger::new(&path).top(LEADERBOARD_SIZE),
            vec![
                record(100, "2024-01-01 10:00:00", "1.2.3.4"),
                record(50, "2024-01-01 09:00:00", "5.6.7.8"),
            ]
        );
    }

    #[test]
    fn test_ensure_exists() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("scores.txt");
        let ledger = Ledger::new(&path);

        assert!(ledger.ensure_exists().unwrap());
        assert!(path.exists());

        ledger.append(&record(1, "t", "ip")).unwrap();

        assert!(!ledger.ensure_exists().unwrap());
        assert_eq!(ledger.load().len(), 1);
    }
}
