use chrono::Local;
use serde::{Deserialize, Serialize};

pub const DELIMITER: char = '|';
pub const UNKNOWN_IP: &str = "unknown";
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One submitted score.
///
/// Serializes to `{"score": .., "timestamp": .., "ip": ..}` over HTTP and to
/// `score|timestamp|ip` on disk.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ScoreRecord {
    pub score: i64,
    pub timestamp: String,
    pub ip: String,
}

impl ScoreRecord {
    /// Stamps the record with the current local time.
    pub fn new(score: i64, ip: impl Into<String>) -> Self {
        Self {
            score,
            timestamp: now_formatted(),
            ip: ip.into(),
        }
    }

    pub fn to_line(&self) -> String {
        format!(
            "{}{DELIMITER}{}{DELIMITER}{}\n",
            self.score, self.timestamp, self.ip
        )
    }

    /// Returns `None` for blank lines, lines with fewer than two fields and
    /// lines whose first field is not an integer.
    pub fn from_line(line: &str) -> Option<Self> {
        let line = line.trim();

        if line.is_empty() {
            return None;
        }

        let mut parts = line.split(DELIMITER);

        let score = parts.next()?.trim().parse().ok()?;
        let timestamp = parts.next()?.to_string();
        let ip = parts.next().unwrap_or(UNKNOWN_IP).to_string();

        Some(Self {
            score,
            timestamp,
            ip,
        })
    }
}

pub fn now_formatted() -> String {
    Local::now().format(TIMESTAMP_FORMAT).to_string()
}

pub fn parse_lines(contents: &str) -> Vec<ScoreRecord> {
    contents.lines().filter_map(ScoreRecord::from_line).collect()
}

/// Highest scores first, keeping file order among equal scores.
pub fn rank(mut records: Vec<ScoreRecord>, limit: usize) -> Vec<ScoreRecord> {
    records.sort_by(|a, b| b.score.cmp(&a.score));
    records.truncate(limit);

    records
}
