use std::fs::{self, OpenOptions, create_dir_all};
use std::io::{BufRead, BufReader, Write};
use std::path::PathBuf;

use anyhow::Result;
use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::config::schema::LoggingConfig;

// ---------------------------------------------------------------------------
// Event entry (JSONL)
// ---------------------------------------------------------------------------

/// Kind of a logged event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// One optimization attempt, successful or not.
    Optimize,
    /// `GET /models` failed and the static catalog was used.
    ModelsFallback,
    /// A `POST /clear-cache` call.
    ClearCache,
}

/// A single entry in the event log (`~/.greencode/events.jsonl`).
///
/// Optional fields are only set for the event kinds that carry them.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EventEntry {
    pub timestamp: String,
    pub kind: EventKind,
    /// `"complete"` or `"failed"`.
    pub outcome: String,
    /// `"remote"` or `"fallback"` for completed attempts.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub source: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub context: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub score_improvement: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub error_kind: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub message: Option<String>,
}

impl EventEntry {
    /// Start an entry stamped with the current time.
    pub fn new(kind: EventKind, outcome: &str) -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            kind,
            outcome: outcome.to_string(),
            source: None,
            context: None,
            model: None,
            latency_ms: None,
            score_improvement: None,
            error_kind: None,
            message: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Event log handle
// ---------------------------------------------------------------------------

/// Append-only JSONL event log.
///
/// All writes are best-effort: a log that cannot be written never fails the
/// caller. A disabled log (no path) drops every entry.
#[derive(Debug, Clone, Default)]
pub struct EventLog {
    path: Option<PathBuf>,
}

impl EventLog {
    /// Build the log from config: `~/.greencode/<file>` when enabled.
    pub fn from_config(config: &LoggingConfig) -> Self {
        if !config.enabled {
            return Self::disabled();
        }
        Self {
            path: dirs::home_dir().map(|home| home.join(".greencode").join(&config.file)),
        }
    }

    /// Log to an explicit file.
    pub fn at(path: impl Into<PathBuf>) -> Self {
        Self {
            path: Some(path.into()),
        }
    }

    pub fn disabled() -> Self {
        Self { path: None }
    }

    pub fn path(&self) -> Option<&PathBuf> {
        self.path.as_ref()
    }

    /// Append an entry, ignoring I/O failures.
    pub fn record(&self, entry: &EventEntry) {
        let _ = self.append(entry);
    }

    fn append(&self, entry: &EventEntry) -> Result<()> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        if let Some(parent) = path.parent() {
            create_dir_all(parent)?;
        }

        let mut file = OpenOptions::new().create(true).append(true).open(path)?;
        let json = serde_json::to_string(entry)?;
        writeln!(file, "{json}")?;

        Ok(())
    }

    // -----------------------------------------------------------------------
    // Reading
    // -----------------------------------------------------------------------

    /// Read all entries. Malformed lines are skipped; a missing file yields
    /// an empty vec.
    pub fn read_all(&self) -> Vec<EventEntry> {
        let Some(path) = &self.path else {
            return Vec::new();
        };

        let Ok(file) = fs::File::open(path) else {
            return Vec::new();
        };

        BufReader::new(file)
            .lines()
            .map_while(std::result::Result::ok)
            .filter_map(|line| serde_json::from_str::<EventEntry>(&line).ok())
            .collect()
    }

    /// Read entries from the last `days` days (all entries when `None`).
    pub fn read_since_days(&self, days: Option<u32>) -> Vec<EventEntry> {
        let entries = self.read_all();

        let Some(days) = days else {
            return entries;
        };

        let cutoff = (Utc::now() - chrono::Duration::days(i64::from(days))).to_rfc3339();

        entries
            .into_iter()
            .filter(|e| e.timestamp >= cutoff)
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log(name: &str) -> EventLog {
        let path = std::env::temp_dir().join(format!(
            "greencode-logger-{}-{name}.jsonl",
            std::process::id()
        ));
        let _ = fs::remove_file(&path);
        EventLog::at(path)
    }

    #[test]
    fn disabled_log_drops_entries() {
        let log = EventLog::disabled();
        log.record(&EventEntry::new(EventKind::Optimize, "complete"));
        assert!(log.read_all().is_empty());
    }

    #[test]
    fn entries_round_trip_through_file() {
        let log = temp_log("roundtrip");
        let mut entry = EventEntry::new(EventKind::Optimize, "complete");
        entry.source = Some("remote".to_string());
        entry.latency_ms = Some(42);
        log.record(&entry);
        log.record(&EventEntry::new(EventKind::ClearCache, "failed"));

        let entries = log.read_all();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].latency_ms, Some(42));
        assert_eq!(entries[1].kind, EventKind::ClearCache);

        let _ = fs::remove_file(log.path().unwrap());
    }

    #[test]
    fn malformed_lines_are_skipped() {
        let log = temp_log("malformed");
        log.record(&EventEntry::new(EventKind::Optimize, "failed"));
        let mut file = OpenOptions::new()
            .append(true)
            .open(log.path().unwrap())
            .unwrap();
        writeln!(file, "not json").unwrap();

        assert_eq!(log.read_all().len(), 1);
        let _ = fs::remove_file(log.path().unwrap());
    }

    #[test]
    fn old_entries_are_filtered_by_days() {
        let log = temp_log("days");
        let mut old = EventEntry::new(EventKind::Optimize, "complete");
        old.timestamp = (Utc::now() - chrono::Duration::days(10)).to_rfc3339();
        log.record(&old);
        log.record(&EventEntry::new(EventKind::Optimize, "complete"));

        assert_eq!(log.read_since_days(Some(3)).len(), 1);
        assert_eq!(log.read_since_days(None).len(), 2);
        let _ = fs::remove_file(log.path().unwrap());
    }
}
