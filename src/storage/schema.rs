//! Record and summary types for the history log.
//!
//! One record per line:
//!
//! ```text
//! 2026-08-30 12:00:00,Agent-1,42.50,61.25,77.00,OK
//! ```
//!
//! Comma-delimited, timestamps at second precision, percentages with two
//! fixed decimals and a locale-independent decimal point. The status
//! label is `CRITIQUE` for readings flagged critical by the producer,
//! `OK` otherwise. Lines with fewer than six fields, or fields that fail
//! to parse, are skipped by readers rather than treated as fatal.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;

use crate::Reading;

/// Timestamp format used in log lines
pub const LINE_TIME_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Status label for readings flagged critical by the producer
pub const STATUS_CRITICAL: &str = "CRITIQUE";

/// Status label for everything else
pub const STATUS_OK: &str = "OK";

const FIELD_COUNT: usize = 6;

/// One durably-appended history record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoryRecord {
    pub timestamp: DateTime<Utc>,
    pub agent_id: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub status: String,
}

impl HistoryRecord {
    pub fn from_reading(reading: &Reading) -> Self {
        Self {
            timestamp: reading.timestamp,
            agent_id: reading.agent_id.clone(),
            cpu_percent: reading.cpu_percent,
            memory_percent: reading.memory_percent,
            disk_percent: reading.disk_percent,
            status: if reading.critical {
                STATUS_CRITICAL.to_string()
            } else {
                STATUS_OK.to_string()
            },
        }
    }

    /// Render the record as one log line (without terminator).
    pub fn to_line(&self) -> String {
        format!(
            "{},{},{:.2},{:.2},{:.2},{}",
            self.timestamp.format(LINE_TIME_FORMAT),
            self.agent_id,
            self.cpu_percent,
            self.memory_percent,
            self.disk_percent,
            self.status,
        )
    }

    /// Parse one log line. Returns `None` for short or malformed lines so
    /// readers can skip them (including a torn final line mid-append).
    pub fn parse_line(line: &str) -> Option<Self> {
        let parts: Vec<&str> = line.split(',').collect();
        if parts.len() < FIELD_COUNT {
            return None;
        }

        let timestamp = NaiveDateTime::parse_from_str(parts[0], LINE_TIME_FORMAT)
            .ok()?
            .and_utc();

        Some(Self {
            timestamp,
            agent_id: parts[1].to_string(),
            cpu_percent: parts[2].parse().ok()?,
            memory_percent: parts[3].parse().ok()?,
            disk_percent: parts[4].parse().ok()?,
            status: parts[5].to_string(),
        })
    }

    pub fn is_critical(&self) -> bool {
        self.status == STATUS_CRITICAL
    }
}

/// Aggregates over a set of history records
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct StatsSummary {
    pub avg_cpu: f64,
    pub min_cpu: f64,
    pub max_cpu: f64,
    pub avg_memory: f64,
    pub min_memory: f64,
    pub max_memory: f64,
    pub total_records: usize,
    pub critical_count: usize,
}
