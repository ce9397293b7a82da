//! Append-only history store with range queries and statistics.
//!
//! Appends are serialized behind a mutex so lines never interleave
//! mid-record. Reads open the log independently and never take the write
//! lock, so queries do not block ingestion; a final partial line written
//! concurrently simply fails to parse and is skipped.
//!
//! Every query re-scans the matching window of the log. That is a
//! deliberate trade-off: the log is append-only and the scan is linear.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tokio::sync::Mutex;
use tracing::{debug, trace};

use super::error::StorageResult;
use super::schema::{HistoryRecord, StatsSummary};
use crate::Reading;

/// Window of most recent records used for whole-log statistics
pub const STATS_WINDOW: usize = 1000;

/// Durable, append-only log of readings
pub struct HistoryStore {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl HistoryStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        debug!("history store backed by {}", path.display());

        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Durably append one record. Concurrent appends are serialized; a
    /// record is only reported successful once the line is flushed.
    pub async fn append(&self, reading: &Reading) -> StorageResult<()> {
        let line = HistoryRecord::from_reading(reading).to_line();

        let _guard = self.write_lock.lock().await;
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;
        file.write_all(format!("{line}\n").as_bytes()).await?;
        file.flush().await?;

        trace!("appended history record for {}", reading.agent_id);
        Ok(())
    }

    /// Up to `limit` most recent records for `agent` (all agents when
    /// `None` or empty), ascending append order within the window. A
    /// missing log yields an empty list.
    pub async fn query(&self, agent: Option<&str>, limit: usize) -> StorageResult<Vec<HistoryRecord>> {
        let mut records = self.read_matching(agent).await?;
        if records.len() > limit {
            records.drain(..records.len() - limit);
        }
        Ok(records)
    }

    /// All records with a timestamp in `[start, end]` inclusive. The
    /// result is unbounded; callers size their own ranges.
    pub async fn query_range(
        &self,
        agent: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<Vec<HistoryRecord>> {
        let records = self.read_matching(agent).await?;
        Ok(records
            .into_iter()
            .filter(|r| r.timestamp >= start && r.timestamp <= end)
            .collect())
    }

    /// Statistics over the most recent [`STATS_WINDOW`] records for `agent`.
    pub async fn statistics_for(&self, agent: Option<&str>) -> StorageResult<StatsSummary> {
        Ok(statistics(&self.query(agent, STATS_WINDOW).await?))
    }

    /// Statistics over all records in `[start, end]` for `agent`.
    pub async fn statistics_for_range(
        &self,
        agent: Option<&str>,
        start: DateTime<Utc>,
        end: DateTime<Utc>,
    ) -> StorageResult<StatsSummary> {
        Ok(statistics(&self.query_range(agent, start, end).await?))
    }

    async fn read_matching(&self, agent: Option<&str>) -> StorageResult<Vec<HistoryRecord>> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let filter = agent.filter(|a| !a.is_empty());
        Ok(contents
            .lines()
            .filter_map(HistoryRecord::parse_line)
            .filter(|record| filter.is_none_or(|a| record.agent_id == a))
            .collect())
    }
}

/// Compute aggregates over a record set.
///
/// Empty input yields an all-zero summary with `total_records = 0`.
/// Malformed lines never reach this function (they are skipped at parse
/// time), so every record here counts in the denominator.
pub fn statistics(records: &[HistoryRecord]) -> StatsSummary {
    let Some(first) = records.first() else {
        return StatsSummary::default();
    };

    let mut summary = StatsSummary {
        min_cpu: first.cpu_percent,
        max_cpu: first.cpu_percent,
        min_memory: first.memory_percent,
        max_memory: first.memory_percent,
        ..StatsSummary::default()
    };

    let mut sum_cpu = 0.0;
    let mut sum_memory = 0.0;

    for record in records {
        sum_cpu += record.cpu_percent;
        sum_memory += record.memory_percent;
        summary.min_cpu = summary.min_cpu.min(record.cpu_percent);
        summary.max_cpu = summary.max_cpu.max(record.cpu_percent);
        summary.min_memory = summary.min_memory.min(record.memory_percent);
        summary.max_memory = summary.max_memory.max(record.memory_percent);
        if record.is_critical() {
            summary.critical_count += 1;
        }
    }

    summary.total_records = records.len();
    summary.avg_cpu = sum_cpu / records.len() as f64;
    summary.avg_memory = sum_memory / records.len() as f64;
    summary
}
