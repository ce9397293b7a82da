//! In-memory alert log.
//!
//! Alerts are immutable formatted strings kept in emission order. The log
//! is bounded: once the capacity is reached the oldest entries are
//! evicted. Readers only ever see a tail view of the most recent entries.

use std::collections::VecDeque;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::trace;

/// Default number of alerts kept before eviction
pub const DEFAULT_ALERT_CAPACITY: usize = 1000;

/// Bounded, concurrently-appended list of alert messages
#[derive(Debug, Clone)]
pub struct AlertLog {
    entries: Arc<RwLock<VecDeque<String>>>,
    capacity: usize,
}

impl Default for AlertLog {
    fn default() -> Self {
        Self::new(DEFAULT_ALERT_CAPACITY)
    }
}

impl AlertLog {
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: Arc::new(RwLock::new(VecDeque::with_capacity(capacity.min(64)))),
            capacity: capacity.max(1),
        }
    }

    /// Append one alert, evicting the oldest entry when full.
    pub async fn push(&self, entry: String) {
        trace!("appending alert: {entry}");

        let mut entries = self.entries.write().await;
        entries.push_back(entry);
        while entries.len() > self.capacity {
            entries.pop_front();
        }
    }

    /// The `n` most recent alerts, oldest of those first.
    pub async fn recent(&self, n: usize) -> Vec<String> {
        let entries = self.entries.read().await;
        let skip = entries.len().saturating_sub(n);
        entries.iter().skip(skip).cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
