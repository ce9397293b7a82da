pub mod alerts;
pub mod api;
pub mod codec;
pub mod config;
pub mod receivers;
pub mod registry;
pub mod storage;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One agent's resource-usage sample at a point in time.
///
/// Percentages are reported by the producer and are semantically 0-100,
/// but they are never clamped here. `critical` is set by the producer
/// when its own policy threshold was exceeded at emission time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub agent_id: String,
    pub cpu_percent: f64,
    pub memory_percent: f64,
    pub disk_percent: f64,
    pub timestamp: DateTime<Utc>,
    #[serde(default)]
    pub critical: bool,
}

impl Reading {
    /// Create a reading stamped with the current time.
    pub fn new(agent_id: impl Into<String>, cpu: f64, memory: f64, disk: f64) -> Self {
        Self {
            agent_id: agent_id.into(),
            cpu_percent: cpu,
            memory_percent: memory,
            disk_percent: disk,
            timestamp: Utc::now(),
            critical: false,
        }
    }

    pub fn with_critical(mut self, critical: bool) -> Self {
        self.critical = critical;
        self
    }
}
