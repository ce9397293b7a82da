//! Live registry of the most recent reading per agent.
//!
//! The registry holds exactly one reading per agent id, replaced on every
//! receipt. Receipt order decides "most recent", not the reported
//! timestamp, so a late datagram for an agent still wins. Entries are
//! never deleted; an agent that stops sending simply stops being updated
//! and is classified offline at read time.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::trace;

use crate::Reading;

/// Default seconds before an agent with no fresh timestamp counts as offline
pub const DEFAULT_OFFLINE_THRESHOLD_SECS: i64 = 15;

/// Read-time classification of an agent's liveness
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum AgentStatus {
    Online,
    Offline,
}

/// Concurrent map of each agent's most recently received reading
#[derive(Debug, Clone, Default)]
pub struct LiveRegistry {
    agents: Arc<RwLock<HashMap<String, Reading>>>,
}

impl LiveRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the entry for the reading's agent, creating it on first sight.
    pub async fn upsert(&self, reading: Reading) {
        trace!("upserting reading for {}", reading.agent_id);

        let mut agents = self.agents.write().await;
        agents.insert(reading.agent_id.clone(), reading);
    }

    /// Point-in-time copy of all current entries.
    pub async fn snapshot(&self) -> Vec<Reading> {
        let agents = self.agents.read().await;
        agents.values().cloned().collect()
    }

    pub async fn len(&self) -> usize {
        self.agents.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.agents.read().await.is_empty()
    }
}

/// Classify a reading against `now`.
///
/// Staleness is judged on the agent-reported timestamp, not receipt time,
/// so an agent with a skewed clock or a buffered channel can appear
/// offline while still sending. That behavior is kept as-is.
pub fn classify(reading: &Reading, now: DateTime<Utc>, threshold_secs: i64) -> AgentStatus {
    if now - reading.timestamp > Duration::seconds(threshold_secs) {
        AgentStatus::Offline
    } else {
        AgentStatus::Online
    }
}
