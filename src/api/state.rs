//! API shared state

use std::sync::Arc;

use crate::alerts::AlertLog;
use crate::registry::LiveRegistry;
use crate::storage::HistoryStore;

/// Shared state passed to all API handlers
#[derive(Clone)]
pub struct ApiState {
    /// Most recent reading per agent
    pub registry: LiveRegistry,

    /// Bounded in-memory alert log
    pub alerts: AlertLog,

    /// Durable history log
    pub history: Arc<HistoryStore>,

    /// Staleness threshold applied when classifying agents
    pub offline_threshold_secs: i64,
}

impl ApiState {
    pub fn new(
        registry: LiveRegistry,
        alerts: AlertLog,
        history: Arc<HistoryStore>,
        offline_threshold_secs: i64,
    ) -> Self {
        Self {
            registry,
            alerts,
            history,
            offline_threshold_secs,
        }
    }
}
