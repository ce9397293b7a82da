//! Live agent listing

use axum::{Json, extract::State};
use chrono::Utc;
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};
use crate::registry;

/// GET /api/v1/agents
///
/// Latest reading per agent with a derived liveness status. The last
/// known reading stays retrievable even for agents classified offline.
pub async fn list_agents(State(state): State<ApiState>) -> ApiResult<Json<Value>> {
    let now = Utc::now();

    let mut snapshot = state.registry.snapshot().await;
    snapshot.sort_by(|a, b| a.agent_id.cmp(&b.agent_id));

    let agents: Vec<Value> = snapshot
        .iter()
        .map(|reading| {
            let status = registry::classify(reading, now, state.offline_threshold_secs);
            json!({
                "reading": reading,
                "status": status,
            })
        })
        .collect();

    Ok(Json(json!({
        "agents": agents,
        "count": agents.len(),
    })))
}
