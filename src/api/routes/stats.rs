//! Statistics endpoints

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use super::history::RangeQuery;
use crate::api::{error::ApiResult, state::ApiState};

#[derive(Debug, Deserialize)]
pub struct StatsQuery {
    /// Agent filter (absent or empty means all agents)
    agent: Option<String>,
}

/// GET /api/v1/statistics
///
/// Aggregates over the most recent history window for the agent.
pub async fn get_statistics(
    State(state): State<ApiState>,
    Query(query): Query<StatsQuery>,
) -> ApiResult<Json<Value>> {
    let summary = state
        .history
        .statistics_for(query.agent.as_deref())
        .await?;

    Ok(Json(json!({
        "agent": query.agent,
        "summary": summary,
    })))
}

/// GET /api/v1/statistics/range
///
/// Aggregates over all records in `[start, end]` inclusive.
pub async fn get_statistics_range(
    State(state): State<ApiState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Value>> {
    let (start, end) = query.bounds();

    let summary = state
        .history
        .statistics_for_range(query.agent.as_deref(), start, end)
        .await?;

    Ok(Json(json!({
        "agent": query.agent,
        "start": start.to_rfc3339(),
        "end": end.to_rfc3339(),
        "summary": summary,
    })))
}
