//! History query endpoints

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{DateTime, Duration, Utc};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};

/// Query parameters for the recent-history window
#[derive(Debug, Deserialize)]
pub struct HistoryQuery {
    /// Agent filter (absent or empty means all agents)
    agent: Option<String>,

    /// Max records (default: 100)
    limit: Option<usize>,
}

/// Query parameters for a time-ranged history scan
#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    /// Agent filter (absent or empty means all agents)
    pub(super) agent: Option<String>,

    /// Start time, inclusive (ISO 8601, default: 1 hour before end)
    pub(super) start: Option<DateTime<Utc>>,

    /// End time, inclusive (ISO 8601, default: now)
    pub(super) end: Option<DateTime<Utc>>,
}

impl RangeQuery {
    pub(super) fn bounds(&self) -> (DateTime<Utc>, DateTime<Utc>) {
        let end = self.end.unwrap_or_else(Utc::now);
        let start = self.start.unwrap_or_else(|| end - Duration::hours(1));
        (start, end)
    }
}

/// GET /api/v1/history
///
/// Up to `limit` most recent records, ascending append order.
pub async fn get_history(
    State(state): State<ApiState>,
    Query(query): Query<HistoryQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(100);

    let records = state.history.query(query.agent.as_deref(), limit).await?;

    Ok(Json(json!({
        "agent": query.agent,
        "count": records.len(),
        "records": records,
    })))
}

/// GET /api/v1/history/range
///
/// All records with a timestamp in `[start, end]` inclusive.
pub async fn get_history_range(
    State(state): State<ApiState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Json<Value>> {
    let (start, end) = query.bounds();

    let records = state
        .history
        .query_range(query.agent.as_deref(), start, end)
        .await?;

    Ok(Json(json!({
        "agent": query.agent,
        "start": start.to_rfc3339(),
        "end": end.to_rfc3339(),
        "count": records.len(),
        "records": records,
    })))
}
