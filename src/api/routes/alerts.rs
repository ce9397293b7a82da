//! Recent alerts endpoint

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use serde_json::{Value, json};

use crate::api::{error::ApiResult, state::ApiState};

#[derive(Debug, Deserialize)]
pub struct AlertsQuery {
    /// Max alerts to return (default: 10)
    limit: Option<usize>,
}

/// GET /api/v1/alerts
///
/// Tail view of the alert log, oldest of the returned entries first.
pub async fn recent_alerts(
    State(state): State<ApiState>,
    Query(query): Query<AlertsQuery>,
) -> ApiResult<Json<Value>> {
    let limit = query.limit.unwrap_or(10);

    let alerts = state.alerts.recent(limit).await;

    Ok(Json(json!({
        "alerts": alerts,
        "count": alerts.len(),
    })))
}
