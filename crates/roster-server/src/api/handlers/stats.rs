//! Registration statistics handler

use axum::{extract::State, Json};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::handlers::AppState;
use crate::core::DayCount;

/// Response from the weekly statistics endpoint
#[derive(Debug, Serialize)]
pub struct WeeklyStatsResponse {
    pub message: String,
    pub stats: Vec<DayCount>,
}

/// Registrations per day for the last seven days
///
/// GET /users/stats/weekly
pub async fn weekly_stats(
    State(state): State<Arc<AppState>>,
) -> Result<Json<WeeklyStatsResponse>, ApiError> {
    let stats = state.users.weekly_stats(Utc::now()).await?;

    Ok(Json(WeeklyStatsResponse {
        message: "Weekly user stats fetched successfully".into(),
        stats,
    }))
}
