// src/routes/health.rs

use axum::{extract::State, Json};
use serde::Serialize;

use crate::AppState;

#[derive(Serialize)]
pub struct HealthResp {
    pub status: &'static str,
    pub version: &'static str,
    pub database: bool,
}

pub async fn health(State(state): State<AppState>) -> Json<HealthResp> {
    let database = sqlx::query("SELECT 1").execute(&state.pool).await.is_ok();
    Json(HealthResp {
        status: if database { "ok" } else { "degraded" },
        version: "v1",
        database,
    })
}
