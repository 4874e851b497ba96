use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::post;
use axum::Json;
use axum::Router;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::batch::{BatchStatus, RouteBatch};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/batches", post(create_batch).get(list_batches))
        .route("/batches/:id/close", post(close_batch))
}

#[derive(Deserialize)]
pub struct CreateBatchRequest {
    pub pickup_date: NaiveDate,
    pub cutoff: String,
}

async fn create_batch(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateBatchRequest>,
) -> Result<Json<RouteBatch>, AppError> {
    if payload.cutoff.trim().is_empty() {
        return Err(AppError::Validation("cutoff cannot be empty".to_string()));
    }

    let batch = RouteBatch {
        id: Uuid::new_v4(),
        pickup_date: payload.pickup_date,
        cutoff: payload.cutoff,
        status: BatchStatus::Open,
        order_count: 0,
    };

    state.batches.insert(batch.id, batch.clone());
    Ok(Json(batch))
}

async fn list_batches(State(state): State<Arc<AppState>>) -> Json<Vec<RouteBatch>> {
    let batches = state
        .batches
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(batches)
}

async fn close_batch(
    State(state): State<Arc<AppState>>,
    Path(id): Path<Uuid>,
) -> Result<Json<RouteBatch>, AppError> {
    let mut batch = state
        .batches
        .get_mut(&id)
        .ok_or_else(|| AppError::NotFound(format!("batch {id} not found")))?;

    batch.status = BatchStatus::Closed;
    Ok(Json(batch.clone()))
}
