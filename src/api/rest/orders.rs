use std::sync::Arc;

use axum::extract::{Path, Query, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::rest::authorize_command;
use crate::engine::{assignment, transition};
use crate::error::AppError;
use crate::models::actor::Actor;
use crate::models::history::StatusHistoryEntry;
use crate::models::order::{Order, OrderDraft, OrderStatus};
use crate::state::AppState;
use crate::store::orders::OrderFilter;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/orders", post(create_order).get(list_orders))
        .route("/orders/:number", get(get_order))
        .route("/orders/:number/transition", post(transition_order))
        .route("/orders/:number/assign", post(assign_driver))
        .route("/orders/:number/batch", post(assign_to_batch))
        .route("/orders/:number/history", get(get_history))
}

async fn create_order(
    State(state): State<Arc<AppState>>,
    Json(draft): Json<OrderDraft>,
) -> Result<Json<Order>, AppError> {
    let order = transition::create_order(&state, draft)?;
    Ok(Json(order))
}

#[derive(Deserialize)]
struct ListParams {
    status: Option<OrderStatus>,
    search: Option<String>,
}

async fn list_orders(
    State(state): State<Arc<AppState>>,
    Query(params): Query<ListParams>,
) -> Json<Vec<Order>> {
    let filter = OrderFilter {
        status: params.status,
        search: params.search,
    };
    Json(state.orders.list(&filter))
}

async fn get_order(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Order>, AppError> {
    Ok(Json(state.orders.find_by_number(&number)?))
}

#[derive(Deserialize)]
struct TransitionRequest {
    target: OrderStatus,
    actor: Actor,
    notes: Option<String>,
}

async fn transition_order(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
    Json(req): Json<TransitionRequest>,
) -> Result<Json<Order>, AppError> {
    authorize_command(&req.actor, Some(req.target))?;
    let order = transition::apply_transition(&state, &number, req.target, req.actor, req.notes)?;
    Ok(Json(order))
}

#[derive(Deserialize)]
struct AssignRequest {
    driver_id: Uuid,
    actor: Actor,
}

async fn assign_driver(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
    Json(req): Json<AssignRequest>,
) -> Result<Json<Order>, AppError> {
    authorize_command(&req.actor, None)?;
    let order = assignment::assign_driver(&state, &number, req.driver_id, req.actor)?;
    Ok(Json(order))
}

#[derive(Deserialize)]
struct BatchRequest {
    batch_id: Uuid,
    actor: Actor,
}

async fn assign_to_batch(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
    Json(req): Json<BatchRequest>,
) -> Result<Json<Order>, AppError> {
    authorize_command(&req.actor, None)?;
    let order = assignment::assign_to_batch(&state, &number, req.batch_id)?;
    Ok(Json(order))
}

async fn get_history(
    State(state): State<Arc<AppState>>,
    Path(number): Path<String>,
) -> Result<Json<Vec<StatusHistoryEntry>>, AppError> {
    // 404 for unknown orders rather than an empty ledger
    state.orders.find_by_number(&number)?;
    Ok(Json(state.history.list_for(&number)))
}
