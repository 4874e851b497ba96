pub mod batches;
pub mod drivers;
pub mod orders;
pub mod ws;
pub mod zones;

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::get;
use axum::Json;
use axum::Router;
use serde::Serialize;
use tower_http::cors::CorsLayer;

use crate::error::AppError;
use crate::models::actor::{Actor, Role};
use crate::models::order::OrderStatus;
use crate::state::AppState;

pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .merge(orders::router())
        .merge(drivers::router())
        .merge(zones::router())
        .merge(batches::router())
        .route("/health", get(health))
        .route("/metrics", get(metrics))
        .route("/ws", get(ws::ws_handler))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Capability facade over the lifecycle commands. Clients only create and
/// view their orders; drivers may advance orders but not void them.
pub(crate) fn authorize_command(
    actor: &Actor,
    target: Option<OrderStatus>,
) -> Result<(), AppError> {
    match actor.role {
        Role::Client => Err(AppError::Forbidden(
            "clients may only create and view orders".to_string(),
        )),
        Role::Driver if target == Some(OrderStatus::Voided) => Err(AppError::Forbidden(
            "voiding an order requires an admin".to_string(),
        )),
        _ => Ok(()),
    }
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
    orders: usize,
    drivers: usize,
    zones: usize,
    batches: usize,
    history_entries: usize,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        orders: state.orders.len(),
        drivers: state.drivers.len(),
        zones: state.zones.len(),
        batches: state.batches.len(),
        history_entries: state.history.total_entries(),
    })
}

async fn metrics(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.metrics.encode() {
        Ok(body) => (
            StatusCode::OK,
            [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
            body,
        )
            .into_response(),
        Err(err) => (StatusCode::INTERNAL_SERVER_ERROR, err).into_response(),
    }
}
