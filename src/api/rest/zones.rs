use std::sync::Arc;

use axum::extract::State;
use axum::routing::post;
use axum::Json;
use axum::Router;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::driver::GeoPoint;
use crate::models::zone::Zone;
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/zones", post(create_zone).get(list_zones))
}

#[derive(Deserialize)]
pub struct CreateZoneRequest {
    pub name: String,
    pub center: GeoPoint,
    pub radius_km: f64,
}

async fn create_zone(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CreateZoneRequest>,
) -> Result<Json<Zone>, AppError> {
    if payload.name.trim().is_empty() {
        return Err(AppError::Validation("name cannot be empty".to_string()));
    }

    if payload.radius_km <= 0.0 {
        return Err(AppError::Validation("radius_km must be > 0".to_string()));
    }

    let zone = Zone {
        id: Uuid::new_v4(),
        name: payload.name,
        center: payload.center,
        radius_km: payload.radius_km,
    };

    state.zones.insert(zone.id, zone.clone());
    Ok(Json(zone))
}

async fn list_zones(State(state): State<Arc<AppState>>) -> Json<Vec<Zone>> {
    let zones = state
        .zones
        .iter()
        .map(|entry| entry.value().clone())
        .collect();
    Json(zones)
}
