use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::driver::GeoPoint;

/// Geographic partition used to route orders to drivers. Static reference
/// data; created once and rarely mutated.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Zone {
    pub id: Uuid,
    pub name: String,
    pub center: GeoPoint,
    pub radius_km: f64,
}
