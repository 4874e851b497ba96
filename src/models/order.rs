use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::actor::Actor;
use crate::models::driver::GeoPoint;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Assigned,
    PickedUp,
    InTransit,
    Delivered,
    Voided,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Voided)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Assigned => "assigned",
            OrderStatus::PickedUp => "picked_up",
            OrderStatus::InTransit => "in_transit",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Voided => "voided",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    pub name: String,
    pub phone: String,
    pub email: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Address {
    pub line1: String,
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub zip: String,
    pub country: String,
    /// Coordinates supplied by the upstream geocoding collaborator, if any.
    pub location: Option<GeoPoint>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Package {
    pub description: String,
    pub quantity: u32,
    pub weight_kg: Option<f64>,
    pub dimensions: Option<String>,
}

/// Incoming order payload, validated once at the store boundary.
#[derive(Debug, Clone, Deserialize)]
pub struct OrderDraft {
    pub customer: Customer,
    pub delivery_address: Address,
    pub pickup_date: NaiveDate,
    pub packages: Vec<Package>,
    pub special_instructions: Option<String>,
    pub created_by: Actor,
}

#[derive(Debug, Clone, Serialize)]
pub struct VoidInfo {
    pub reason: Option<String>,
    pub voided_by: String,
    pub voided_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Order {
    pub order_number: String,
    pub customer: Customer,
    pub delivery_address: Address,
    pub pickup_date: NaiveDate,
    pub packages: Vec<Package>,
    pub total_weight_kg: f64,
    /// Zone center to delivery point, filled in once the zone is resolved.
    pub distance_km: Option<f64>,
    pub special_instructions: Option<String>,
    pub status: OrderStatus,
    pub driver_id: Option<Uuid>,
    pub zone_id: Option<Uuid>,
    pub batch_id: Option<Uuid>,
    pub void_info: Option<VoidInfo>,
    pub created_by: String,
    pub created_at: DateTime<Utc>,
    pub assigned_at: Option<DateTime<Utc>>,
    pub picked_up_at: Option<DateTime<Utc>>,
    pub actual_delivery_time: Option<DateTime<Utc>>,
}

pub fn total_weight(packages: &[Package]) -> f64 {
    packages
        .iter()
        .map(|p| p.weight_kg.unwrap_or(0.0) * f64::from(p.quantity))
        .sum()
}
