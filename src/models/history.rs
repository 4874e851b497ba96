use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::models::actor::Actor;
use crate::models::order::OrderStatus;

/// Immutable audit record of one transition. Never mutated or deleted after
/// creation.
#[derive(Debug, Clone, Serialize)]
pub struct StatusHistoryEntry {
    pub order_number: String,
    pub status: OrderStatus,
    pub actor: Actor,
    pub notes: Option<String>,
    pub recorded_at: DateTime<Utc>,
}
