use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    Open,
    Closed,
}

/// Groups orders picked up within the same cutoff window for a given date.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteBatch {
    pub id: Uuid,
    pub pickup_date: NaiveDate,
    pub cutoff: String,
    pub status: BatchStatus,
    pub order_count: u32,
}
