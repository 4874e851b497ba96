use dashmap::DashMap;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::batch::RouteBatch;
use crate::models::driver::Driver;
use crate::models::history::StatusHistoryEntry;
use crate::models::zone::Zone;
use crate::observability::metrics::Metrics;
use crate::store::history::HistoryLog;
use crate::store::orders::OrderStore;

pub struct AppState {
    pub orders: OrderStore,
    pub history: HistoryLog,
    pub drivers: DashMap<Uuid, Driver>,
    pub zones: DashMap<Uuid, Zone>,
    pub batches: DashMap<Uuid, RouteBatch>,
    pub history_events_tx: broadcast::Sender<StatusHistoryEntry>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(event_buffer_size: usize) -> Self {
        let (history_events_tx, _unused_rx) = broadcast::channel(event_buffer_size);

        Self {
            orders: OrderStore::new(),
            history: HistoryLog::new(),
            drivers: DashMap::new(),
            zones: DashMap::new(),
            batches: DashMap::new(),
            history_events_tx,
            metrics: Metrics::new(),
        }
    }
}
