use dashmap::DashMap;

use crate::models::history::StatusHistoryEntry;

/// Append-only ledger of status transitions. Entries are never overwritten
/// or reordered; `list_for` returns them in insertion order.
pub struct HistoryLog {
    entries: DashMap<String, Vec<StatusHistoryEntry>>,
}

impl HistoryLog {
    pub fn new() -> Self {
        Self {
            entries: DashMap::new(),
        }
    }

    pub fn record(&self, entry: StatusHistoryEntry) {
        self.entries
            .entry(entry.order_number.clone())
            .or_default()
            .push(entry);
    }

    pub fn list_for(&self, order_number: &str) -> Vec<StatusHistoryEntry> {
        self.entries
            .get(order_number)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    pub fn total_entries(&self) -> usize {
        self.entries.iter().map(|entry| entry.value().len()).sum()
    }
}

impl Default for HistoryLog {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::HistoryLog;
    use crate::models::actor::{Actor, Role};
    use crate::models::history::StatusHistoryEntry;
    use crate::models::order::OrderStatus;

    fn entry(number: &str, status: OrderStatus) -> StatusHistoryEntry {
        StatusHistoryEntry {
            order_number: number.to_string(),
            status,
            actor: Actor {
                name: "ops".to_string(),
                role: Role::Admin,
            },
            notes: None,
            recorded_at: Utc::now(),
        }
    }

    #[test]
    fn entries_come_back_in_insertion_order() {
        let log = HistoryLog::new();
        log.record(entry("ORD-2026-000001", OrderStatus::Pending));
        log.record(entry("ORD-2026-000001", OrderStatus::Assigned));
        log.record(entry("ORD-2026-000002", OrderStatus::Pending));

        let listed = log.list_for("ORD-2026-000001");
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].status, OrderStatus::Pending);
        assert_eq!(listed[1].status, OrderStatus::Assigned);
    }

    #[test]
    fn unknown_order_has_empty_history() {
        let log = HistoryLog::new();
        assert!(log.list_for("ORD-2026-999999").is_empty());
    }
}
