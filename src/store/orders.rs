use std::sync::atomic::{AtomicU64, Ordering};

use chrono::{Datelike, Utc};
use dashmap::mapref::one::RefMut;
use dashmap::DashMap;

use crate::error::AppError;
use crate::models::order::{self, Order, OrderDraft, OrderStatus};

/// Durable record of every order, keyed by order number. The store is the
/// only owner of order records; the engine mutates them through `get_mut`,
/// which also serves as the per-order serialization point.
pub struct OrderStore {
    orders: DashMap<String, Order>,
    sequence: AtomicU64,
}

#[derive(Debug, Default, Clone)]
pub struct OrderFilter {
    pub status: Option<OrderStatus>,
    pub search: Option<String>,
}

impl OrderStore {
    pub fn new() -> Self {
        Self {
            orders: DashMap::new(),
            sequence: AtomicU64::new(1),
        }
    }

    /// Allocates the next order number for the current year. The sequence is
    /// process-monotonic, so numbers never collide.
    fn next_order_number(&self) -> String {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed);
        format!("ORD-{}-{:06}", Utc::now().year(), seq)
    }

    pub fn create(&self, draft: OrderDraft) -> Result<Order, AppError> {
        validate_draft(&draft)?;

        let order = Order {
            order_number: self.next_order_number(),
            total_weight_kg: order::total_weight(&draft.packages),
            distance_km: None,
            customer: draft.customer,
            delivery_address: draft.delivery_address,
            pickup_date: draft.pickup_date,
            packages: draft.packages,
            special_instructions: draft.special_instructions,
            status: OrderStatus::Pending,
            driver_id: None,
            zone_id: None,
            batch_id: None,
            void_info: None,
            created_by: draft.created_by.name,
            created_at: Utc::now(),
            assigned_at: None,
            picked_up_at: None,
            actual_delivery_time: None,
        };

        self.orders.insert(order.order_number.clone(), order.clone());
        Ok(order)
    }

    pub fn find_by_number(&self, order_number: &str) -> Result<Order, AppError> {
        self.orders
            .get(order_number)
            .map(|entry| entry.value().clone())
            .ok_or_else(|| AppError::NotFound(format!("order {order_number} not found")))
    }

    /// Mutable handle for the engine. Holding the returned guard blocks every
    /// other access to the same order, which is what serializes concurrent
    /// transitions per order number.
    pub fn get_mut(&self, order_number: &str) -> Result<RefMut<'_, String, Order>, AppError> {
        self.orders
            .get_mut(order_number)
            .ok_or_else(|| AppError::NotFound(format!("order {order_number} not found")))
    }

    pub fn list(&self, filter: &OrderFilter) -> Vec<Order> {
        let needle = filter.search.as_deref().map(str::to_lowercase);

        let mut matched: Vec<Order> = self
            .orders
            .iter()
            .filter(|entry| {
                let order = entry.value();
                let status_ok = filter.status.is_none_or(|s| order.status == s);
                let search_ok = needle.as_deref().is_none_or(|needle| {
                    order.customer.name.to_lowercase().contains(needle)
                        || order.order_number.to_lowercase().contains(needle)
                });
                status_ok && search_ok
            })
            .map(|entry| entry.value().clone())
            .collect();

        // Sequence numbers break ties between orders created in the same instant.
        matched.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.order_number.cmp(&a.order_number))
        });
        matched
    }

    pub fn len(&self) -> usize {
        self.orders.len()
    }

    pub fn is_empty(&self) -> bool {
        self.orders.is_empty()
    }
}

fn validate_draft(draft: &OrderDraft) -> Result<(), AppError> {
    let required = [
        ("customer name", &draft.customer.name),
        ("customer phone", &draft.customer.phone),
        ("address line1", &draft.delivery_address.line1),
        ("address city", &draft.delivery_address.city),
        ("address state", &draft.delivery_address.state),
        ("address zip", &draft.delivery_address.zip),
        ("address country", &draft.delivery_address.country),
    ];

    for (field, value) in required {
        if value.trim().is_empty() {
            return Err(AppError::Validation(format!("{field} is required")));
        }
    }

    if draft.packages.is_empty() {
        return Err(AppError::Validation(
            "order must contain at least one package".to_string(),
        ));
    }

    if draft.packages.iter().any(|p| p.quantity == 0) {
        return Err(AppError::Validation(
            "package quantity must be at least 1".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::{OrderFilter, OrderStore};
    use crate::models::actor::{Actor, Role};
    use crate::models::order::{Address, Customer, OrderDraft, OrderStatus, Package};

    fn draft(name: &str) -> OrderDraft {
        OrderDraft {
            customer: Customer {
                name: name.to_string(),
                phone: "+1-555-0100".to_string(),
                email: None,
            },
            delivery_address: Address {
                line1: "12 Harbor Way".to_string(),
                line2: None,
                city: "Hamburg".to_string(),
                state: "HH".to_string(),
                zip: "20457".to_string(),
                country: "DE".to_string(),
                location: None,
            },
            pickup_date: NaiveDate::from_ymd_opt(2026, 9, 1).unwrap(),
            packages: vec![Package {
                description: "parcel".to_string(),
                quantity: 1,
                weight_kg: Some(2.5),
                dimensions: None,
            }],
            special_instructions: None,
            created_by: Actor {
                name: "ops".to_string(),
                role: Role::Admin,
            },
        }
    }

    #[test]
    fn created_order_is_pending_and_unassigned() {
        let store = OrderStore::new();
        let order = store.create(draft("Ada")).unwrap();

        assert_eq!(order.status, OrderStatus::Pending);
        assert!(order.driver_id.is_none());
        assert!(order.zone_id.is_none());
        assert!(order.batch_id.is_none());
        assert!(order.order_number.starts_with("ORD-"));
    }

    #[test]
    fn order_numbers_are_unique() {
        let store = OrderStore::new();
        let a = store.create(draft("Ada")).unwrap();
        let b = store.create(draft("Bob")).unwrap();

        assert_ne!(a.order_number, b.order_number);
    }

    #[test]
    fn empty_package_list_is_rejected() {
        let store = OrderStore::new();
        let mut bad = draft("Ada");
        bad.packages.clear();

        assert!(store.create(bad).is_err());
    }

    #[test]
    fn missing_address_field_is_rejected() {
        let store = OrderStore::new();
        let mut bad = draft("Ada");
        bad.delivery_address.city = "  ".to_string();

        assert!(store.create(bad).is_err());
    }

    #[test]
    fn list_filters_by_status_and_search() {
        let store = OrderStore::new();
        let kept = store.create(draft("Ada Lovelace")).unwrap();
        store.create(draft("Bob")).unwrap();

        let filter = OrderFilter {
            status: Some(OrderStatus::Pending),
            search: Some("lovelace".to_string()),
        };
        let listed = store.list(&filter);

        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].order_number, kept.order_number);
    }

    #[test]
    fn list_is_newest_first() {
        let store = OrderStore::new();
        store.create(draft("First")).unwrap();
        let second = store.create(draft("Second")).unwrap();

        let listed = store.list(&OrderFilter::default());
        assert_eq!(listed.first().unwrap().order_number, second.order_number);
    }
}
