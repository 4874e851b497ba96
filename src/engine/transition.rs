use chrono::Utc;
use tracing::info;

use crate::error::AppError;
use crate::models::actor::Actor;
use crate::models::history::StatusHistoryEntry;
use crate::models::order::{Order, OrderDraft, OrderStatus, VoidInfo};
use crate::state::AppState;
use crate::store::history::HistoryLog;

/// Legal edges of the status graph. `delivered` and `voided` are terminal.
pub fn allowed_targets(from: OrderStatus) -> &'static [OrderStatus] {
    match from {
        OrderStatus::Pending => &[OrderStatus::Assigned, OrderStatus::Voided],
        OrderStatus::Assigned => &[OrderStatus::PickedUp, OrderStatus::Voided],
        OrderStatus::PickedUp => &[
            OrderStatus::InTransit,
            OrderStatus::Delivered,
            OrderStatus::Voided,
        ],
        OrderStatus::InTransit => &[OrderStatus::Delivered, OrderStatus::Voided],
        OrderStatus::Delivered | OrderStatus::Voided => &[],
    }
}

pub fn is_legal(from: OrderStatus, to: OrderStatus) -> bool {
    allowed_targets(from).contains(&to)
}

/// Creates an order in `pending` state. Creation is not a transition, so
/// nothing is appended to history; the ledger counts applied transitions
/// only.
pub fn create_order(state: &AppState, draft: OrderDraft) -> Result<Order, AppError> {
    let order = state.orders.create(draft)?;

    state.metrics.orders_created_total.inc();
    state.metrics.active_orders.inc();

    info!(order_number = %order.order_number, "order created");
    Ok(order)
}

/// Validates and applies one transition while the caller holds the order's
/// store entry, so the status update and the history append commit together.
pub(crate) fn commit(
    order: &mut Order,
    target: OrderStatus,
    actor: Actor,
    notes: Option<String>,
    history: &HistoryLog,
) -> Result<StatusHistoryEntry, AppError> {
    let from = order.status;
    if !is_legal(from, target) {
        return Err(AppError::IllegalTransition { from, to: target });
    }

    let now = Utc::now();
    match target {
        OrderStatus::Assigned => order.assigned_at = Some(now),
        OrderStatus::PickedUp => order.picked_up_at = Some(now),
        OrderStatus::Delivered => order.actual_delivery_time = Some(now),
        OrderStatus::Voided => {
            order.void_info = Some(VoidInfo {
                reason: notes.clone(),
                voided_by: actor.name.clone(),
                voided_at: now,
            });
        }
        OrderStatus::InTransit | OrderStatus::Pending => {}
    }
    order.status = target;

    let entry = StatusHistoryEntry {
        order_number: order.order_number.clone(),
        status: target,
        actor,
        notes,
        recorded_at: now,
    };
    history.record(entry.clone());
    Ok(entry)
}

pub fn apply_transition(
    state: &AppState,
    order_number: &str,
    target: OrderStatus,
    actor: Actor,
    notes: Option<String>,
) -> Result<Order, AppError> {
    let result = transition_inner(state, order_number, target, actor, notes);

    let outcome = if result.is_ok() { "success" } else { "error" };
    state
        .metrics
        .transitions_total
        .with_label_values(&[target.as_str(), outcome])
        .inc();

    result
}

fn transition_inner(
    state: &AppState,
    order_number: &str,
    target: OrderStatus,
    actor: Actor,
    notes: Option<String>,
) -> Result<Order, AppError> {
    let mut order = state.orders.get_mut(order_number)?;
    let from = order.status;

    let entry = commit(order.value_mut(), target, actor, notes, &state.history)?;
    let updated = order.clone();
    drop(order);

    let _ = state.history_events_tx.send(entry);
    if target.is_terminal() {
        state.metrics.active_orders.dec();
    }

    info!(
        order_number,
        from = from.as_str(),
        to = target.as_str(),
        "order transitioned"
    );
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::{allowed_targets, apply_transition, create_order, is_legal};
    use crate::error::AppError;
    use crate::models::actor::{Actor, Role};
    use crate::models::order::OrderStatus;
    use crate::state::AppState;
    use crate::test_support::draft;

    fn actor() -> Actor {
        Actor {
            name: "dispatcher".to_string(),
            role: Role::Admin,
        }
    }

    #[test]
    fn terminal_states_have_no_outgoing_edges() {
        assert!(allowed_targets(OrderStatus::Delivered).is_empty());
        assert!(allowed_targets(OrderStatus::Voided).is_empty());
    }

    #[test]
    fn void_is_reachable_from_every_active_state() {
        for from in [
            OrderStatus::Pending,
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::InTransit,
        ] {
            assert!(is_legal(from, OrderStatus::Voided));
        }
    }

    #[test]
    fn nothing_transitions_back_to_pending() {
        for from in [
            OrderStatus::Pending,
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
            OrderStatus::Voided,
        ] {
            assert!(!is_legal(from, OrderStatus::Pending));
        }
    }

    #[test]
    fn creation_appends_no_history_entry() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();

        assert!(state.history.list_for(&order.order_number).is_empty());
    }

    #[test]
    fn skipping_a_state_is_rejected() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();

        let err = apply_transition(
            &state,
            &order.order_number,
            OrderStatus::Delivered,
            actor(),
            None,
        )
        .unwrap_err();

        assert!(matches!(err, AppError::IllegalTransition { .. }));
        assert_eq!(
            state.orders.find_by_number(&order.order_number).unwrap().status,
            OrderStatus::Pending
        );
    }

    #[test]
    fn unknown_order_is_not_found() {
        let state = AppState::new(16);
        let err = apply_transition(&state, "ORD-2026-000042", OrderStatus::Voided, actor(), None)
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }

    #[test]
    fn history_length_equals_successful_transition_count() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();
        let number = order.order_number.clone();

        apply_transition(&state, &number, OrderStatus::Assigned, actor(), None).unwrap();
        assert_eq!(state.history.list_for(&number).len(), 1);

        apply_transition(&state, &number, OrderStatus::PickedUp, actor(), None).unwrap();
        assert_eq!(state.history.list_for(&number).len(), 2);

        apply_transition(&state, &number, OrderStatus::Delivered, actor(), None).unwrap();
        assert_eq!(state.history.list_for(&number).len(), 3);
    }

    #[test]
    fn failed_transition_appends_nothing() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();
        let number = order.order_number.clone();

        let _ = apply_transition(&state, &number, OrderStatus::InTransit, actor(), None);
        assert!(state.history.list_for(&number).is_empty());
    }

    #[test]
    fn voided_order_never_transitions_again() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();
        let number = order.order_number.clone();

        apply_transition(
            &state,
            &number,
            OrderStatus::Voided,
            actor(),
            Some("customer cancelled".to_string()),
        )
        .unwrap();

        for target in [
            OrderStatus::Assigned,
            OrderStatus::PickedUp,
            OrderStatus::InTransit,
            OrderStatus::Delivered,
            OrderStatus::Voided,
        ] {
            let err = apply_transition(&state, &number, target, actor(), None).unwrap_err();
            assert!(matches!(err, AppError::IllegalTransition { .. }));
        }
    }

    #[test]
    fn void_captures_reason_and_actor() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();

        let voided = apply_transition(
            &state,
            &order.order_number,
            OrderStatus::Voided,
            actor(),
            Some("damaged in warehouse".to_string()),
        )
        .unwrap();

        let info = voided.void_info.unwrap();
        assert_eq!(info.voided_by, "dispatcher");
        assert_eq!(info.reason.as_deref(), Some("damaged in warehouse"));
    }

    #[test]
    fn delivery_sets_actual_delivery_time() {
        let state = AppState::new(16);
        let order = create_order(&state, draft("Ada")).unwrap();
        let number = order.order_number.clone();

        apply_transition(&state, &number, OrderStatus::Assigned, actor(), None).unwrap();
        apply_transition(&state, &number, OrderStatus::PickedUp, actor(), None).unwrap();
        let delivered =
            apply_transition(&state, &number, OrderStatus::Delivered, actor(), None).unwrap();

        assert!(delivered.actual_delivery_time.is_some());
        assert!(delivered.picked_up_at.is_some());
        assert!(delivered.assigned_at.is_some());
    }
}
