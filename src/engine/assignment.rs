use tracing::info;
use uuid::Uuid;

use crate::engine::transition;
use crate::error::AppError;
use crate::geo;
use crate::models::actor::Actor;
use crate::models::batch::BatchStatus;
use crate::models::driver::DriverStatus;
use crate::models::order::{Order, OrderStatus};
use crate::state::AppState;

/// Associates an available driver with an order and resolves its zone.
/// A `pending` order is moved to `assigned` in the same operation, under the
/// same order lock as the association itself.
pub fn assign_driver(
    state: &AppState,
    order_number: &str,
    driver_id: Uuid,
    actor: Actor,
) -> Result<Order, AppError> {
    let driver = state
        .drivers
        .get(&driver_id)
        .map(|entry| entry.value().clone())
        .ok_or_else(|| AppError::NotFound(format!("driver {driver_id} not found")))?;

    if driver.status != DriverStatus::Available {
        return Err(AppError::DriverUnavailable(driver.name));
    }

    let mut order = state.orders.get_mut(order_number)?;

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Assigned) {
        return Err(AppError::InvalidState(format!(
            "cannot assign a driver while order is {}",
            order.status.as_str()
        )));
    }

    // Resolve the zone before touching the order, so a failure leaves it
    // completely unchanged.
    let location = order.delivery_address.location;
    let zone_id = match order.zone_id {
        Some(zone_id) => zone_id,
        None => location
            .as_ref()
            .and_then(|point| geo::resolve_zone(&state.zones, point))
            .ok_or(AppError::UnresolvedZone)?,
    };

    order.driver_id = Some(driver_id);
    order.zone_id = Some(zone_id);

    if order.distance_km.is_none() {
        if let (Some(point), Some(zone)) = (location, state.zones.get(&zone_id)) {
            order.distance_km = Some(geo::haversine_km(&zone.center, &point));
        }
    }

    let event = if order.status == OrderStatus::Pending {
        Some(transition::commit(
            order.value_mut(),
            OrderStatus::Assigned,
            actor,
            None,
            &state.history,
        )?)
    } else {
        None
    };

    let updated = order.clone();
    drop(order);

    if let Some(entry) = event {
        let _ = state.history_events_tx.send(entry);
        state
            .metrics
            .transitions_total
            .with_label_values(&[OrderStatus::Assigned.as_str(), "success"])
            .inc();
    }

    info!(order_number, driver_id = %driver_id, zone_id = %zone_id, "driver assigned");
    Ok(updated)
}

/// Adds an order to a route batch. Only valid before pickup; moving an order
/// between batches releases its slot in the previous one.
pub fn assign_to_batch(
    state: &AppState,
    order_number: &str,
    batch_id: Uuid,
) -> Result<Order, AppError> {
    let mut order = state.orders.get_mut(order_number)?;

    if !matches!(order.status, OrderStatus::Pending | OrderStatus::Assigned) {
        return Err(AppError::InvalidState(format!(
            "cannot batch an order once it is {}",
            order.status.as_str()
        )));
    }

    if order.batch_id == Some(batch_id) {
        return Ok(order.clone());
    }

    {
        let mut batch = state
            .batches
            .get_mut(&batch_id)
            .ok_or_else(|| AppError::NotFound(format!("batch {batch_id} not found")))?;

        if batch.status == BatchStatus::Closed {
            return Err(AppError::BatchClosed(batch_id.to_string()));
        }
        batch.order_count += 1;
    }

    // Never hold two batch guards at once.
    if let Some(previous) = order.batch_id {
        if let Some(mut previous_batch) = state.batches.get_mut(&previous) {
            previous_batch.order_count = previous_batch.order_count.saturating_sub(1);
        }
    }

    order.batch_id = Some(batch_id);

    info!(order_number, batch_id = %batch_id, "order batched");
    Ok(order.clone())
}
