//! Order queries and detail edits

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveTime, TimeZone, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, Order, QueryFilter,
    QueryOrder, Set, prelude::DateTimeWithTimeZone,
};

use crate::entities::{order_items, orders, prelude::*};
use crate::error::LedgerError;
use crate::models::order::{OrderListQuery, OrderResponse, UpdateOrderRequest};
use crate::services::points_ledger::parse_status;

/// Orders matching `query`, newest first, each with its line items
pub async fn list_orders(
    db: &DatabaseConnection,
    query: &OrderListQuery,
) -> Result<Vec<OrderResponse>, LedgerError> {
    let mut select = Orders::find();

    if let Some(status) = query.status {
        select = select.filter(orders::Column::Status.eq(status.as_str()));
    }
    if let Some(driver_id) = query.driver_id {
        select = select.filter(orders::Column::DriverId.eq(driver_id));
    }
    if let Some(sponsor_id) = query.sponsor_id {
        select = select.filter(orders::Column::SponsorId.eq(sponsor_id));
    }
    if let Some(start) = query.start_date {
        select = select.filter(orders::Column::CreatedAt.gte(start_of_day(start)));
    }
    if let Some(end) = query.end_date {
        select = select.filter(orders::Column::CreatedAt.lt(start_of_next_day(end)));
    }

    let found = select
        .order_by(orders::Column::CreatedAt, Order::Desc)
        .order_by(orders::Column::OrderId, Order::Desc)
        .all(db)
        .await?;

    if found.is_empty() {
        return Ok(Vec::new());
    }

    let ids: Vec<i32> = found.iter().map(|o| o.order_id).collect();
    let mut items_by_order: HashMap<i32, Vec<order_items::Model>> = HashMap::new();
    for item in OrderItems::find()
        .filter(order_items::Column::OrderId.is_in(ids))
        .order_by_asc(order_items::Column::OrderItemId)
        .all(db)
        .await?
    {
        items_by_order.entry(item.order_id).or_default().push(item);
    }

    Ok(found
        .into_iter()
        .map(|order| {
            let items = items_by_order.remove(&order.order_id).unwrap_or_default();
            OrderResponse::from_parts(order, items)
        })
        .collect())
}

pub async fn get_order(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<OrderResponse, LedgerError> {
    let order = find_order(db, order_id).await?;
    let items = OrderItems::find()
        .filter(order_items::Column::OrderId.eq(order_id))
        .order_by_asc(order_items::Column::OrderItemId)
        .all(db)
        .await?;
    Ok(OrderResponse::from_parts(order, items))
}

pub async fn find_order(
    db: &DatabaseConnection,
    order_id: i32,
) -> Result<orders::Model, LedgerError> {
    Orders::find_by_id(order_id)
        .one(db)
        .await?
        .ok_or(LedgerError::OrderNotFound(order_id))
}

/// Set tracking number and/or notes.
///
/// Totals, driver and sponsor are immutable; DELIVERED and CANCELLED orders
/// cannot be edited at all.
pub async fn update_order_details(
    db: &DatabaseConnection,
    order_id: i32,
    update: &UpdateOrderRequest,
) -> Result<OrderResponse, LedgerError> {
    if update.tracking_number.is_none() && update.notes.is_none() {
        return Err(LedgerError::InvalidRequest(
            "No valid fields to update".to_string(),
        ));
    }

    let order = find_order(db, order_id).await?;
    let status = parse_status(&order)?;
    if status.is_terminal() {
        return Err(LedgerError::InvalidOrderState { order_id, status });
    }

    let mut active_model: orders::ActiveModel = order.into();
    if let Some(tracking) = &update.tracking_number {
        active_model.tracking_number = Set(Some(tracking.clone()));
    }
    if let Some(notes) = &update.notes {
        active_model.notes = Set(Some(notes.clone()));
    }
    active_model.updated_at = Set(Utc::now().fixed_offset());
    active_model.update(db).await?;

    get_order(db, order_id).await
}

pub(crate) fn start_of_day(date: NaiveDate) -> DateTimeWithTimeZone {
    Utc.from_utc_datetime(&date.and_time(NaiveTime::MIN))
        .fixed_offset()
}

pub(crate) fn start_of_next_day(date: NaiveDate) -> DateTimeWithTimeZone {
    let next = date.succ_opt().unwrap_or(NaiveDate::MAX);
    start_of_day(next)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_date_bounds_cover_whole_day() {
        let date = NaiveDate::from_ymd_opt(2026, 3, 31).unwrap();
        assert_eq!(start_of_day(date).to_rfc3339(), "2026-03-31T00:00:00+00:00");
        assert_eq!(start_of_next_day(date).to_rfc3339(), "2026-04-01T00:00:00+00:00");
    }
}
