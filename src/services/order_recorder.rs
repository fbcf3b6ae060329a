//! Persists an order, its line items and the per-item transaction rows.
//!
//! Only reachable from the points ledger, which calls it inside the same
//! transaction that deducted the balance.

use chrono::Utc;
use sea_orm::{ActiveModelTrait, DatabaseTransaction, DbErr, EntityTrait, Set};

use crate::entities::{order_items, orders, prelude::*, transactions};
use crate::models::order::OrderStatus;
use crate::services::cart::PricedCart;

pub(crate) struct PurchaseRecord<'a> {
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub driver_sponsor_id: i32,
    /// Account charged on the transaction rows
    pub user_id: i32,
    pub cart: &'a PricedCart,
}

pub(crate) async fn record_purchase(
    txn: &DatabaseTransaction,
    record: PurchaseRecord<'_>,
) -> Result<orders::Model, DbErr> {
    let now = Utc::now().fixed_offset();

    let order = orders::ActiveModel {
        driver_id: Set(record.driver_id),
        sponsor_id: Set(record.sponsor_id),
        total_points: Set(record.cart.total.value()),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        tracking_number: Set(None),
        notes: Set(None),
        created_at: Set(now),
        updated_at: Set(now),
        ..Default::default()
    }
    .insert(txn)
    .await?;

    let items = record.cart.lines.iter().map(|line| order_items::ActiveModel {
        order_id: Set(order.order_id),
        product_id: Set(line.product_id.0.clone()),
        quantity: Set(line.quantity),
        points_per_item: Set(line.points_per_item.value()),
        ..Default::default()
    });
    OrderItems::insert_many(items).exec(txn).await?;

    let ledger_rows = record.cart.lines.iter().map(|line| transactions::ActiveModel {
        date: Set(now),
        user_id: Set(record.user_id),
        amount: Set(-line.line_total.value()),
        item_id: Set(line.product_id.0.clone()),
        driver_sponsor_id: Set(record.driver_sponsor_id),
        ..Default::default()
    });
    Transactions::insert_many(ledger_rows).exec(txn).await?;

    Ok(order)
}
