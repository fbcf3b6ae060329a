//! Points ledger
//!
//! Sequences each balance change with its audit trail and side effects as one
//! all-or-nothing database transaction. A transaction that is dropped before
//! `commit` rolls back, so every early return leaves no partial state.

use std::sync::Arc;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, DatabaseConnection, DatabaseTransaction, EntityTrait, QuerySelect, Select,
    Set, TransactionTrait,
};
use tracing::info;

use crate::entities::{driver_balance_changes, orders, prelude::*};
use crate::error::LedgerError;
use crate::models::alert::AlertType;
use crate::models::ledger::AwardReceipt;
use crate::models::order::{
    CartItem, OrderStatus, PurchaseReceipt, RefundReceipt, TransitionReceipt,
};
use crate::models::points::Points;
use crate::services::cart::price_cart;
use crate::services::directory::driver_user_id;
use crate::services::ledger_store;
use crate::services::notifier::{Notifier, notify_best_effort};
use crate::services::order_recorder::{PurchaseRecord, record_purchase};

#[derive(Clone)]
pub struct PointsLedger {
    db: DatabaseConnection,
    notifier: Arc<dyn Notifier>,
}

impl PointsLedger {
    pub fn new(db: DatabaseConnection, notifier: Arc<dyn Notifier>) -> Self {
        Self { db, notifier }
    }

    pub fn notifier(&self) -> &dyn Notifier {
        self.notifier.as_ref()
    }

    /// Current balance of an ACTIVE driver/sponsor link
    pub async fn get_balance(&self, driver_id: i32, sponsor_id: i32) -> Result<Points, LedgerError> {
        ledger_store::get_balance(&self.db, driver_id, sponsor_id).await
    }

    /// Award (or, with a negative value, deduct) sponsor points.
    ///
    /// Deductions never overdraw: one that would leave the balance below zero
    /// fails with `InsufficientBalance`.
    pub async fn award(
        &self,
        driver_id: i32,
        sponsor_id: i32,
        points: Points,
        reason: &str,
        actor_id: i32,
    ) -> Result<AwardReceipt, LedgerError> {
        if points.is_zero() {
            return Err(LedgerError::InvalidAmount(
                "point change must not be zero".to_string(),
            ));
        }

        let txn = self.db.begin().await?;

        let adjustment =
            ledger_store::adjust_balance(&txn, driver_id, sponsor_id, points, !points.is_negative())
                .await?;

        append_balance_change(
            &txn,
            driver_id,
            sponsor_id,
            reason,
            points,
            adjustment.new_balance,
            Some(actor_id),
        )
        .await?;

        if let Some(user_id) = driver_user_id(&txn, driver_id).await? {
            let verb = if points.is_negative() { "deducted from" } else { "added to" };
            let details = format!(
                "{} points have been {} your balance. Reason: {}",
                points.value().abs(),
                verb,
                reason
            );
            notify_best_effort(self.notifier(), &txn, user_id, AlertType::Points, &details).await;
        }

        txn.commit().await?;

        info!(
            driver_id,
            sponsor_id,
            points = points.value(),
            balance = adjustment.new_balance.value(),
            actor_id,
            "Points awarded"
        );

        Ok(AwardReceipt {
            driver_id,
            sponsor_id,
            points_change: points,
            previous_balance: adjustment.previous_balance,
            new_balance: adjustment.new_balance,
        })
    }

    /// Spend points on a cart.
    ///
    /// Deducts the exact cart total and records the order, its items, one
    /// transaction row per line, the balance log entry and the driver alert.
    /// On `InsufficientBalance` nothing is written.
    pub async fn purchase(
        &self,
        driver_id: i32,
        sponsor_id: i32,
        items: &[CartItem],
    ) -> Result<PurchaseReceipt, LedgerError> {
        let cart = price_cart(items)?;
        let debit = cart
            .total
            .checked_neg()
            .ok_or_else(|| LedgerError::InvalidAmount("cart total out of range".to_string()))?;

        let txn = self.db.begin().await?;

        let adjustment =
            ledger_store::adjust_balance(&txn, driver_id, sponsor_id, debit, false).await?;

        let user_id = driver_user_id(&txn, driver_id)
            .await?
            .ok_or(LedgerError::LinkNotFound {
                driver_id,
                sponsor_id,
            })?;

        let order = record_purchase(
            &txn,
            PurchaseRecord {
                driver_id,
                sponsor_id,
                driver_sponsor_id: adjustment.driver_sponsor_id,
                user_id,
                cart: &cart,
            },
        )
        .await?;

        append_balance_change(
            &txn,
            driver_id,
            sponsor_id,
            &format!("Purchase: order #{}", order.order_id),
            debit,
            adjustment.new_balance,
            Some(user_id),
        )
        .await?;

        let details = format!(
            "Your order #{} has been placed for {} points.",
            order.order_id,
            cart.total.value()
        );
        notify_best_effort(self.notifier(), &txn, user_id, AlertType::Order, &details).await;

        txn.commit().await?;

        info!(
            driver_id,
            sponsor_id,
            order_id = order.order_id,
            total_points = cart.total.value(),
            balance = adjustment.new_balance.value(),
            "Purchase completed"
        );

        Ok(PurchaseReceipt {
            order_id: order.order_id,
            total_points: cart.total,
            total_dollars: cart.total.to_dollars(),
            previous_balance: adjustment.previous_balance,
            new_balance: adjustment.new_balance,
        })
    }

    /// Cancel a PENDING order and return its points to the driver
    pub async fn refund(
        &self,
        order_id: i32,
        reason: &str,
        actor_id: i32,
    ) -> Result<RefundReceipt, LedgerError> {
        let txn = self.db.begin().await?;

        let order = lock_order(&txn, order_id).await?;
        let status = parse_status(&order)?;
        if !status.is_refundable() {
            return Err(LedgerError::InvalidOrderState { order_id, status });
        }

        let refunded = Points::new(order.total_points);
        let adjustment =
            ledger_store::credit_any_status(&txn, order.driver_id, order.sponsor_id, refunded)
                .await?;

        append_balance_change(
            &txn,
            order.driver_id,
            order.sponsor_id,
            &format!("Order #{} cancelled: {}", order_id, reason),
            refunded,
            adjustment.new_balance,
            Some(actor_id),
        )
        .await?;

        let cancel_note = match &order.notes {
            Some(notes) if !notes.is_empty() => format!("{}\nCancelled: {}", notes, reason),
            _ => format!("Cancelled: {}", reason),
        };
        let driver_id = order.driver_id;
        let sponsor_id = order.sponsor_id;

        let mut active_model: orders::ActiveModel = order.into();
        active_model.status = Set(OrderStatus::Cancelled.as_str().to_string());
        active_model.notes = Set(Some(cancel_note));
        active_model.updated_at = Set(Utc::now().fixed_offset());
        active_model.update(&txn).await?;

        if let Some(user_id) = driver_user_id(&txn, driver_id).await? {
            let details = format!(
                "Order #{} has been cancelled. {} points have been refunded to your account.",
                order_id,
                refunded.value()
            );
            notify_best_effort(self.notifier(), &txn, user_id, AlertType::Order, &details).await;
        }

        txn.commit().await?;

        info!(
            order_id,
            driver_id,
            sponsor_id,
            refunded_points = refunded.value(),
            actor_id,
            "Order refunded"
        );

        Ok(RefundReceipt {
            order_id,
            refunded_points: refunded,
            new_balance: adjustment.new_balance,
        })
    }

    /// Move an order along its status graph.
    ///
    /// The driver alert is best-effort: if it cannot be written the
    /// transition still commits and `alert_delivered` is false.
    pub async fn transition_order(
        &self,
        order_id: i32,
        new_status: OrderStatus,
    ) -> Result<TransitionReceipt, LedgerError> {
        let txn = self.db.begin().await?;

        let order = lock_order(&txn, order_id).await?;
        let previous_status = parse_status(&order)?;
        if !previous_status.can_transition_to(new_status) {
            return Err(LedgerError::InvalidTransition {
                from: previous_status.to_string(),
                to: new_status.to_string(),
            });
        }

        let driver_id = order.driver_id;
        let details = new_status.alert_message(order_id, order.tracking_number.as_deref());

        let mut active_model: orders::ActiveModel = order.into();
        active_model.status = Set(new_status.as_str().to_string());
        active_model.updated_at = Set(Utc::now().fixed_offset());
        active_model.update(&txn).await?;

        let alert_delivered = match driver_user_id(&txn, driver_id).await? {
            Some(user_id) => {
                notify_best_effort(self.notifier(), &txn, user_id, AlertType::Order, &details)
                    .await
            }
            None => false,
        };

        txn.commit().await?;

        info!(
            order_id,
            from = %previous_status,
            to = %new_status,
            alert_delivered,
            "Order status updated"
        );

        Ok(TransitionReceipt {
            order_id,
            previous_status,
            new_status,
            alert_delivered,
        })
    }
}

async fn lock_order(txn: &DatabaseTransaction, order_id: i32) -> Result<orders::Model, LedgerError> {
    order_lock_query(order_id)
        .one(txn)
        .await?
        .ok_or(LedgerError::OrderNotFound(order_id))
}

fn order_lock_query(order_id: i32) -> Select<Orders> {
    Orders::find_by_id(order_id).lock_exclusive()
}

pub(crate) fn parse_status(order: &orders::Model) -> Result<OrderStatus, LedgerError> {
    order
        .status
        .parse()
        .map_err(|_| LedgerError::corrupt("order status", &order.status))
}

async fn append_balance_change(
    txn: &DatabaseTransaction,
    driver_id: i32,
    sponsor_id: i32,
    reason: &str,
    points_change: Points,
    balance_after: Points,
    actor_id: Option<i32>,
) -> Result<(), LedgerError> {
    driver_balance_changes::ActiveModel {
        driver_id: Set(driver_id),
        sponsor_id: Set(sponsor_id),
        reason: Set(reason.to_string()),
        points_change: Set(points_change.value()),
        balance_after: Set(balance_after.value()),
        actor_id: Set(actor_id),
        created_at: Set(Utc::now().fixed_offset()),
        ..Default::default()
    }
    .insert(txn)
    .await?;
    Ok(())
}
