//! Order status state machine and order request/response models
//!
//! Status progresses: PENDING → PROCESSING → SHIPPED → DELIVERED
//!                          ↘ CANCELLED  ↘ CANCELLED

use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::entities::{order_items, orders};
use crate::models::points::Points;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderStatus {
    Pending,
    Processing,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Processing => "PROCESSING",
            OrderStatus::Shipped => "SHIPPED",
            OrderStatus::Delivered => "DELIVERED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        matches!(
            (self, next),
            (OrderStatus::Pending, OrderStatus::Processing)
                | (OrderStatus::Pending, OrderStatus::Cancelled)
                | (OrderStatus::Processing, OrderStatus::Shipped)
                | (OrderStatus::Processing, OrderStatus::Cancelled)
                | (OrderStatus::Shipped, OrderStatus::Delivered)
        )
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Delivered | OrderStatus::Cancelled)
    }

    /// Only orders nobody has started working on can be refunded
    pub fn is_refundable(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Driver-facing alert text for an order entering this status
    pub fn alert_message(&self, order_id: i32, tracking_number: Option<&str>) -> String {
        match self {
            OrderStatus::Pending => format!("Your order #{} has been placed.", order_id),
            OrderStatus::Processing => format!("Your order #{} is now being processed.", order_id),
            OrderStatus::Shipped => match tracking_number {
                Some(tracking) => format!(
                    "Your order #{} has been shipped! Tracking: {}",
                    order_id, tracking
                ),
                None => format!("Your order #{} has been shipped!", order_id),
            },
            OrderStatus::Delivered => format!("Your order #{} has been delivered!", order_id),
            OrderStatus::Cancelled => format!("Your order #{} has been cancelled.", order_id),
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "PENDING" => Ok(OrderStatus::Pending),
            "PROCESSING" => Ok(OrderStatus::Processing),
            "SHIPPED" => Ok(OrderStatus::Shipped),
            "DELIVERED" => Ok(OrderStatus::Delivered),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            _ => Err(format!("Unknown order status: {}", s)),
        }
    }
}

/// Catalog product id, accepted as either a JSON string or integer
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ProductId(pub String);

impl<'de> Deserialize<'de> for ProductId {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Raw {
            Text(String),
            Number(i64),
        }

        match Raw::deserialize(deserializer)? {
            Raw::Text(s) => Ok(ProductId(s)),
            Raw::Number(n) => Ok(ProductId(n.to_string())),
        }
    }
}

impl std::fmt::Display for ProductId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One cart line, already priced from the catalog by the caller
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartItem {
    pub product_id: ProductId,
    /// Catalog price in dollars
    pub unit_price: Decimal,
    pub quantity: i32,
}

/// POST /api/purchases
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseRequest {
    /// Required for admins, defaults to the caller for drivers
    #[serde(default)]
    pub driver_id: Option<i32>,
    pub sponsor_id: i32,
    pub items: Vec<CartItem>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PurchaseReceipt {
    pub order_id: i32,
    pub total_points: Points,
    pub total_dollars: Decimal,
    pub previous_balance: Points,
    pub new_balance: Points,
}

/// POST /api/orders/{order_id}/cancel
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RefundRequest {
    #[serde(default)]
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefundReceipt {
    pub order_id: i32,
    pub refunded_points: Points,
    pub new_balance: Points,
}

/// PUT /api/orders/{order_id}/status
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusTransitionRequest {
    pub status: OrderStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TransitionReceipt {
    pub order_id: i32,
    pub previous_status: OrderStatus,
    pub new_status: OrderStatus,
    /// False when the driver alert could not be written
    pub alert_delivered: bool,
}

/// PUT /api/orders/{order_id}
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateOrderRequest {
    #[serde(default)]
    pub tracking_number: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

/// GET /api/orders query parameters
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderListQuery {
    pub status: Option<OrderStatus>,
    pub driver_id: Option<i32>,
    pub sponsor_id: Option<i32>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemResponse {
    pub order_item_id: i32,
    pub product_id: String,
    pub quantity: i32,
    pub points_per_item: Points,
}

impl From<order_items::Model> for OrderItemResponse {
    fn from(model: order_items::Model) -> Self {
        Self {
            order_item_id: model.order_item_id,
            product_id: model.product_id,
            quantity: model.quantity,
            points_per_item: Points::new(model.points_per_item),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderResponse {
    pub order_id: i32,
    pub driver_id: i32,
    pub sponsor_id: i32,
    pub total_points: Points,
    pub status: String,
    pub tracking_number: Option<String>,
    pub notes: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub items: Vec<OrderItemResponse>,
}

impl OrderResponse {
    pub fn from_parts(order: orders::Model, items: Vec<order_items::Model>) -> Self {
        Self {
            order_id: order.order_id,
            driver_id: order.driver_id,
            sponsor_id: order.sponsor_id,
            total_points: Points::new(order.total_points),
            status: order.status,
            tracking_number: order.tracking_number,
            notes: order.notes,
            created_at: order.created_at.to_rfc3339(),
            updated_at: order.updated_at.to_rfc3339(),
            items: items.into_iter().map(OrderItemResponse::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderListResponse {
    pub orders: Vec<OrderResponse>,
    pub total: usize,
}
