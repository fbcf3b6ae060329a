use axum::{
    Router,
    routing::{delete, get, post, put},
};
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::handlers::{alerts, enrollment, health, orders, points, reports};
use crate::AppState;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route(
            "/api/drivers/{driver_id}/sponsors/{sponsor_id}/balance",
            get(points::get_balance),
        )
        .route("/api/points/award", post(points::award_points))
        .route("/api/purchases", post(points::purchase))
        .route("/api/orders", get(orders::list_orders))
        .route(
            "/api/orders/{order_id}",
            get(orders::get_order).put(orders::update_order),
        )
        .route("/api/orders/{order_id}/cancel", post(orders::cancel_order))
        .route("/api/orders/{order_id}/status", put(orders::update_order_status))
        .route("/api/enrollments", post(enrollment::apply))
        .route(
            "/api/sponsors/{sponsor_id}/enrollments",
            get(enrollment::list_links),
        )
        .route(
            "/api/enrollments/{driver_id}/{sponsor_id}/approve",
            post(enrollment::approve),
        )
        .route(
            "/api/enrollments/{driver_id}/{sponsor_id}/deactivate",
            post(enrollment::deactivate),
        )
        .route("/api/alerts", get(alerts::list_alerts))
        .route(
            "/api/alerts/preferences",
            get(alerts::get_preferences).put(alerts::update_preferences),
        )
        .route("/api/alerts/read-all", put(alerts::mark_all_seen))
        .route("/api/alerts/{alert_id}/seen", post(alerts::mark_seen))
        .route("/api/alerts/{alert_id}", delete(alerts::delete_alert))
        .route("/api/reports/points", get(reports::points_history))
        .route("/api/reports/spending", get(reports::spending_summary))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
