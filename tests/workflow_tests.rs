mod common;

use chrono::Utc;
use common::{
    DRIVER_USER_ID, SPONSOR_USER_ID, cart_item, seed_driver, seed_link, seed_sponsor,
    setup_fixture,
};
use driver_incentive_backend::{
    error::LedgerError,
    models::alert::UpdatePreferencesRequest,
    models::enrollment::LinkStatus,
    models::order::{OrderListQuery, OrderStatus, UpdateOrderRequest},
    models::points::Points,
    models::report::ReportQuery,
    models::role::{Caller, Role, Scope},
    services::{alerts, directory, enrollment, orders, reports},
    services::notifier::DbNotifier,
};
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_enrollment_lifecycle() {
    let fx = setup_fixture(0).await;
    let driver = seed_driver(&fx.db, 300).await;

    let link = enrollment::apply(&fx.db, driver.driver_id, fx.sponsor_id())
        .await
        .unwrap();
    assert_eq!(link.status, "PENDING");
    assert_eq!(link.balance, 0);
    assert!(link.since_at.is_none());

    assert!(matches!(
        enrollment::apply(&fx.db, driver.driver_id, fx.sponsor_id()).await,
        Err(LedgerError::LinkAlreadyExists { .. })
    ));

    // Pending links cannot earn points yet
    assert!(matches!(
        fx.ledger
            .award(driver.driver_id, fx.sponsor_id(), Points::new(10), "early", SPONSOR_USER_ID)
            .await,
        Err(LedgerError::LinkNotFound { .. })
    ));

    let link = enrollment::approve(&fx.db, &DbNotifier, driver.driver_id, fx.sponsor_id())
        .await
        .unwrap();
    assert_eq!(link.status, "ACTIVE");
    assert!(link.since_at.is_some());

    let inbox = alerts::list_alerts(&fx.db, 300, false).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].alert_type, "ENROLLMENT");

    assert!(matches!(
        enrollment::approve(&fx.db, &DbNotifier, driver.driver_id, fx.sponsor_id()).await,
        Err(LedgerError::InvalidTransition { .. })
    ));

    let link = enrollment::deactivate(&fx.db, &DbNotifier, driver.driver_id, fx.sponsor_id())
        .await
        .unwrap();
    assert_eq!(link.status, "INACTIVE");

    let inbox = alerts::list_alerts(&fx.db, 300, false).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert!(inbox.iter().all(|a| a.alert_type == "ENROLLMENT"));
    assert!(
        inbox
            .iter()
            .any(|a| a.details.contains("dropped by sponsor"))
    );

    assert!(matches!(
        enrollment::deactivate(&fx.db, &DbNotifier, driver.driver_id, fx.sponsor_id()).await,
        Err(LedgerError::InvalidTransition { .. })
    ));
    assert!(matches!(
        enrollment::approve(&fx.db, &DbNotifier, 999, fx.sponsor_id()).await,
        Err(LedgerError::LinkNotFound { driver_id: 999, .. })
    ));
}

#[tokio::test]
async fn test_list_links_filters_by_status() {
    let fx = setup_fixture(0).await;
    let pending = seed_driver(&fx.db, 301).await;
    seed_link(&fx.db, pending.driver_id, fx.sponsor_id(), 0, LinkStatus::Pending).await;

    let other_sponsor = seed_sponsor(&fx.db, 101, "Other Co").await;
    seed_link(
        &fx.db,
        fx.driver_id(),
        other_sponsor.sponsor_id,
        0,
        LinkStatus::Active,
    )
    .await;

    let all = enrollment::list_links(&fx.db, fx.sponsor_id(), None).await.unwrap();
    assert_eq!(all.len(), 2);

    let pending_only = enrollment::list_links(&fx.db, fx.sponsor_id(), Some(LinkStatus::Pending))
        .await
        .unwrap();
    assert_eq!(pending_only.len(), 1);
    assert_eq!(pending_only[0].link.driver_id, pending.driver_id);
    assert_eq!(pending_only[0].first_name, "Test");
    assert_eq!(pending_only[0].last_name, "Driver301");
    assert_eq!(pending_only[0].active_sponsor_count, 0);

    // Active with this sponsor and with Other Co
    let active_only = enrollment::list_links(&fx.db, fx.sponsor_id(), Some(LinkStatus::Active))
        .await
        .unwrap();
    assert_eq!(active_only.len(), 1);
    assert_eq!(active_only[0].link.driver_id, fx.driver_id());
    assert_eq!(active_only[0].active_sponsor_count, 2);

    let empty = enrollment::list_links(&fx.db, other_sponsor.sponsor_id, Some(LinkStatus::Pending))
        .await
        .unwrap();
    assert!(empty.is_empty());
}

#[tokio::test]
async fn test_apply_to_unknown_sponsor_is_not_found() {
    let fx = setup_fixture(0).await;
    let driver = seed_driver(&fx.db, 302).await;

    assert!(matches!(
        enrollment::apply(&fx.db, driver.driver_id, 999).await,
        Err(LedgerError::SponsorNotFound(999))
    ));
    assert!(matches!(
        enrollment::apply(&fx.db, 999, fx.sponsor_id()).await,
        Err(LedgerError::DriverNotFound(999))
    ));
}

#[tokio::test]
async fn test_alert_inbox_ownership() {
    let fx = setup_fixture(1000).await;
    fx.ledger
        .award(fx.driver_id(), fx.sponsor_id(), Points::new(5), "bonus", SPONSOR_USER_ID)
        .await
        .unwrap();
    fx.ledger
        .purchase(fx.driver_id(), fx.sponsor_id(), &[cart_item("sku-1", dec!(1), 1)])
        .await
        .unwrap();

    let inbox = alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap();
    assert_eq!(inbox.len(), 2);
    let alert_id = inbox[0].alert_id;

    assert!(matches!(
        alerts::mark_seen(&fx.db, SPONSOR_USER_ID, alert_id).await,
        Err(LedgerError::AlertNotFound(_))
    ));
    assert!(matches!(
        alerts::delete_alert(&fx.db, SPONSOR_USER_ID, alert_id).await,
        Err(LedgerError::AlertNotFound(_))
    ));

    let seen = alerts::mark_seen(&fx.db, DRIVER_USER_ID, alert_id).await.unwrap();
    assert!(seen.seen);
    assert_eq!(
        alerts::list_alerts(&fx.db, DRIVER_USER_ID, true).await.unwrap().len(),
        1
    );

    alerts::delete_alert(&fx.db, DRIVER_USER_ID, alert_id).await.unwrap();
    assert_eq!(
        alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn test_mark_all_seen_touches_only_own_unseen_alerts() {
    let fx = setup_fixture(1000).await;
    for reason in ["one", "two", "three"] {
        fx.ledger
            .award(fx.driver_id(), fx.sponsor_id(), Points::new(1), reason, SPONSOR_USER_ID)
            .await
            .unwrap();
    }
    let other = seed_driver(&fx.db, 303).await;
    seed_link(&fx.db, other.driver_id, fx.sponsor_id(), 0, LinkStatus::Active).await;
    fx.ledger
        .award(other.driver_id, fx.sponsor_id(), Points::new(1), "other", SPONSOR_USER_ID)
        .await
        .unwrap();

    let first = alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap()[0].alert_id;
    alerts::mark_seen(&fx.db, DRIVER_USER_ID, first).await.unwrap();

    assert_eq!(alerts::mark_all_seen(&fx.db, DRIVER_USER_ID).await.unwrap(), 2);
    assert!(alerts::list_alerts(&fx.db, DRIVER_USER_ID, true).await.unwrap().is_empty());
    assert_eq!(alerts::list_alerts(&fx.db, 303, true).await.unwrap().len(), 1);
    assert_eq!(alerts::mark_all_seen(&fx.db, DRIVER_USER_ID).await.unwrap(), 0);
}

#[tokio::test]
async fn test_preferences_mute_points_and_order_alerts() {
    let fx = setup_fixture(1000).await;

    let defaults = alerts::get_preferences(&fx.db, DRIVER_USER_ID).await.unwrap();
    assert!(defaults.points_alert && defaults.order_alert);

    let muted = alerts::update_preferences(
        &fx.db,
        DRIVER_USER_ID,
        UpdatePreferencesRequest {
            points_alert: Some(false),
            order_alert: None,
        },
    )
    .await
    .unwrap();
    assert!(!muted.points_alert);
    assert!(muted.order_alert);

    fx.ledger
        .award(fx.driver_id(), fx.sponsor_id(), Points::new(5), "bonus", SPONSOR_USER_ID)
        .await
        .unwrap();
    assert!(alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap().is_empty());

    fx.ledger
        .purchase(fx.driver_id(), fx.sponsor_id(), &[cart_item("sku-1", dec!(1), 1)])
        .await
        .unwrap();
    let inbox = alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap();
    assert_eq!(inbox.len(), 1);
    assert_eq!(inbox[0].alert_type, "ORDER");

    // Second update edits the stored row and keeps the points toggle
    let all_off = alerts::update_preferences(
        &fx.db,
        DRIVER_USER_ID,
        UpdatePreferencesRequest {
            points_alert: None,
            order_alert: Some(false),
        },
    )
    .await
    .unwrap();
    assert!(!all_off.points_alert && !all_off.order_alert);

    fx.ledger
        .purchase(fx.driver_id(), fx.sponsor_id(), &[cart_item("sku-2", dec!(1), 1)])
        .await
        .unwrap();
    assert_eq!(alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap().len(), 1);

    // Being dropped is always delivered
    enrollment::deactivate(&fx.db, &DbNotifier, fx.driver_id(), fx.sponsor_id())
        .await
        .unwrap();
    let inbox = alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap();
    assert_eq!(inbox.len(), 2);
    assert_eq!(inbox[0].alert_type, "ENROLLMENT");
}

#[tokio::test]
async fn test_order_listing_and_detail_edits() {
    let fx = setup_fixture(5000).await;
    let first = fx
        .ledger
        .purchase(
            fx.driver_id(),
            fx.sponsor_id(),
            &[cart_item("sku-1", dec!(1.25), 2), cart_item("sku-2", dec!(3), 1)],
        )
        .await
        .unwrap();
    let second = fx
        .ledger
        .purchase(fx.driver_id(), fx.sponsor_id(), &[cart_item("sku-3", dec!(2), 1)])
        .await
        .unwrap();
    fx.ledger
        .transition_order(second.order_id, OrderStatus::Processing)
        .await
        .unwrap();

    let listed = orders::list_orders(
        &fx.db,
        &OrderListQuery {
            driver_id: Some(fx.driver_id()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(listed.len(), 2);
    assert_eq!(listed[0].order_id, second.order_id);
    assert_eq!(listed[1].items.len(), 2);
    assert_eq!(listed[1].total_points, Points::new(550));

    let today = Utc::now().date_naive();
    let processing = orders::list_orders(
        &fx.db,
        &OrderListQuery {
            status: Some(OrderStatus::Processing),
            start_date: Some(today),
            end_date: Some(today),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(processing.len(), 1);
    assert_eq!(processing[0].order_id, second.order_id);

    let updated = orders::update_order_details(
        &fx.db,
        first.order_id,
        &UpdateOrderRequest {
            tracking_number: Some("1Z999".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();
    assert_eq!(updated.tracking_number.as_deref(), Some("1Z999"));
    assert_eq!(updated.total_points, Points::new(550));

    assert!(matches!(
        orders::update_order_details(&fx.db, first.order_id, &UpdateOrderRequest::default()).await,
        Err(LedgerError::InvalidRequest(_))
    ));

    fx.ledger.refund(first.order_id, "no longer needed", DRIVER_USER_ID).await.unwrap();
    assert!(matches!(
        orders::update_order_details(
            &fx.db,
            first.order_id,
            &UpdateOrderRequest {
                tracking_number: None,
                notes: Some("late note".to_string()),
            },
        )
        .await,
        Err(LedgerError::InvalidOrderState {
            status: OrderStatus::Cancelled,
            ..
        })
    ));

    assert!(matches!(
        orders::get_order(&fx.db, 9999).await,
        Err(LedgerError::OrderNotFound(9999))
    ));
}

#[tokio::test]
async fn test_shipped_alert_includes_tracking() {
    let fx = setup_fixture(1000).await;
    let order_id = fx
        .ledger
        .purchase(fx.driver_id(), fx.sponsor_id(), &[cart_item("sku-1", dec!(1), 1)])
        .await
        .unwrap()
        .order_id;
    orders::update_order_details(
        &fx.db,
        order_id,
        &UpdateOrderRequest {
            tracking_number: Some("TRACK-42".to_string()),
            notes: None,
        },
    )
    .await
    .unwrap();
    fx.ledger
        .transition_order(order_id, OrderStatus::Processing)
        .await
        .unwrap();
    fx.ledger
        .transition_order(order_id, OrderStatus::Shipped)
        .await
        .unwrap();

    let inbox = alerts::list_alerts(&fx.db, DRIVER_USER_ID, false).await.unwrap();
    assert!(inbox.iter().any(|a| a.details.contains("TRACK-42")));
}

#[tokio::test]
async fn test_points_history_and_spending_reports() {
    let fx = setup_fixture(0).await;
    fx.ledger
        .award(fx.driver_id(), fx.sponsor_id(), Points::new(2000), "signup", SPONSOR_USER_ID)
        .await
        .unwrap();
    fx.ledger
        .award(fx.driver_id(), fx.sponsor_id(), Points::new(-100), "speeding", SPONSOR_USER_ID)
        .await
        .unwrap();
    fx.ledger
        .purchase(
            fx.driver_id(),
            fx.sponsor_id(),
            &[cart_item("sku-1", dec!(1.50), 2), cart_item("sku-2", dec!(4), 1)],
        )
        .await
        .unwrap();

    let history = reports::points_history(
        &fx.db,
        &ReportQuery {
            sponsor_id: Some(fx.sponsor_id()),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert_eq!(history.entries.len(), 3);
    assert_eq!(history.total_awarded, Points::new(2000));
    assert_eq!(history.total_deducted, Points::new(800));
    assert_eq!(history.entries[0].balance_after, Points::new(1200));

    let spending = reports::spending_summary(&fx.db, &ReportQuery::default())
        .await
        .unwrap();
    assert_eq!(spending.rows.len(), 1);
    assert_eq!(spending.rows[0].line_items, 2);
    assert_eq!(spending.points_spent, Points::new(700));
    assert_eq!(spending.dollars_spent, dec!(7.00));

    let yesterday = Utc::now().date_naive().pred_opt().unwrap();
    let empty = reports::spending_summary(
        &fx.db,
        &ReportQuery {
            end_date: Some(yesterday),
            ..Default::default()
        },
    )
    .await
    .unwrap();
    assert!(empty.rows.is_empty());
    assert_eq!(empty.points_spent, Points::ZERO);
}

#[tokio::test]
async fn test_scope_resolution() {
    let fx = setup_fixture(0).await;

    let sponsor = directory::resolve_scope(
        &fx.db,
        &Caller {
            user_id: SPONSOR_USER_ID,
            role: Role::Sponsor,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        sponsor,
        Scope::Sponsor {
            sponsor_id: fx.sponsor_id()
        }
    );

    let driver = directory::resolve_scope(
        &fx.db,
        &Caller {
            user_id: DRIVER_USER_ID,
            role: Role::Driver,
        },
    )
    .await
    .unwrap();
    assert_eq!(
        driver,
        Scope::Driver {
            driver_id: fx.driver_id()
        }
    );

    assert!(matches!(
        directory::resolve_scope(
            &fx.db,
            &Caller {
                user_id: DRIVER_USER_ID,
                role: Role::Sponsor,
            },
        )
        .await,
        Err(LedgerError::Forbidden(_))
    ));
}
