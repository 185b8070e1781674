use chrono::{Duration, Local, TimeZone, Utc};
use marketplace_admin_api::services::statistics_service::{
    SaleLine, compute_statistics, local_midnight,
};
use uuid::Uuid;

struct Catalog {
    apples: Uuid,
    bread: Uuid,
}

fn line(
    order_id: Uuid,
    status: &str,
    hours_ago: i64,
    product_id: Uuid,
    name: &str,
    quantity: i32,
    price: i64,
) -> SaleLine {
    SaleLine {
        order_id,
        status: status.into(),
        created_at: Utc::now() - Duration::hours(hours_ago),
        product_id,
        product_name: name.into(),
        quantity,
        price,
    }
}

#[test]
fn empty_store_has_zeroed_report() {
    let report = compute_statistics(&[], 3, 1, Utc::now());
    assert_eq!(report.stats.total_products, 3);
    assert_eq!(report.stats.active_products, 1);
    assert_eq!(report.stats.total_orders, 0);
    assert_eq!(report.stats.total_revenue, 0);
    assert!(report.top_products.is_empty());
}

#[test]
fn revenue_and_counts_follow_order_status() {
    let catalog = Catalog {
        apples: Uuid::new_v4(),
        bread: Uuid::new_v4(),
    };
    let fresh = Uuid::new_v4();
    let done = Uuid::new_v4();
    let cancelled = Uuid::new_v4();

    let lines = vec![
        line(fresh, "pending", 0, catalog.apples, "Apples", 2, 100),
        line(fresh, "pending", 0, catalog.bread, "Bread", 1, 50),
        line(done, "completed", 72, catalog.bread, "Bread", 4, 50),
        line(cancelled, "cancelled", 72, catalog.apples, "Apples", 1, 100),
    ];
    let today_start = Utc::now() - Duration::hours(1);
    let report = compute_statistics(&lines, 2, 2, today_start);
    let stats = report.stats;

    assert_eq!(stats.total_orders, 3);
    // Every status counts towards revenue.
    assert_eq!(stats.total_revenue, 250 + 200 + 100);
    assert_eq!(stats.pending_orders, 1);
    assert_eq!(stats.completed_orders, 1);
    assert_eq!(stats.today_orders, 1);
    assert_eq!(stats.today_revenue, 250);
}

#[test]
fn top_products_rank_by_revenue_and_keep_five() {
    let order = Uuid::new_v4();
    let lines: Vec<SaleLine> = (1..=7)
        .map(|i| line(order, "processing", 2, Uuid::new_v4(), &format!("P{i}"), i, 10))
        .collect();

    let report = compute_statistics(&lines, 7, 7, Utc::now());
    let names: Vec<&str> = report.top_products.iter().map(|p| p.name.as_str()).collect();

    assert_eq!(names, vec!["P7", "P6", "P5", "P4", "P3"]);
    assert_eq!(report.top_products[0].quantity, 7);
    assert_eq!(report.top_products[0].revenue, 70);
}

#[test]
fn same_product_across_orders_is_summed() {
    let apples = Uuid::new_v4();
    let lines = vec![
        line(Uuid::new_v4(), "completed", 30, apples, "Apples", 500, 2),
        line(Uuid::new_v4(), "pending", 3, apples, "Apples", 250, 2),
    ];

    let report = compute_statistics(&lines, 1, 1, Utc::now());
    assert_eq!(report.top_products.len(), 1);
    assert_eq!(report.top_products[0].quantity, 750);
    assert_eq!(report.top_products[0].revenue, 1500);
}

#[test]
fn local_midnight_starts_the_local_day() {
    let now = Local
        .with_ymd_and_hms(2026, 3, 14, 15, 30, 0)
        .earliest()
        .expect("valid local time");
    let midnight = local_midnight(now).with_timezone(&Local);

    assert_eq!(midnight.date_naive(), now.date_naive());
    assert_eq!(midnight.format("%H:%M:%S").to_string(), "00:00:00");
}
