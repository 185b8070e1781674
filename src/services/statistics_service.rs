use std::collections::HashMap;

use chrono::{DateTime, Local, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::{
    db::DbPool,
    dto::statistics::{StatisticsReport, StoreStatistics, TopProduct},
    error::AppResult,
    models::OrderStatus,
};

const TOP_PRODUCTS: usize = 5;

/// One sold line of a store's product, joined with its order.
#[derive(Debug, Clone, FromRow)]
pub struct SaleLine {
    pub order_id: Uuid,
    pub status: String,
    pub created_at: DateTime<Utc>,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub price: i64,
}

impl SaleLine {
    fn subtotal(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

/// Start of the current local day, in UTC.
pub fn local_midnight(now: DateTime<Local>) -> DateTime<Utc> {
    now.date_naive()
        .and_hms_opt(0, 0, 0)
        .and_then(|midnight| midnight.and_local_timezone(Local).earliest())
        .map(|midnight| midnight.with_timezone(&Utc))
        .unwrap_or_else(|| now.with_timezone(&Utc))
}

/// Aggregate a store's sales. Revenue counts only that store's lines and
/// includes every order status.
pub fn compute_statistics(
    lines: &[SaleLine],
    total_products: i64,
    active_products: i64,
    today_start: DateTime<Utc>,
) -> StatisticsReport {
    struct OrderAcc {
        status: Option<OrderStatus>,
        created_at: DateTime<Utc>,
        total: i64,
    }

    let mut orders: HashMap<Uuid, OrderAcc> = HashMap::new();
    let mut products: HashMap<Uuid, TopProduct> = HashMap::new();

    for line in lines {
        let subtotal = line.subtotal();
        orders
            .entry(line.order_id)
            .or_insert_with(|| OrderAcc {
                status: line.status.parse().ok(),
                created_at: line.created_at,
                total: 0,
            })
            .total += subtotal;

        let product = products.entry(line.product_id).or_insert_with(|| TopProduct {
            name: line.product_name.clone(),
            quantity: 0,
            revenue: 0,
        });
        product.quantity += i64::from(line.quantity);
        product.revenue += subtotal;
    }

    let mut stats = StoreStatistics {
        total_products,
        active_products,
        total_orders: orders.len() as i64,
        ..StoreStatistics::default()
    };

    for order in orders.values() {
        stats.total_revenue += order.total;
        if order.created_at >= today_start {
            stats.today_revenue += order.total;
            stats.today_orders += 1;
        }
        match order.status {
            Some(status) if status.is_open() => stats.pending_orders += 1,
            Some(OrderStatus::Completed) => stats.completed_orders += 1,
            _ => {}
        }
    }

    let mut top_products: Vec<TopProduct> = products.into_values().collect();
    top_products.sort_by(|a, b| b.revenue.cmp(&a.revenue).then_with(|| a.name.cmp(&b.name)));
    top_products.truncate(TOP_PRODUCTS);

    StatisticsReport {
        stats,
        top_products,
    }
}

pub async fn load_sale_lines(pool: &DbPool, store_id: Uuid) -> AppResult<Vec<SaleLine>> {
    let lines = sqlx::query_as::<_, SaleLine>(
        r#"
        SELECT o.id AS order_id, o.status, o.created_at,
               p.id AS product_id, p.name AS product_name,
               oi.quantity, oi.price
        FROM order_items oi
        JOIN products p ON p.id = oi.product_id
        JOIN orders o ON o.id = oi.order_id
        WHERE p.store_id = $1
        "#,
    )
    .bind(store_id)
    .fetch_all(pool)
    .await?;
    Ok(lines)
}

/// (total, active) product counts of a store.
pub async fn product_counts(pool: &DbPool, store_id: Uuid) -> AppResult<(i64, i64)> {
    let counts: (i64, i64) = sqlx::query_as(
        r#"
        SELECT COUNT(*), COUNT(*) FILTER (WHERE is_active)
        FROM products
        WHERE store_id = $1
        "#,
    )
    .bind(store_id)
    .fetch_one(pool)
    .await?;
    Ok(counts)
}
