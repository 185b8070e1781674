use serde::Serialize;
use utoipa::ToSchema;

#[derive(Debug, Default, Clone, PartialEq, Serialize, ToSchema)]
pub struct StoreStatistics {
    pub total_revenue: i64,
    pub total_orders: i64,
    pub total_products: i64,
    pub active_products: i64,
    pub pending_orders: i64,
    pub completed_orders: i64,
    pub today_revenue: i64,
    pub today_orders: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct TopProduct {
    pub name: String,
    pub quantity: i64,
    pub revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatisticsReport {
    pub stats: StoreStatistics,
    pub top_products: Vec<TopProduct>,
}
