use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Order, OrderItem};

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CheckoutItem {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// Signed-in clients may omit `items` to check out their stored cart.
/// Guests must list items and give a name and email.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CheckoutRequest {
    pub delivery_address: String,
    pub phone: String,
    #[serde(default)]
    pub items: Vec<CheckoutItem>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateOrderStatusRequest {
    pub status: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderWithItems {
    pub order: Order,
    pub items: Vec<OrderItem>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct OrderList {
    pub items: Vec<OrderWithItems>,
}
