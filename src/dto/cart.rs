use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::Product;

/// Sets the quantity of a product in the cart; grams for `by_weight` products.
#[derive(Debug, Deserialize, ToSchema)]
pub struct AddToCartRequest {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A cart line priced at the current product price.
#[derive(Debug, Serialize, ToSchema)]
pub struct CartLine {
    pub id: Uuid,
    pub product: Product,
    pub quantity: i32,
    pub subtotal: i64,
}

impl CartLine {
    pub fn new(id: Uuid, product: Product, quantity: i32) -> Self {
        let subtotal = product.price * i64::from(quantity);
        Self {
            id,
            product,
            quantity,
            subtotal,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CartList {
    pub items: Vec<CartLine>,
    pub total_amount: i64,
}

impl CartList {
    pub fn from_lines(items: Vec<CartLine>) -> Self {
        let total_amount = items.iter().map(|line| line.subtotal).sum();
        Self {
            items,
            total_amount,
        }
    }
}
