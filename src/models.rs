use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{entity, error::AppError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Admin,
    Store,
    Client,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Store => "store",
            Role::Client => "client",
        }
    }

    /// Landing page a freshly signed-in user is sent to.
    pub fn home_path(&self) -> &'static str {
        match self {
            Role::Admin => "/admin",
            Role::Store => "/store",
            Role::Client => "/client",
        }
    }
}

impl FromStr for Role {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "store" => Ok(Role::Store),
            "client" => Ok(Role::Client),
            other => Err(AppError::BadRequest(format!("Unknown role {other}"))),
        }
    }
}

/// Order lifecycle. Any status may be selected from any other one;
/// the usual path is pending -> processing -> delivering -> completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum OrderStatus {
    Pending,
    Processing,
    Delivering,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Delivering,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Delivering => "delivering",
            OrderStatus::Completed => "completed",
            OrderStatus::Cancelled => "cancelled",
        }
    }

    /// Still waiting on the store or the courier.
    pub fn is_open(&self) -> bool {
        matches!(
            self,
            OrderStatus::Pending | OrderStatus::Processing | OrderStatus::Delivering
        )
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest("Invalid order status".into()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum StoreStatus {
    Active,
    Paused,
    Closed,
}

impl StoreStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            StoreStatus::Active => "active",
            StoreStatus::Paused => "paused",
            StoreStatus::Closed => "closed",
        }
    }
}

impl FromStr for StoreStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(StoreStatus::Active),
            "paused" => Ok(StoreStatus::Paused),
            "closed" => Ok(StoreStatus::Closed),
            _ => Err(AppError::BadRequest("Invalid store status".into())),
        }
    }
}

/// How a product is measured when ordered. `ByWeight` quantities are grams.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    ByWeight,
    #[default]
    ByPiece,
    ByPackage,
}

impl SaleType {
    pub fn as_str(&self) -> &'static str {
        match self {
            SaleType::ByWeight => "by_weight",
            SaleType::ByPiece => "by_piece",
            SaleType::ByPackage => "by_package",
        }
    }
}

impl FromStr for SaleType {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "by_weight" => Ok(SaleType::ByWeight),
            "by_piece" => Ok(SaleType::ByPiece),
            "by_package" => Ok(SaleType::ByPackage),
            _ => Err(AppError::BadRequest("Invalid sale type".into())),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub name: String,
    pub role: String,
    pub created_at: DateTime<Utc>,
}

impl From<entity::users::Model> for User {
    fn from(model: entity::users::Model) -> Self {
        Self {
            id: model.id,
            email: model.email,
            name: model.name,
            role: model.role,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub price: i64,
    pub stock: i32,
    pub image_url: Option<String>,
    pub store_id: Uuid,
    pub store_name: Option<String>,
    pub category_id: Option<Uuid>,
    pub is_active: bool,
    pub sale_type: String,
    pub package_type: Option<String>,
    pub min_order: i32,
    pub max_order: Option<i32>,
    pub badge: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Product {
    pub fn from_entity(model: entity::products::Model, store_name: Option<String>) -> Self {
        Self {
            id: model.id,
            name: model.name,
            description: model.description,
            price: model.price,
            stock: model.stock,
            image_url: model.image_url,
            store_id: model.store_id,
            store_name,
            category_id: model.category_id,
            is_active: model.is_active,
            sale_type: model.sale_type,
            package_type: model.package_type,
            min_order: model.min_order,
            max_order: model.max_order,
            badge: model.badge,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Category {
    pub id: Uuid,
    pub name: String,
    pub order_index: i32,
}

impl From<entity::product_categories::Model> for Category {
    fn from(model: entity::product_categories::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            order_index: model.order_index,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Store {
    pub id: Uuid,
    pub name: String,
    pub owner_id: Uuid,
    pub status: String,
    pub working_hours: Option<String>,
    pub delivery_radius: f64,
    pub delivery_price: i64,
    pub created_at: DateTime<Utc>,
}

impl From<entity::stores::Model> for Store {
    fn from(model: entity::stores::Model) -> Self {
        Self {
            id: model.id,
            name: model.name,
            owner_id: model.owner_id,
            status: model.status,
            working_hours: model.working_hours,
            delivery_radius: model.delivery_radius,
            delivery_price: model.delivery_price,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub guest_name: Option<String>,
    pub guest_email: Option<String>,
    pub total_amount: i64,
    pub status: String,
    pub delivery_address: String,
    pub phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<entity::orders::Model> for Order {
    fn from(model: entity::orders::Model) -> Self {
        Self {
            id: model.id,
            user_id: model.user_id,
            guest_name: model.guest_name,
            guest_email: model.guest_email,
            total_amount: model.total_amount,
            status: model.status,
            delivery_address: model.delivery_address,
            phone: model.phone,
            created_at: model.created_at.with_timezone(&Utc),
            updated_at: model.updated_at.with_timezone(&Utc),
        }
    }
}

/// A line item joined with the product snapshot it refers to.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    pub id: Uuid,
    pub order_id: Uuid,
    pub product_id: Uuid,
    pub product_name: Option<String>,
    pub store_id: Option<Uuid>,
    pub store_name: Option<String>,
    pub quantity: i32,
    pub price: i64,
}

impl OrderItem {
    pub fn subtotal(&self) -> i64 {
        self.price * i64::from(self.quantity)
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CartItem {
    pub id: Uuid,
    pub product_id: Uuid,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl From<entity::cart_items::Model> for CartItem {
    fn from(model: entity::cart_items::Model) -> Self {
        Self {
            id: model.id,
            product_id: model.product_id,
            quantity: model.quantity,
            created_at: model.created_at.with_timezone(&Utc),
        }
    }
}

/// Which editable bot answer a button opens.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ResponseKey {
    SiteAbout,
    BecomeSeller,
}

impl ResponseKey {
    /// Buttons are matched by their visible label.
    pub fn for_button_text(text: &str) -> Option<Self> {
        if text.contains("Sayt haqida") {
            Some(ResponseKey::SiteAbout)
        } else if text.contains("Sotuvchi") {
            Some(ResponseKey::BecomeSeller)
        } else {
            None
        }
    }
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct BotButton {
    pub id: Uuid,
    pub text: String,
    pub action: Option<String>,
    pub order_index: i32,
    pub is_active: bool,
    pub store_id: Option<Uuid>,
    pub response_key: Option<ResponseKey>,
}

impl From<entity::bot_buttons::Model> for BotButton {
    fn from(model: entity::bot_buttons::Model) -> Self {
        let response_key = ResponseKey::for_button_text(&model.text);
        Self {
            id: model.id,
            text: model.text,
            action: model.action,
            order_index: model.order_index,
            is_active: model.is_active,
            store_id: model.store_id,
            response_key,
        }
    }
}
