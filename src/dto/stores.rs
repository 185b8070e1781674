use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Store, User};

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreOwner {
    pub name: String,
    pub email: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreCredentialsView {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreDetails {
    #[serde(flatten)]
    pub store: Store,
    pub owner: StoreOwner,
    pub credentials: Option<StoreCredentialsView>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreList {
    pub items: Vec<StoreDetails>,
}

#[derive(Debug, Serialize, ToSchema)]
#[serde(transparent)]
pub struct UserList {
    #[schema(value_type = Vec<User>)]
    pub items: Vec<User>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct NewStoreOwner {
    pub email: String,
    pub name: String,
    pub password: String,
}

/// Exactly one of `new_owner` or `existing_user_id` must be given.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateStoreRequest {
    pub store_name: String,
    pub new_owner: Option<NewStoreOwner>,
    pub existing_user_id: Option<Uuid>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UpdateStoreSettingsRequest {
    pub status: String,
    pub working_hours: Option<String>,
    #[serde(default)]
    pub delivery_radius: f64,
    #[serde(default)]
    pub delivery_price: i64,
}
