use axum::Router;

use crate::state::AppState;

pub mod admin;
pub mod auth;
pub mod bot;
pub mod cart;
pub mod doc;
pub mod health;
pub mod orders;
pub mod params;
pub mod products;
pub mod store;
pub mod stores;
pub mod uploads;

// Build the API router without binding state; it will be provided at the top level.
pub fn create_api_router() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/products", products::router())
        .nest("/cart", cart::router())
        .nest("/orders", orders::router())
        .nest(
            "/admin",
            admin::router().merge(stores::router()).merge(bot::router()),
        )
        .nest("/store", store::router())
        .nest("/uploads", uploads::router())
}
