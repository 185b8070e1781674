use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        bot::{BotButtonList, CreateBotButtonRequest, UpdateBotButtonRequest},
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        statistics::StatisticsReport,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{BotButton, Order, Store},
    response::ApiResponse,
    routes::params::OrderListQuery,
    services::{bot_service, store_portal_service},
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/me", get(my_store))
        .route("/orders", get(list_store_orders))
        .route("/orders/{id}", get(get_store_order))
        .route("/orders/{id}/status", patch(update_store_order_status))
        .route("/statistics", get(store_statistics))
        .route("/bot/buttons", get(list_store_buttons).post(create_store_button))
        .route(
            "/bot/buttons/{id}",
            patch(update_store_button).delete(delete_store_button),
        )
}

#[utoipa::path(
    get,
    path = "/api/store/me",
    responses(
        (status = 200, description = "Store owned by the current user", body = ApiResponse<Store>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No store for this account"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn my_store(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_portal_service::my_store(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/store/orders",
    params(
        ("page" = Option<i64>, Query, description = "Page number, default 1"),
        ("per_page" = Option<i64>, Query, description = "Items per page, default 20"),
        ("status" = Option<String>, Query, description = "Filter by status, or all"),
        ("q" = Option<String>, Query, description = "Search id, phone, address, guest name or email"),
        ("sort_order" = Option<String>, Query, description = "Sort order: asc, desc")
    ),
    responses(
        (status = 200, description = "Orders containing this store's products, with only its lines", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn list_store_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = store_portal_service::list_store_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/store/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with this store's lines", body = ApiResponse<OrderWithItems>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn get_store_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderWithItems>>> {
    let resp = store_portal_service::get_store_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/store/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Order status updated", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 404, description = "Order has no lines of this store"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn update_store_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = store_portal_service::update_store_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/store/statistics",
    responses(
        (status = 200, description = "Sales totals and top products", body = ApiResponse<StatisticsReport>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn store_statistics(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StatisticsReport>>> {
    let resp = store_portal_service::store_statistics(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/store/bot/buttons",
    responses(
        (status = 200, description = "Buttons of the store bot", body = ApiResponse<BotButtonList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn list_store_buttons(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BotButtonList>>> {
    let scope = bot_service::scope_for(&state, &user, false).await?;
    let resp = bot_service::list_buttons(&state, scope).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/store/bot/buttons",
    request_body = CreateBotButtonRequest,
    responses(
        (status = 201, description = "Button added to the store bot", body = ApiResponse<BotButton>),
        (status = 400, description = "Empty button text"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn create_store_button(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBotButtonRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BotButton>>)> {
    let scope = bot_service::scope_for(&state, &user, false).await?;
    let resp = bot_service::create_button(&state, &user, scope, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/store/bot/buttons/{id}",
    params(
        ("id" = Uuid, Path, description = "Button ID")
    ),
    request_body = UpdateBotButtonRequest,
    responses(
        (status = 200, description = "Button updated", body = ApiResponse<BotButton>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn update_store_button(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBotButtonRequest>,
) -> AppResult<Json<ApiResponse<BotButton>>> {
    let scope = bot_service::scope_for(&state, &user, false).await?;
    let resp = bot_service::update_button(&state, &user, scope, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/store/bot/buttons/{id}",
    params(
        ("id" = Uuid, Path, description = "Button ID")
    ),
    responses(
        (status = 200, description = "Button deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Store"
)]
pub async fn delete_store_button(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let scope = bot_service::scope_for(&state, &user, false).await?;
    let resp = bot_service::delete_button(&state, &user, scope, id).await?;
    Ok(Json(resp))
}
