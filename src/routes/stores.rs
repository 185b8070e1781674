use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, put},
};
use uuid::Uuid;

use crate::{
    dto::stores::{CreateStoreRequest, StoreList, UpdateStoreSettingsRequest, UserList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Store,
    response::ApiResponse,
    services::store_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/stores", get(list_stores).post(create_store))
        .route("/stores/{id}/settings", put(update_store_settings))
        .route("/users/owner-candidates", get(list_owner_candidates))
}

#[utoipa::path(
    get,
    path = "/api/admin/stores",
    responses(
        (status = 200, description = "Stores with owner and onboarding credentials", body = ApiResponse<StoreList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_stores(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<StoreList>>> {
    let resp = store_service::list_stores(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/users/owner-candidates",
    responses(
        (status = 200, description = "Client accounts that can own a store", body = ApiResponse<UserList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn list_owner_candidates(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<UserList>>> {
    let resp = store_service::list_owner_candidates(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/stores",
    request_body = CreateStoreRequest,
    responses(
        (status = 201, description = "Store created with a new or existing owner. A promoted client can use the store portal with their current token", body = ApiResponse<Store>),
        (status = 400, description = "Missing fields, taken email or unknown owner"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn create_store(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateStoreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Store>>)> {
    let resp = store_service::create_store(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/stores/{id}/settings",
    params(
        ("id" = Uuid, Path, description = "Store ID")
    ),
    request_body = UpdateStoreSettingsRequest,
    responses(
        (status = 200, description = "Store settings saved", body = ApiResponse<Store>),
        (status = 400, description = "Invalid status or negative delivery values"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Stores"
)]
pub async fn update_store_settings(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateStoreSettingsRequest>,
) -> AppResult<Json<ApiResponse<Store>>> {
    let resp = store_service::update_store_settings(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
