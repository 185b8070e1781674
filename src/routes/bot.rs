use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::{get, patch, put},
};
use uuid::Uuid;

use crate::{
    dto::bot::{
        BotButtonList, BotOverview, CreateBotButtonRequest, SaveResponseRequest,
        SaveWelcomeMessageRequest, UpdateBotButtonRequest,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::{BotButton, ResponseKey},
    response::ApiResponse,
    services::bot_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/bot", get(get_bot_overview))
        .route("/bot/welcome", put(save_welcome_message))
        .route("/bot/responses/{key}", put(save_button_response))
        .route("/bot/buttons", get(list_buttons).post(create_button))
        .route("/bot/buttons/{id}", patch(update_button).delete(delete_button))
}

#[utoipa::path(
    get,
    path = "/api/admin/bot",
    responses(
        (status = 200, description = "Welcome message, main buttons and their answers", body = ApiResponse<BotOverview>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn get_bot_overview(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BotOverview>>> {
    let resp = bot_service::get_bot_overview(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/bot/welcome",
    request_body = SaveWelcomeMessageRequest,
    responses(
        (status = 200, description = "Welcome message saved", body = ApiResponse<serde_json::Value>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn save_welcome_message(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<SaveWelcomeMessageRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = bot_service::save_welcome_message(&state, &user, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    put,
    path = "/api/admin/bot/responses/{key}",
    params(
        ("key" = String, Path, description = "site_about or become_seller")
    ),
    request_body = SaveResponseRequest,
    responses(
        (status = 200, description = "Button answer saved", body = ApiResponse<serde_json::Value>),
        (status = 400, description = "Unknown response key"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn save_button_response(
    State(state): State<AppState>,
    user: AuthUser,
    Path(key): Path<ResponseKey>,
    Json(payload): Json<SaveResponseRequest>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = bot_service::save_button_response(&state, &user, key, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/bot/buttons",
    responses(
        (status = 200, description = "Main bot buttons in display order", body = ApiResponse<BotButtonList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn list_buttons(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<BotButtonList>>> {
    let scope = bot_service::scope_for(&state, &user, true).await?;
    let resp = bot_service::list_buttons(&state, scope).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/bot/buttons",
    request_body = CreateBotButtonRequest,
    responses(
        (status = 201, description = "Button added to the main bot", body = ApiResponse<BotButton>),
        (status = 400, description = "Empty button text"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn create_button(
    State(state): State<AppState>,
    user: AuthUser,
    Json(payload): Json<CreateBotButtonRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<BotButton>>)> {
    let scope = bot_service::scope_for(&state, &user, true).await?;
    let resp = bot_service::create_button(&state, &user, scope, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    patch,
    path = "/api/admin/bot/buttons/{id}",
    params(
        ("id" = Uuid, Path, description = "Button ID")
    ),
    request_body = UpdateBotButtonRequest,
    responses(
        (status = 200, description = "Button updated", body = ApiResponse<BotButton>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn update_button(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateBotButtonRequest>,
) -> AppResult<Json<ApiResponse<BotButton>>> {
    let scope = bot_service::scope_for(&state, &user, true).await?;
    let resp = bot_service::update_button(&state, &user, scope, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/bot/buttons/{id}",
    params(
        ("id" = Uuid, Path, description = "Button ID")
    ),
    responses(
        (status = 200, description = "Button deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Bot"
)]
pub async fn delete_button(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let scope = bot_service::scope_for(&state, &user, true).await?;
    let resp = bot_service::delete_button(&state, &user, scope, id).await?;
    Ok(Json(resp))
}
