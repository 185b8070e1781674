use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::bot::{
        BecomeSellerPage, BotButtonList, BotOverview, CreateBotButtonRequest,
        SITE_ABOUT_KEY, SaveResponseRequest, SaveWelcomeMessageRequest, UpdateBotButtonRequest,
        WELCOME_MESSAGE_KEY,
    },
    entity::{
        become_seller_pages::{
            ActiveModel as PageActive, Column as PageCol, Entity as BecomeSellerPages,
        },
        bot_buttons::{ActiveModel as ButtonActive, Column as ButtonCol, Entity as BotButtons},
        bot_settings::{ActiveModel as BotSettingActive, Column as BotSettingCol, Entity as BotSettings},
        site_settings::{ActiveModel as SiteSettingActive, Column as SiteSettingCol, Entity as SiteSettings},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{BotButton, ResponseKey},
    response::{ApiResponse, Meta},
    services::store_portal_service::resolve_store,
    state::AppState,
};

/// Whose buttons an operation touches: the marketplace bot or one store's bot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ButtonScope {
    Main,
    Store(Uuid),
}

impl ButtonScope {
    fn store_id(&self) -> Option<Uuid> {
        match self {
            ButtonScope::Main => None,
            ButtonScope::Store(id) => Some(*id),
        }
    }

    fn condition(&self) -> Condition {
        match self {
            ButtonScope::Main => Condition::all().add(ButtonCol::StoreId.is_null()),
            ButtonScope::Store(id) => Condition::all().add(ButtonCol::StoreId.eq(*id)),
        }
    }
}

/// Admins edit the main bot; store owners edit their own store's bot.
pub async fn scope_for(state: &AppState, user: &AuthUser, main: bool) -> AppResult<ButtonScope> {
    if main {
        ensure_admin(user)?;
        Ok(ButtonScope::Main)
    } else {
        let store = resolve_store(state, user).await?;
        Ok(ButtonScope::Store(store.id))
    }
}

async fn buttons_in_scope<C: ConnectionTrait>(
    conn: &C,
    scope: ButtonScope,
) -> AppResult<Vec<BotButton>> {
    let buttons = BotButtons::find()
        .filter(scope.condition())
        .order_by_asc(ButtonCol::OrderIndex)
        .all(conn)
        .await?
        .into_iter()
        .map(BotButton::from)
        .collect();
    Ok(buttons)
}

async fn current_seller_page<C: ConnectionTrait>(
    conn: &C,
) -> AppResult<Option<crate::entity::become_seller_pages::Model>> {
    let page = BecomeSellerPages::find()
        .filter(PageCol::IsActive.eq(true))
        .order_by_desc(PageCol::CreatedAt)
        .one(conn)
        .await?;
    Ok(page)
}

pub async fn get_bot_overview(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<BotOverview>> {
    ensure_admin(user)?;
    let welcome_message = BotSettings::find()
        .filter(BotSettingCol::Key.eq(WELCOME_MESSAGE_KEY))
        .one(&state.orm)
        .await?
        .map(|s| s.value)
        .unwrap_or_default();

    let buttons = buttons_in_scope(&state.orm, ButtonScope::Main).await?;

    let site_about = SiteSettings::find()
        .filter(SiteSettingCol::Key.eq(SITE_ABOUT_KEY))
        .one(&state.orm)
        .await?
        .map(|s| s.value)
        .unwrap_or_default();

    let become_seller = current_seller_page(&state.orm)
        .await?
        .map(|p| BecomeSellerPage {
            title: p.title,
            content: p.content,
        })
        .unwrap_or_default();
    let become_seller_text = if become_seller.title.is_empty() {
        String::new()
    } else {
        become_seller.to_text()
    };

    Ok(ApiResponse::success(
        "Bot settings",
        BotOverview {
            welcome_message,
            buttons,
            site_about,
            become_seller,
            become_seller_text,
        },
        Some(Meta::empty()),
    ))
}

/// Update the welcome message, creating the setting on first save.
pub async fn save_welcome_message(
    state: &AppState,
    user: &AuthUser,
    payload: SaveWelcomeMessageRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let existing = BotSettings::find()
        .filter(BotSettingCol::Key.eq(WELCOME_MESSAGE_KEY))
        .one(&state.orm)
        .await?;

    match existing {
        Some(setting) => {
            let mut active: BotSettingActive = setting.into();
            active.value = Set(payload.message.clone());
            active.updated_at = Set(Utc::now().into());
            active.update(&state.orm).await?;
        }
        None => {
            BotSettingActive {
                id: Set(Uuid::new_v4()),
                key: Set(WELCOME_MESSAGE_KEY.to_string()),
                value: Set(payload.message.clone()),
                description: Set(Some("Bot welcome message".to_string())),
                updated_at: NotSet,
            }
            .insert(&state.orm)
            .await?;
        }
    }

    audit::record(
        state,
        Some(user.user_id),
        "bot_welcome_update",
        "bot_settings",
        serde_json::json!({ "length": payload.message.chars().count() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Welcome message saved",
        serde_json::json!({ "welcome_message": payload.message }),
        Some(Meta::empty()),
    ))
}

/// Save the answer text behind a bot button.
pub async fn save_button_response(
    state: &AppState,
    user: &AuthUser,
    key: ResponseKey,
    payload: SaveResponseRequest,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    let data = match key {
        ResponseKey::SiteAbout => {
            let existing = SiteSettings::find()
                .filter(SiteSettingCol::Key.eq(SITE_ABOUT_KEY))
                .one(&state.orm)
                .await?;
            match existing {
                Some(setting) => {
                    let mut active: SiteSettingActive = setting.into();
                    active.value = Set(payload.text.clone());
                    active.updated_at = Set(Utc::now().into());
                    active.update(&state.orm).await?;
                }
                None => {
                    SiteSettingActive {
                        id: Set(Uuid::new_v4()),
                        key: Set(SITE_ABOUT_KEY.to_string()),
                        value: Set(payload.text.clone()),
                        description: Set(Some("Answer for the site about button".to_string())),
                        updated_at: NotSet,
                    }
                    .insert(&state.orm)
                    .await?;
                }
            }
            serde_json::json!({ "site_about": payload.text })
        }
        ResponseKey::BecomeSeller => {
            let page = BecomeSellerPage::from_text(&payload.text);
            match current_seller_page(&state.orm).await? {
                Some(existing) => {
                    let mut active: PageActive = existing.into();
                    active.title = Set(page.title.clone());
                    active.content = Set(page.content.clone());
                    active.update(&state.orm).await?;
                }
                None => {
                    PageActive {
                        id: Set(Uuid::new_v4()),
                        title: Set(page.title.clone()),
                        content: Set(page.content.clone()),
                        is_active: Set(true),
                        created_at: Set(Utc::now().into()),
                    }
                    .insert(&state.orm)
                    .await?;
                }
            }
            serde_json::json!({ "title": page.title, "content": page.content })
        }
    };

    audit::record(
        state,
        Some(user.user_id),
        "bot_response_update",
        "bot",
        serde_json::json!({ "key": key }),
    )
    .await;

    Ok(ApiResponse::success(
        "Response saved",
        data,
        Some(Meta::empty()),
    ))
}

pub async fn list_buttons(
    state: &AppState,
    scope: ButtonScope,
) -> AppResult<ApiResponse<BotButtonList>> {
    let items = buttons_in_scope(&state.orm, scope).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Buttons", BotButtonList { items }, Some(meta)))
}

pub async fn create_button(
    state: &AppState,
    user: &AuthUser,
    scope: ButtonScope,
    payload: CreateBotButtonRequest,
) -> AppResult<ApiResponse<BotButton>> {
    let text = payload.text.trim().to_string();
    if text.is_empty() {
        return Err(AppError::BadRequest("Button text is required".into()));
    }

    // New buttons go last unless placed explicitly.
    let order_index = match payload.order_index {
        Some(index) => index,
        None => BotButtons::find()
            .filter(scope.condition())
            .order_by_desc(ButtonCol::OrderIndex)
            .one(&state.orm)
            .await?
            .map(|b| b.order_index.saturating_add(1))
            .unwrap_or(0),
    };

    let button = ButtonActive {
        id: Set(Uuid::new_v4()),
        text: Set(text),
        action: Set(payload.action),
        order_index: Set(order_index),
        is_active: Set(payload.is_active.unwrap_or(true)),
        store_id: Set(scope.store_id()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        state,
        Some(user.user_id),
        "bot_button_create",
        "bot_buttons",
        serde_json::json!({ "button_id": button.id, "store_id": button.store_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Button created",
        BotButton::from(button),
        Some(Meta::empty()),
    ))
}

async fn find_button(
    state: &AppState,
    scope: ButtonScope,
    id: Uuid,
) -> AppResult<crate::entity::bot_buttons::Model> {
    let button = BotButtons::find()
        .filter(scope.condition().add(ButtonCol::Id.eq(id)))
        .one(&state.orm)
        .await?;
    button.ok_or(AppError::NotFound)
}

pub async fn update_button(
    state: &AppState,
    user: &AuthUser,
    scope: ButtonScope,
    id: Uuid,
    payload: UpdateBotButtonRequest,
) -> AppResult<ApiResponse<BotButton>> {
    let existing = find_button(state, scope, id).await?;

    let mut active: ButtonActive = existing.into();
    if let Some(text) = payload.text {
        let text = text.trim().to_string();
        if text.is_empty() {
            return Err(AppError::BadRequest("Button text is required".into()));
        }
        active.text = Set(text);
    }
    if let Some(action) = payload.action {
        active.action = Set(Some(action).filter(|a| !a.trim().is_empty()));
    }
    if let Some(order_index) = payload.order_index {
        active.order_index = Set(order_index);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    let button = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "bot_button_update",
        "bot_buttons",
        serde_json::json!({ "button_id": button.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Button updated",
        BotButton::from(button),
        Some(Meta::empty()),
    ))
}

pub async fn delete_button(
    state: &AppState,
    user: &AuthUser,
    scope: ButtonScope,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let existing = find_button(state, scope, id).await?;
    BotButtons::delete_by_id(existing.id)
        .exec(&state.orm)
        .await?;

    audit::record(
        state,
        Some(user.user_id),
        "bot_button_delete",
        "bot_buttons",
        serde_json::json!({ "button_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}
