use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::non_blank,
    dto::stores::{
        CreateStoreRequest, StoreCredentialsView, StoreDetails, StoreList, StoreOwner,
        UpdateStoreSettingsRequest, UserList,
    },
    entity::{
        store_credentials::{
            ActiveModel as CredentialsActive, Column as CredentialsCol,
            Entity as StoreCredentials,
        },
        stores::{ActiveModel as StoreActive, Column as StoreCol, Entity as Stores},
        users::{ActiveModel as UserActive, Column as UserCol, Entity as Users},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Role, Store, StoreStatus, User},
    response::{ApiResponse, Meta},
    services::auth_service::create_user,
    state::AppState,
};

const UNKNOWN_OWNER: &str = "Unknown";

/// Stores newest first, each with its owner and any onboarding credentials.
pub async fn list_stores(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<StoreList>> {
    ensure_admin(user)?;
    let rows = Stores::find()
        .order_by_desc(StoreCol::CreatedAt)
        .find_also_related(Users)
        .all(&state.orm)
        .await?;

    let store_ids: Vec<Uuid> = rows.iter().map(|(s, _)| s.id).collect();
    let mut credentials: HashMap<Uuid, StoreCredentialsView> = StoreCredentials::find()
        .filter(CredentialsCol::StoreId.is_in(store_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|c| {
            (
                c.store_id,
                StoreCredentialsView {
                    email: c.email,
                    password: c.password,
                },
            )
        })
        .collect();

    let items: Vec<StoreDetails> = rows
        .into_iter()
        .map(|(store, owner)| {
            let owner = match owner {
                Some(o) => StoreOwner {
                    name: o.name,
                    email: o.email,
                },
                None => StoreOwner {
                    name: UNKNOWN_OWNER.to_string(),
                    email: String::new(),
                },
            };
            StoreDetails {
                credentials: credentials.remove(&store.id),
                store: Store::from(store),
                owner,
            }
        })
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Stores", StoreList { items }, Some(meta)))
}

/// Plain clients that could be made store owners.
pub async fn list_owner_candidates(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<UserList>> {
    ensure_admin(user)?;
    let items: Vec<User> = Users::find()
        .filter(UserCol::Role.eq(Role::Client.as_str()))
        .order_by_desc(UserCol::CreatedAt)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(User::from)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Users", UserList { items }, Some(meta)))
}

pub async fn create_store(
    state: &AppState,
    user: &AuthUser,
    payload: CreateStoreRequest,
) -> AppResult<ApiResponse<Store>> {
    ensure_admin(user)?;
    let store_name = non_blank(Some(payload.store_name))
        .ok_or_else(|| AppError::BadRequest("Store name is required".into()))?;

    let txn = state.orm.begin().await?;

    let (owner_id, new_owner) = match (payload.new_owner, payload.existing_user_id) {
        (Some(owner), None) => {
            if owner.email.trim().is_empty()
                || owner.name.trim().is_empty()
                || owner.password.is_empty()
            {
                return Err(AppError::BadRequest("All owner fields are required".into()));
            }
            let created =
                create_user(&txn, &owner.email, &owner.name, &owner.password, Role::Store).await?;
            (created.id, Some((created.email, owner.password)))
        }
        (None, Some(user_id)) => {
            let existing = Users::find_by_id(user_id).one(&txn).await?;
            let existing = match existing {
                Some(u) => u,
                None => return Err(AppError::BadRequest("Owner user not found".into())),
            };
            if existing.role == Role::Client.as_str() {
                let mut active: UserActive = existing.into();
                active.role = Set(Role::Store.as_str().to_string());
                active.update(&txn).await?;
            }
            (user_id, None)
        }
        _ => {
            return Err(AppError::BadRequest(
                "Provide either new_owner or existing_user_id".into(),
            ));
        }
    };

    let store = StoreActive {
        id: Set(Uuid::new_v4()),
        name: Set(store_name),
        owner_id: Set(owner_id),
        status: Set(StoreStatus::Active.as_str().to_string()),
        working_hours: Set(None),
        delivery_radius: Set(0.0),
        delivery_price: Set(0),
        created_at: Set(Utc::now().into()),
    }
    .insert(&txn)
    .await?;

    txn.commit().await?;

    // Losing the credentials row does not undo the onboarding.
    if let Some((email, password)) = new_owner {
        let saved = CredentialsActive {
            id: Set(Uuid::new_v4()),
            store_id: Set(store.id),
            owner_id: Set(owner_id),
            email: Set(email),
            password: Set(password),
            created_at: NotSet,
        }
        .insert(&state.orm)
        .await;
        if let Err(err) = saved {
            tracing::warn!(error = %err, store_id = %store.id, "saving store credentials failed");
        }
    }

    tracing::info!(store_id = %store.id, owner_id = %owner_id, "store created");
    audit::record(
        state,
        Some(user.user_id),
        "store_create",
        "stores",
        serde_json::json!({ "store_id": store.id, "owner_id": owner_id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Store created",
        Store::from(store),
        Some(Meta::empty()),
    ))
}

pub async fn update_store_settings(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateStoreSettingsRequest,
) -> AppResult<ApiResponse<Store>> {
    ensure_admin(user)?;
    let status = payload.status.parse::<StoreStatus>()?;
    if !payload.delivery_radius.is_finite() || payload.delivery_radius < 0.0 {
        return Err(AppError::BadRequest("delivery_radius cannot be negative".into()));
    }
    if payload.delivery_price < 0 {
        return Err(AppError::BadRequest("delivery_price cannot be negative".into()));
    }

    let existing = Stores::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(s) => s,
        None => return Err(AppError::NotFound),
    };

    let mut active: StoreActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.working_hours = Set(non_blank(payload.working_hours));
    active.delivery_radius = Set(payload.delivery_radius);
    active.delivery_price = Set(payload.delivery_price);
    let store = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "store_settings_update",
        "stores",
        serde_json::json!({ "store_id": store.id, "status": store.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Store settings saved",
        Store::from(store),
        Some(Meta::empty()),
    ))
}
