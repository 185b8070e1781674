use chrono::Local;
use sea_orm::{ColumnTrait, Condition, EntityTrait, QueryFilter, QueryOrder};
use sea_orm::sea_query::{Expr, Query};
use uuid::Uuid;

use crate::{
    dto::{
        orders::{OrderList, OrderWithItems, UpdateOrderStatusRequest},
        statistics::StatisticsReport,
    },
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems, SellingStore},
        orders::{Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products},
        stores::{Column as StoreCol, Entity as Stores, Model as StoreModel},
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_store_owner},
    models::{Order, OrderStatus, Role, Store},
    response::{ApiResponse, Meta},
    routes::params::OrderListQuery,
    services::{
        order_service::{apply_status, load_order, order_condition, paginate_orders},
        statistics_service::{compute_statistics, load_sale_lines, local_midnight, product_counts},
    },
    state::AppState,
};

/// A client promoted to store owner keeps a `client` token until the next
/// login, so the stored role is consulted when the token disagrees.
async fn ensure_store_role(state: &AppState, user: &AuthUser) -> AppResult<()> {
    if ensure_store_owner(user).is_ok() {
        return Ok(());
    }
    let promoted = Users::find_by_id(user.user_id)
        .one(&state.orm)
        .await?
        .is_some_and(|u| u.role == Role::Store.as_str());
    if promoted { Ok(()) } else { Err(AppError::Forbidden) }
}

/// The store owned by the signed-in store user.
pub async fn resolve_store(state: &AppState, user: &AuthUser) -> AppResult<StoreModel> {
    ensure_store_role(state, user).await?;
    let store = Stores::find()
        .filter(StoreCol::OwnerId.eq(user.user_id))
        .order_by_asc(StoreCol::CreatedAt)
        .one(&state.orm)
        .await?;
    store.ok_or(AppError::NotFound)
}

/// Orders holding at least one line item of the store.
fn store_orders_condition(store_id: Uuid) -> Condition {
    Condition::all().add(
        OrderCol::Id.in_subquery(
            Query::select()
                .column((OrderItems, OrderItemCol::OrderId))
                .from(OrderItems)
                .inner_join(
                    Products,
                    Expr::col((Products, ProdCol::Id)).equals((OrderItems, OrderItemCol::ProductId)),
                )
                .and_where(Expr::col((Products, ProdCol::StoreId)).eq(store_id))
                .to_owned(),
        ),
    )
}

pub async fn my_store(state: &AppState, user: &AuthUser) -> AppResult<ApiResponse<Store>> {
    let store = resolve_store(state, user).await?;
    Ok(ApiResponse::success("Store", Store::from(store), None))
}

pub async fn list_store_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let store = resolve_store(state, user).await?;
    let condition = order_condition(&query)?.add(store_orders_condition(store.id));
    let (list, meta) =
        paginate_orders(state, Orders::find().filter(condition), &query, Some(store.id)).await?;
    Ok(ApiResponse::success("Orders", list, Some(meta)))
}

pub async fn get_store_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let store = resolve_store(state, user).await?;
    let condition = store_orders_condition(store.id).add(OrderCol::Id.eq(id));
    let data = load_order(&state.orm, condition, Some(store.id)).await?;
    Ok(ApiResponse::success("Order found", data, Some(Meta::empty())))
}

/// Store owners may only move orders that contain their products.
pub async fn update_store_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    let store = resolve_store(state, user).await?;
    let status = payload.status.parse::<OrderStatus>()?;

    let owns_line = OrderItems::find()
        .filter(OrderItemCol::OrderId.eq(id))
        .find_also_linked(SellingStore)
        .all(&state.orm)
        .await?
        .into_iter()
        .any(|(_, seller)| seller.is_some_and(|s| s.id == store.id));
    if !owns_line {
        return Err(AppError::NotFound);
    }

    let order = apply_status(state, user, id, status).await?;
    Ok(ApiResponse::success(
        "Order updated",
        order,
        Some(Meta::empty()),
    ))
}

pub async fn store_statistics(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<StatisticsReport>> {
    let store = resolve_store(state, user).await?;
    let (total_products, active_products) = product_counts(&state.pool, store.id).await?;
    let lines = load_sale_lines(&state.pool, store.id).await?;

    let report = compute_statistics(
        &lines,
        total_products,
        active_products,
        local_midnight(Local::now()),
    );
    tracing::debug!(store_id = %store.id, lines = lines.len(), "statistics computed");

    Ok(ApiResponse::success("Statistics", report, Some(Meta::empty())))
}
