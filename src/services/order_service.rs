use std::collections::HashMap;

use sea_orm::{
    ActiveModelTrait, ActiveValue::NotSet, ColumnTrait, Condition, ConnectionTrait, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, QuerySelect, Select, Set, TransactionTrait,
};
use sea_orm::sea_query::{Expr, LockType, extension::postgres::PgExpr};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CheckoutItem, CheckoutRequest, OrderList, OrderWithItems},
    dto::products::non_blank,
    entity::{
        cart_items::{Column as CartCol, Entity as CartItems},
        order_items::{ActiveModel as OrderItemActive, Column as OrderItemCol, Entity as OrderItems},
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::{Column as ProdCol, Entity as Products, Model as ProductModel},
        stores::{Column as StoreCol, Entity as Stores},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderItem, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder, like_pattern},
    state::AppState,
};

/// Status and free-text filters shared by every order listing.
pub fn order_condition(query: &OrderListQuery) -> AppResult<Condition> {
    let mut condition = Condition::all();
    if let Some(status) = query.status_filter()? {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    if let Some(pattern) = like_pattern(query.q.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::cust_with_values(
                    r#"CAST("orders"."id" AS TEXT) ILIKE ?"#,
                    [pattern.clone()],
                ))
                .add(Expr::col(OrderCol::Phone).ilike(pattern.clone()))
                .add(Expr::col(OrderCol::DeliveryAddress).ilike(pattern.clone()))
                .add(Expr::col(OrderCol::GuestName).ilike(pattern.clone()))
                .add(Expr::col(OrderCol::GuestEmail).ilike(pattern)),
        );
    }
    Ok(condition)
}

/// Run a filtered order listing: sort, count, page and attach line items.
/// With `store_scope` only that store's items are attached.
pub async fn paginate_orders(
    state: &AppState,
    finder: Select<Orders>,
    query: &OrderListQuery,
    store_scope: Option<Uuid>,
) -> AppResult<(OrderList, Meta)> {
    let (page, limit, offset) = query.pagination().normalize();
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let orders = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<Uuid> = orders.iter().map(|o| o.id).collect();
    let mut items = load_items(&state.orm, &ids, store_scope).await?;

    let items = orders
        .into_iter()
        .map(|order| OrderWithItems {
            items: items.remove(&order.id).unwrap_or_default(),
            order: Order::from(order),
        })
        .collect();

    Ok((OrderList { items }, Meta::paged(page, limit, total)))
}

/// Line items of the given orders keyed by order id, joined with product and store names.
pub async fn load_items<C: ConnectionTrait>(
    conn: &C,
    order_ids: &[Uuid],
    store_scope: Option<Uuid>,
) -> AppResult<HashMap<Uuid, Vec<OrderItem>>> {
    if order_ids.is_empty() {
        return Ok(HashMap::new());
    }

    let rows = OrderItems::find()
        .filter(OrderItemCol::OrderId.is_in(order_ids.iter().copied()))
        .order_by_asc(OrderItemCol::CreatedAt)
        .find_also_related(Products)
        .all(conn)
        .await?;

    let store_ids: Vec<Uuid> = rows
        .iter()
        .filter_map(|(_, product)| product.as_ref().map(|p| p.store_id))
        .collect();
    let store_names = store_names(conn, store_ids).await?;

    let mut grouped: HashMap<Uuid, Vec<OrderItem>> = HashMap::new();
    for (item, product) in rows {
        let store_id = product.as_ref().map(|p| p.store_id);
        if let Some(scope) = store_scope {
            if store_id != Some(scope) {
                continue;
            }
        }
        grouped.entry(item.order_id).or_default().push(OrderItem {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: product.map(|p| p.name),
            store_id,
            store_name: store_id.and_then(|id| store_names.get(&id).cloned()),
            quantity: item.quantity,
            price: item.price,
        });
    }
    Ok(grouped)
}

pub async fn store_names<C: ConnectionTrait>(
    conn: &C,
    store_ids: Vec<Uuid>,
) -> AppResult<HashMap<Uuid, String>> {
    if store_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let stores = Stores::find()
        .filter(StoreCol::Id.is_in(store_ids))
        .all(conn)
        .await?;
    Ok(stores.into_iter().map(|s| (s.id, s.name)).collect())
}

pub async fn load_order<C: ConnectionTrait>(
    conn: &C,
    condition: Condition,
    store_scope: Option<Uuid>,
) -> AppResult<OrderWithItems> {
    let order = Orders::find().filter(condition).one(conn).await?;
    let order = match order {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };

    let items = load_items(conn, &[order.id], store_scope)
        .await?
        .remove(&order.id)
        .unwrap_or_default();

    Ok(OrderWithItems {
        order: Order::from(order),
        items,
    })
}

/// Set a new status on an order. Any status may follow any other.
pub async fn apply_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    status: OrderStatus,
) -> AppResult<Order> {
    let existing = Orders::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(o) => o,
        None => return Err(AppError::NotFound),
    };
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(chrono::Utc::now().into());
    let order = active.update(&state.orm).await?;

    tracing::info!(order_id = %order.id, from = %previous, to = %status, "order status changed");
    audit::record(
        state,
        Some(user.user_id),
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": previous, "status": order.status }),
    )
    .await;

    Ok(Order::from(order))
}

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let condition = order_condition(&query)?.add(OrderCol::UserId.eq(user.user_id));
    let (list, meta) = paginate_orders(state, Orders::find().filter(condition), &query, None).await?;
    Ok(ApiResponse::success("Ok", list, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let condition = Condition::all()
        .add(OrderCol::UserId.eq(user.user_id))
        .add(OrderCol::Id.eq(id));
    let data = load_order(&state.orm, condition, None).await?;
    Ok(ApiResponse::success("OK", data, Some(Meta::empty())))
}

fn quantity_overflow() -> AppError {
    AppError::BadRequest("Order quantity is too large".into())
}

/// Fold repeated products into one line.
pub fn merge_lines(items: &[CheckoutItem]) -> AppResult<Vec<CheckoutItem>> {
    let mut merged: Vec<CheckoutItem> = Vec::with_capacity(items.len());
    for item in items {
        match merged.iter_mut().find(|m| m.product_id == item.product_id) {
            Some(existing) => {
                existing.quantity = existing
                    .quantity
                    .checked_add(item.quantity)
                    .ok_or_else(quantity_overflow)?;
            }
            None => merged.push(item.clone()),
        }
    }
    Ok(merged)
}

/// Price of one line, rejected when it does not fit the order total.
pub fn line_total(price: i64, quantity: i32) -> AppResult<i64> {
    price
        .checked_mul(i64::from(quantity))
        .ok_or_else(quantity_overflow)
}

/// Check one checkout line against the product row it refers to.
pub fn validate_line(product: &ProductModel, quantity: i32) -> AppResult<()> {
    if quantity <= 0 {
        return Err(AppError::BadRequest("Quantity must be greater than 0".into()));
    }
    if !product.is_active {
        return Err(AppError::BadRequest(format!(
            "Product {} is not available",
            product.name
        )));
    }
    if quantity < product.min_order {
        return Err(AppError::BadRequest(format!(
            "Minimum order for {} is {}",
            product.name, product.min_order
        )));
    }
    if let Some(max) = product.max_order {
        if quantity > max {
            return Err(AppError::BadRequest(format!(
                "Maximum order for {} is {}",
                product.name, max
            )));
        }
    }
    if product.stock < quantity {
        return Err(AppError::BadRequest(format!(
            "Insufficient stock for product {}",
            product.name
        )));
    }
    Ok(())
}

pub async fn checkout(
    state: &AppState,
    user: Option<&AuthUser>,
    payload: CheckoutRequest,
) -> AppResult<ApiResponse<OrderWithItems>> {
    let delivery_address = non_blank(Some(payload.delivery_address))
        .ok_or_else(|| AppError::BadRequest("Delivery address is required".into()))?;
    let phone = non_blank(Some(payload.phone))
        .ok_or_else(|| AppError::BadRequest("Phone is required".into()))?;

    let (user_id, guest_name, guest_email) = match user {
        Some(u) => (Some(u.user_id), None, None),
        None => {
            let name = non_blank(payload.guest_name);
            let email = non_blank(payload.guest_email);
            match (name, email) {
                (Some(name), Some(email)) => (None, Some(name), Some(email)),
                _ => {
                    return Err(AppError::BadRequest(
                        "Guest name and email are required".into(),
                    ));
                }
            }
        }
    };

    let txn = state.orm.begin().await?;

    let from_cart = payload.items.is_empty() && user_id.is_some();
    let lines = if from_cart {
        let cart = CartItems::find()
            .filter(CartCol::UserId.eq(user_id))
            .all(&txn)
            .await?;
        cart.into_iter()
            .map(|c| CheckoutItem {
                product_id: c.product_id,
                quantity: c.quantity,
            })
            .collect()
    } else {
        merge_lines(&payload.items)?
    };

    if lines.is_empty() {
        return Err(AppError::BadRequest("Cart is empty".into()));
    }

    let products: HashMap<Uuid, ProductModel> = Products::find()
        .filter(ProdCol::Id.is_in(lines.iter().map(|l| l.product_id)))
        .lock(LockType::Update)
        .all(&txn)
        .await?
        .into_iter()
        .map(|p| (p.id, p))
        .collect();

    let mut total_amount: i64 = 0;
    for line in &lines {
        let product = products.get(&line.product_id).ok_or_else(|| {
            AppError::BadRequest(format!("Product {} not found", line.product_id))
        })?;
        validate_line(product, line.quantity)?;
        total_amount = total_amount
            .checked_add(line_total(product.price, line.quantity)?)
            .ok_or_else(quantity_overflow)?;
    }

    let now = chrono::Utc::now();
    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        guest_name: Set(guest_name),
        guest_email: Set(guest_email),
        total_amount: Set(total_amount),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        delivery_address: Set(delivery_address),
        phone: Set(phone),
        created_at: Set(now.into()),
        updated_at: Set(now.into()),
    }
    .insert(&txn)
    .await?;

    let mut order_items = Vec::with_capacity(lines.len());
    for line in &lines {
        let Some(product) = products.get(&line.product_id) else {
            continue;
        };
        let item = OrderItemActive {
            id: Set(Uuid::new_v4()),
            order_id: Set(order.id),
            product_id: Set(product.id),
            quantity: Set(line.quantity),
            price: Set(product.price),
            created_at: NotSet,
        }
        .insert(&txn)
        .await?;

        Products::update_many()
            .col_expr(ProdCol::Stock, Expr::col(ProdCol::Stock).sub(line.quantity))
            .filter(ProdCol::Id.eq(product.id))
            .exec(&txn)
            .await?;

        order_items.push((item, product.store_id, product.name.clone()));
    }

    // Placing an order empties the client's cart even when the lines came from the request.
    if user_id.is_some() {
        CartItems::delete_many()
            .filter(CartCol::UserId.eq(user_id))
            .exec(&txn)
            .await?;
    }

    let names = store_names(&txn, order_items.iter().map(|(_, s, _)| *s).collect()).await?;

    txn.commit().await?;

    tracing::info!(order_id = %order.id, total = order.total_amount, guest = user_id.is_none(), "order placed");
    audit::record(
        state,
        user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "total_amount": order.total_amount }),
    )
    .await;

    let items = order_items
        .into_iter()
        .map(|(item, store_id, product_name)| OrderItem {
            id: item.id,
            order_id: item.order_id,
            product_id: item.product_id,
            product_name: Some(product_name),
            store_id: Some(store_id),
            store_name: names.get(&store_id).cloned(),
            quantity: item.quantity,
            price: item.price,
        })
        .collect();

    Ok(ApiResponse::success(
        "Checkout success",
        OrderWithItems {
            order: Order::from(order),
            items,
        },
        Some(Meta::empty()),
    ))
}
