use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use sea_orm::sea_query::{Expr, Query, extension::postgres::PgExpr};
use uuid::Uuid;

use crate::{
    audit,
    dto::products::{
        CategoryList, CreateProductRequest, ProductList, ProductStatusRequest,
        UpdateProductRequest, non_blank,
    },
    entity::{
        order_items::{Column as OrderItemCol, Entity as OrderItems},
        product_categories::{Column as CategoryCol, Entity as ProductCategories},
        products::{ActiveModel, Column, Entity as Products, Model as ProductModel},
        stores::{Column as StoreCol, Entity as Stores},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::{Category, Product, SaleType},
    response::{ApiResponse, Meta},
    routes::params::{ProductQuery, ProductSortBy, SortOrder, like_pattern},
    services::order_service::store_names,
    state::AppState,
};

/// Numeric sanity rules shared by create and update.
pub fn validate_product_numbers(
    price: i64,
    stock: i32,
    min_order: i32,
    max_order: Option<i32>,
) -> AppResult<()> {
    if price < 0 {
        return Err(AppError::BadRequest("price cannot be negative".into()));
    }
    if stock < 0 {
        return Err(AppError::BadRequest("stock cannot be negative".into()));
    }
    if min_order < 1 {
        return Err(AppError::BadRequest("min_order must be at least 1".into()));
    }
    if let Some(max) = max_order {
        if max < min_order {
            return Err(AppError::BadRequest(
                "max_order cannot be less than min_order".into(),
            ));
        }
    }
    Ok(())
}

async fn ensure_store_exists(state: &AppState, store_id: Uuid) -> AppResult<()> {
    if Stores::find_by_id(store_id).one(&state.orm).await?.is_none() {
        return Err(AppError::BadRequest("store not found".into()));
    }
    Ok(())
}

async fn ensure_category_exists(state: &AppState, category_id: Option<Uuid>) -> AppResult<()> {
    if let Some(id) = category_id {
        if ProductCategories::find_by_id(id).one(&state.orm).await?.is_none() {
            return Err(AppError::BadRequest("category not found".into()));
        }
    }
    Ok(())
}

async fn with_store_name(state: &AppState, model: ProductModel) -> AppResult<Product> {
    let name = Stores::find_by_id(model.store_id)
        .one(&state.orm)
        .await?
        .map(|s| s.name);
    Ok(Product::from_entity(model, name))
}

/// Admin listing: inactive products included.
pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    query: ProductQuery,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all();

    if let Some(pattern) = like_pattern(query.q.as_deref()) {
        condition = condition.add(
            Condition::any()
                .add(Expr::col(Column::Name).ilike(pattern.clone()))
                .add(Expr::col(Column::Description).ilike(pattern.clone()))
                .add(
                    Column::StoreId.in_subquery(
                        Query::select()
                            .column(StoreCol::Id)
                            .from(Stores)
                            .and_where(Expr::col(StoreCol::Name).ilike(pattern))
                            .to_owned(),
                    ),
                ),
        );
    }

    if let Some(store_id) = query.store_id {
        condition = condition.add(Column::StoreId.eq(store_id));
    }
    if let Some(category_id) = query.category_id {
        condition = condition.add(Column::CategoryId.eq(category_id));
    }
    if let Some(is_active) = query.is_active {
        condition = condition.add(Column::IsActive.eq(is_active));
    }

    let sort_by = query.sort_by.unwrap_or(ProductSortBy::CreatedAt);
    let sort_order = query.sort_order.unwrap_or(SortOrder::Desc);
    let sort_col = match sort_by {
        ProductSortBy::CreatedAt => Column::CreatedAt,
        ProductSortBy::Price => Column::Price,
        ProductSortBy::Name => Column::Name,
    };

    let mut finder = Products::find().filter(condition);
    finder = match sort_order {
        SortOrder::Asc => finder.order_by_asc(sort_col),
        SortOrder::Desc => finder.order_by_desc(sort_col),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let models = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let names = store_names(&state.orm, models.iter().map(|p| p.store_id).collect()).await?;
    let items = models
        .into_iter()
        .map(|p| {
            let store_name = names.get(&p.store_id).cloned();
            Product::from_entity(p, store_name)
        })
        .collect();

    let meta = Meta::paged(page, limit, total);
    let data = ProductList { items };
    Ok(ApiResponse::success("Products", data, Some(meta)))
}

pub async fn get_product(state: &AppState, id: Uuid) -> AppResult<ApiResponse<Product>> {
    let result = Products::find_by_id(id).one(&state.orm).await?;
    let result = match result {
        Some(p) => with_store_name(state, p).await?,
        None => return Err(AppError::NotFound),
    };
    Ok(ApiResponse::success("Product", result, None))
}

pub async fn create_product(
    state: &AppState,
    user: &AuthUser,
    payload: CreateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let name = non_blank(Some(payload.name))
        .ok_or_else(|| AppError::BadRequest("name is required".into()))?;
    let sale_type = match payload.sale_type.as_deref() {
        Some(s) => s.parse::<SaleType>()?,
        None => SaleType::default(),
    };
    let min_order = payload.min_order.unwrap_or(1);
    validate_product_numbers(payload.price, payload.stock, min_order, payload.max_order)?;
    ensure_store_exists(state, payload.store_id).await?;
    ensure_category_exists(state, payload.category_id).await?;

    let active = ActiveModel {
        id: Set(Uuid::new_v4()),
        name: Set(name),
        description: Set(non_blank(payload.description)),
        price: Set(payload.price),
        stock: Set(payload.stock),
        image_url: Set(non_blank(payload.image_url)),
        store_id: Set(payload.store_id),
        category_id: Set(payload.category_id),
        is_active: Set(payload.is_active.unwrap_or(true)),
        sale_type: Set(sale_type.as_str().to_string()),
        package_type: Set(non_blank(payload.package_type)),
        min_order: Set(min_order),
        max_order: Set(payload.max_order),
        badge: Set(non_blank(payload.badge)),
        created_at: Set(Utc::now().into()),
    };
    let product = active.insert(&state.orm).await?;

    tracing::debug!(product_id = %product.id, image = ?product.image_url, "product created");
    audit::record(
        state,
        Some(user.user_id),
        "product_create",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Product created",
        with_store_name(state, product).await?,
        Some(Meta::empty()),
    ))
}

pub async fn update_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateProductRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let price = payload.price.unwrap_or(existing.price);
    let stock = payload.stock.unwrap_or(existing.stock);
    let min_order = payload.min_order.unwrap_or(existing.min_order);
    let max_order = payload.max_order.unwrap_or(existing.max_order);
    validate_product_numbers(price, stock, min_order, max_order)?;

    if let Some(store_id) = payload.store_id {
        ensure_store_exists(state, store_id).await?;
    }
    ensure_category_exists(state, payload.category_id.flatten()).await?;

    let mut active: ActiveModel = existing.into();
    if let Some(name) = payload.name {
        let name = non_blank(Some(name))
            .ok_or_else(|| AppError::BadRequest("name cannot be blank".into()))?;
        active.name = Set(name);
    }
    if let Some(description) = payload.description {
        active.description = Set(non_blank(Some(description)));
    }
    if let Some(image_url) = payload.image_url {
        active.image_url = Set(non_blank(Some(image_url)));
    }
    if let Some(store_id) = payload.store_id {
        active.store_id = Set(store_id);
    }
    if let Some(category_id) = payload.category_id {
        active.category_id = Set(category_id);
    }
    if let Some(is_active) = payload.is_active {
        active.is_active = Set(is_active);
    }
    if let Some(sale_type) = payload.sale_type {
        active.sale_type = Set(sale_type.parse::<SaleType>()?.as_str().to_string());
    }
    if let Some(package_type) = payload.package_type {
        active.package_type = Set(non_blank(Some(package_type)));
    }
    if let Some(badge) = payload.badge {
        active.badge = Set(non_blank(Some(badge)));
    }
    active.price = Set(price);
    active.stock = Set(stock);
    active.min_order = Set(min_order);
    active.max_order = Set(max_order);

    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_update",
        "products",
        serde_json::json!({ "product_id": product.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        with_store_name(state, product).await?,
        Some(Meta::empty()),
    ))
}

/// Toggle visibility without touching the rest of the product.
pub async fn set_product_active(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: ProductStatusRequest,
) -> AppResult<ApiResponse<Product>> {
    ensure_admin(user)?;
    let existing = Products::find_by_id(id).one(&state.orm).await?;
    let existing = match existing {
        Some(p) => p,
        None => return Err(AppError::NotFound),
    };

    let mut active: ActiveModel = existing.into();
    active.is_active = Set(payload.is_active);
    let product = active.update(&state.orm).await?;

    audit::record(
        state,
        Some(user.user_id),
        "product_status",
        "products",
        serde_json::json!({ "product_id": product.id, "is_active": product.is_active }),
    )
    .await;

    Ok(ApiResponse::success(
        "Status updated",
        with_store_name(state, product).await?,
        Some(Meta::empty()),
    ))
}

pub async fn delete_product(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_admin(user)?;
    // Order lines keep a reference to the product.
    let ordered = OrderItems::find()
        .filter(OrderItemCol::ProductId.eq(id))
        .count(&state.orm)
        .await?;
    if ordered > 0 {
        return Err(AppError::BadRequest(
            "Product has orders; deactivate it instead".into(),
        ));
    }

    let result = Products::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        state,
        Some(user.user_id),
        "product_delete",
        "products",
        serde_json::json!({ "product_id": id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Deleted",
        serde_json::json!({}),
        Some(Meta::empty()),
    ))
}

/// Active categories in display order.
pub async fn list_categories(state: &AppState) -> AppResult<ApiResponse<CategoryList>> {
    let items: Vec<Category> = ProductCategories::find()
        .filter(CategoryCol::IsActive.eq(true))
        .order_by_asc(CategoryCol::OrderIndex)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(Category::from)
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Categories",
        CategoryList { items },
        Some(meta),
    ))
}
