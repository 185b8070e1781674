use marketplace_admin_api::{
    config::AppConfig,
    db::{create_orm_conn, run_migrations},
    dto::{
        bot::{CreateBotButtonRequest, SaveResponseRequest, SaveWelcomeMessageRequest},
        cart::AddToCartRequest,
        orders::{CheckoutItem, CheckoutRequest, UpdateOrderStatusRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        stores::{CreateStoreRequest, NewStoreOwner, UpdateStoreSettingsRequest},
    },
    error::AppError,
    middleware::auth::AuthUser,
    models::{ResponseKey, Role},
    routes::params::{OrderListQuery, ProductQuery},
    services::{
        admin_service, auth_service, bot_service, cart_service, order_service, product_service,
        store_portal_service, store_service,
    },
    state::AppState,
};
use sea_orm::{ConnectionTrait, Statement};
use uuid::Uuid;

// Integration flow: admin onboards two stores and their products, a guest and a
// client check out, store owners work their orders, admin edits bot content.
#[tokio::test]
async fn marketplace_operations_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;

    let admin_model =
        auth_service::create_user(&state.orm, "admin@example.com", "Admin", "admin123", Role::Admin)
            .await?;
    let admin = AuthUser {
        user_id: admin_model.id,
        role: Role::Admin,
    };

    // Store A gets a brand new owner account.
    let store_a = store_service::create_store(
        &state,
        &admin,
        CreateStoreRequest {
            store_name: "Fresh Market".into(),
            new_owner: Some(NewStoreOwner {
                email: "Owner.A@Example.com".into(),
                name: "Owner A".into(),
                password: "secret-a".into(),
            }),
            existing_user_id: None,
        },
    )
    .await?
    .data
    .expect("store a");
    assert_eq!(store_a.status, "active");
    assert_eq!(store_a.delivery_price, 0);

    // Store B is handed to an existing client, who becomes a store user.
    let client_b =
        auth_service::create_user(&state.orm, "b@example.com", "Owner B", "secret-b", Role::Client)
            .await?;
    let candidates = store_service::list_owner_candidates(&state, &admin)
        .await?
        .data
        .expect("candidates");
    assert!(candidates.items.iter().any(|u| u.id == client_b.id));

    let store_b = store_service::create_store(
        &state,
        &admin,
        CreateStoreRequest {
            store_name: "Bakery".into(),
            new_owner: None,
            existing_user_id: Some(client_b.id),
        },
    )
    .await?
    .data
    .expect("store b");

    // The promoted owner still holds a token issued with the client role.
    let stale_token = AuthUser {
        user_id: client_b.id,
        role: Role::Client,
    };
    let promoted_store = store_portal_service::my_store(&state, &stale_token)
        .await?
        .data
        .expect("promoted store");
    assert_eq!(promoted_store.id, store_b.id);

    let stores = store_service::list_stores(&state, &admin)
        .await?
        .data
        .expect("stores");
    assert_eq!(stores.items.len(), 2);
    let listed_a = stores
        .items
        .iter()
        .find(|s| s.store.id == store_a.id)
        .expect("store a listed");
    assert_eq!(listed_a.owner.email, "owner.a@example.com");
    assert_eq!(
        listed_a.credentials.as_ref().map(|c| c.password.as_str()),
        Some("secret-a")
    );
    let listed_b = stores
        .items
        .iter()
        .find(|s| s.store.id == store_b.id)
        .expect("store b listed");
    assert!(listed_b.credentials.is_none());

    let settings = store_service::update_store_settings(
        &state,
        &admin,
        store_a.id,
        UpdateStoreSettingsRequest {
            status: "paused".into(),
            working_hours: Some("09:00-18:00".into()),
            delivery_radius: 4.5,
            delivery_price: 900,
        },
    )
    .await?
    .data
    .expect("settings");
    assert_eq!(settings.status, "paused");
    assert_eq!(settings.delivery_radius, 4.5);

    let bad_settings = store_service::update_store_settings(
        &state,
        &admin,
        store_a.id,
        UpdateStoreSettingsRequest {
            status: "active".into(),
            working_hours: None,
            delivery_radius: -1.0,
            delivery_price: 0,
        },
    )
    .await;
    assert!(matches!(bad_settings, Err(AppError::BadRequest(_))));

    let owner_a = AuthUser {
        user_id: store_a.owner_id,
        role: Role::Store,
    };
    let owner_b = AuthUser {
        user_id: client_b.id,
        role: Role::Store,
    };

    // Catalog
    let apples = create_product(&state, &admin, store_a.id, "Apples", 2000, 10).await?;
    let bread = create_product(&state, &admin, store_b.id, "Bread", 500, 5).await?;
    assert_eq!(apples.sale_type, "by_piece");
    assert_eq!(apples.min_order, 1);
    assert_eq!(apples.image_url, None);

    let search = product_service::list_products(
        &state,
        &admin,
        ProductQuery {
            q: Some("bakery".into()),
            ..ProductQuery::default()
        },
    )
    .await?
    .data
    .expect("search");
    assert_eq!(search.items.len(), 1);
    assert_eq!(search.items[0].id, bread.id);
    assert_eq!(search.items[0].store_name.as_deref(), Some("Bakery"));

    // Guest checkout across both stores.
    let guest_order = order_service::checkout(
        &state,
        None,
        CheckoutRequest {
            delivery_address: "Main street 1".into(),
            phone: "+998901234567".into(),
            items: vec![
                CheckoutItem {
                    product_id: apples.id,
                    quantity: 2,
                },
                CheckoutItem {
                    product_id: bread.id,
                    quantity: 1,
                },
                CheckoutItem {
                    product_id: apples.id,
                    quantity: 1,
                },
            ],
            guest_name: Some("Guest".into()),
            guest_email: Some("guest@example.com".into()),
        },
    )
    .await?
    .data
    .expect("guest order");
    assert_eq!(guest_order.order.status, "pending");
    assert_eq!(guest_order.order.user_id, None);
    assert_eq!(guest_order.order.total_amount, 3 * 2000 + 500);
    assert_eq!(guest_order.items.len(), 2);

    let too_many = order_service::checkout(
        &state,
        None,
        CheckoutRequest {
            delivery_address: "Main street 1".into(),
            phone: "+998901234567".into(),
            items: vec![CheckoutItem {
                product_id: bread.id,
                quantity: 50,
            }],
            guest_name: Some("Guest".into()),
            guest_email: Some("guest@example.com".into()),
        },
    )
    .await;
    assert!(matches!(too_many, Err(AppError::BadRequest(_))));

    let anonymous = order_service::checkout(
        &state,
        None,
        CheckoutRequest {
            delivery_address: "Main street 1".into(),
            phone: "+998901234567".into(),
            items: vec![CheckoutItem {
                product_id: bread.id,
                quantity: 1,
            }],
            guest_name: None,
            guest_email: None,
        },
    )
    .await;
    assert!(matches!(anonymous, Err(AppError::BadRequest(_))));

    // Signed-in client checks out the stored cart.
    let client_model = auth_service::create_user(
        &state.orm,
        "client@example.com",
        "Client",
        "client123",
        Role::Client,
    )
    .await?;
    let client = AuthUser {
        user_id: client_model.id,
        role: Role::Client,
    };
    let not_owner = store_portal_service::my_store(&state, &client).await;
    assert!(matches!(not_owner, Err(AppError::Forbidden)));

    cart_service::add_to_cart(
        &state,
        &client,
        AddToCartRequest {
            product_id: bread.id,
            quantity: 2,
        },
    )
    .await?;
    let cart = cart_service::list_cart(&state, &client)
        .await?
        .data
        .expect("cart");
    assert_eq!(cart.total_amount, 1000);

    let client_order = order_service::checkout(
        &state,
        Some(&client),
        CheckoutRequest {
            delivery_address: "Second street 2".into(),
            phone: "+998907654321".into(),
            items: vec![],
            guest_name: None,
            guest_email: None,
        },
    )
    .await?
    .data
    .expect("client order");
    assert_eq!(client_order.order.user_id, Some(client.user_id));
    assert_eq!(client_order.order.total_amount, 1000);
    let cart = cart_service::list_cart(&state, &client)
        .await?
        .data
        .expect("cart");
    assert!(cart.items.is_empty());

    // Stock went down: bread 5 - 1 - 2.
    let bread_now = product_service::get_product(&state, bread.id)
        .await?
        .data
        .expect("bread");
    assert_eq!(bread_now.stock, 2);

    // Store A only sees its own orders and its own lines.
    let a_orders = store_portal_service::list_store_orders(&state, &owner_a, OrderListQuery::default())
        .await?
        .data
        .expect("store a orders");
    assert_eq!(a_orders.items.len(), 1);
    assert_eq!(a_orders.items[0].order.id, guest_order.order.id);
    assert!(
        a_orders.items[0]
            .items
            .iter()
            .all(|item| item.store_id == Some(store_a.id))
    );

    let b_orders = store_portal_service::list_store_orders(&state, &owner_b, OrderListQuery::default())
        .await?
        .data
        .expect("store b orders");
    assert_eq!(b_orders.items.len(), 2);

    let foreign = store_portal_service::update_store_order_status(
        &state,
        &owner_a,
        client_order.order.id,
        UpdateOrderStatusRequest {
            status: "processing".into(),
        },
    )
    .await;
    assert!(matches!(foreign, Err(AppError::NotFound)));

    let processing = store_portal_service::update_store_order_status(
        &state,
        &owner_a,
        guest_order.order.id,
        UpdateOrderStatusRequest {
            status: "processing".into(),
        },
    )
    .await?
    .data
    .expect("processing");
    assert_eq!(processing.status, "processing");

    // Admin may move an order to any status, backwards included.
    let completed = admin_service::update_order_status(
        &state,
        &admin,
        client_order.order.id,
        UpdateOrderStatusRequest {
            status: "completed".into(),
        },
    )
    .await?
    .data
    .expect("completed");
    assert_eq!(completed.status, "completed");

    let reopened = admin_service::update_order_status(
        &state,
        &admin,
        client_order.order.id,
        UpdateOrderStatusRequest {
            status: "pending".into(),
        },
    )
    .await?
    .data
    .expect("reopened");
    assert_eq!(reopened.status, "pending");

    let invalid = admin_service::update_order_status(
        &state,
        &admin,
        client_order.order.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await;
    assert!(matches!(invalid, Err(AppError::BadRequest(_))));

    let forbidden = admin_service::list_all_orders(&state, &owner_a, OrderListQuery::default()).await;
    assert!(matches!(forbidden, Err(AppError::Forbidden)));

    let by_phone = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            q: Some("7654321".into()),
            ..OrderListQuery::default()
        },
    )
    .await?
    .data
    .expect("by phone");
    assert_eq!(by_phone.items.len(), 1);
    assert_eq!(by_phone.items[0].order.id, client_order.order.id);

    let by_status = admin_service::list_all_orders(
        &state,
        &admin,
        OrderListQuery {
            status: Some("processing".into()),
            ..OrderListQuery::default()
        },
    )
    .await?
    .data
    .expect("by status");
    assert_eq!(by_status.items.len(), 1);
    assert_eq!(by_status.items[0].items.len(), 2);

    // Statistics of store B: two orders, bread revenue 500 + 1000.
    let report = store_portal_service::store_statistics(&state, &owner_b)
        .await?
        .data
        .expect("report");
    assert_eq!(report.stats.total_orders, 2);
    assert_eq!(report.stats.total_revenue, 1500);
    assert_eq!(report.stats.pending_orders, 2);
    assert_eq!(report.stats.today_orders, 2);
    assert_eq!(report.top_products.len(), 1);
    assert_eq!(report.top_products[0].quantity, 3);

    // Ordered products cannot be deleted.
    let delete = product_service::delete_product(&state, &admin, bread.id).await;
    assert!(matches!(delete, Err(AppError::BadRequest(_))));

    // Bot content
    bot_service::save_welcome_message(
        &state,
        &admin,
        SaveWelcomeMessageRequest {
            message: "Xush kelibsiz!".into(),
        },
    )
    .await?;
    let main_scope = bot_service::scope_for(&state, &admin, true).await?;
    bot_service::create_button(
        &state,
        &admin,
        main_scope,
        CreateBotButtonRequest {
            text: "Sayt haqida".into(),
            action: None,
            order_index: None,
            is_active: None,
        },
    )
    .await?;
    bot_service::save_button_response(
        &state,
        &admin,
        ResponseKey::BecomeSeller,
        SaveResponseRequest {
            text: "Sotuvchi bo'ling\nAriza qoldiring".into(),
        },
    )
    .await?;
    bot_service::save_button_response(
        &state,
        &admin,
        ResponseKey::BecomeSeller,
        SaveResponseRequest {
            text: "Hamkor bo'ling\nBiz bilan bog'laning".into(),
        },
    )
    .await?;

    let store_scope = bot_service::scope_for(&state, &owner_a, false).await?;
    bot_service::create_button(
        &state,
        &owner_a,
        store_scope,
        CreateBotButtonRequest {
            text: "Menu".into(),
            action: Some("menu".into()),
            order_index: None,
            is_active: None,
        },
    )
    .await?;

    let overview = bot_service::get_bot_overview(&state, &admin)
        .await?
        .data
        .expect("overview");
    assert_eq!(overview.welcome_message, "Xush kelibsiz!");
    assert_eq!(overview.buttons.len(), 1);
    assert_eq!(overview.buttons[0].response_key, Some(ResponseKey::SiteAbout));
    assert_eq!(overview.become_seller.title, "Hamkor bo'ling");
    assert_eq!(overview.become_seller.content, "Biz bilan bog'laning");

    let store_buttons = bot_service::list_buttons(&state, store_scope)
        .await?
        .data
        .expect("store buttons");
    assert_eq!(store_buttons.items.len(), 1);
    assert_eq!(store_buttons.items[0].store_id, Some(store_a.id));

    let not_admin = bot_service::scope_for(&state, &owner_a, true).await;
    assert!(matches!(not_admin, Err(AppError::Forbidden)));

    assert_eq!(
        overview.become_seller_text,
        "Hamkor bo'ling\n\nBiz bilan bog'laning"
    );

    // A button at the top index does not push the next one past it.
    bot_service::create_button(
        &state,
        &admin,
        main_scope,
        CreateBotButtonRequest {
            text: "Sotuvchi bo'lish".into(),
            action: None,
            order_index: Some(i32::MAX),
            is_active: None,
        },
    )
    .await?;
    let appended = bot_service::create_button(
        &state,
        &admin,
        main_scope,
        CreateBotButtonRequest {
            text: "Aloqa".into(),
            action: None,
            order_index: None,
            is_active: None,
        },
    )
    .await?
    .data
    .expect("appended button");
    assert_eq!(appended.order_index, i32::MAX);

    // Max order and category can be cleared with an explicit null.
    let milk = create_product(&state, &admin, store_a.id, "Milk", 1200, 20).await?;
    let limited = product_service::update_product(
        &state,
        &admin,
        milk.id,
        UpdateProductRequest {
            max_order: Some(Some(5)),
            ..UpdateProductRequest::default()
        },
    )
    .await?
    .data
    .expect("limited");
    assert_eq!(limited.max_order, Some(5));
    let unlimited = product_service::update_product(
        &state,
        &admin,
        milk.id,
        UpdateProductRequest {
            max_order: Some(None),
            category_id: Some(None),
            ..UpdateProductRequest::default()
        },
    )
    .await?
    .data
    .expect("unlimited");
    assert_eq!(unlimited.max_order, None);
    assert_eq!(unlimited.category_id, None);

    // Checking out explicit items still empties the client's cart.
    cart_service::add_to_cart(
        &state,
        &client,
        AddToCartRequest {
            product_id: apples.id,
            quantity: 1,
        },
    )
    .await?;
    let explicit_order = order_service::checkout(
        &state,
        Some(&client),
        CheckoutRequest {
            delivery_address: "Second street 2".into(),
            phone: "+998907654321".into(),
            items: vec![CheckoutItem {
                product_id: milk.id,
                quantity: 3,
            }],
            guest_name: None,
            guest_email: None,
        },
    )
    .await?
    .data
    .expect("explicit order");
    assert_eq!(explicit_order.order.total_amount, 3 * 1200);
    assert_eq!(explicit_order.items.len(), 1);
    let cart = cart_service::list_cart(&state, &client)
        .await?
        .data
        .expect("cart");
    assert!(cart.items.is_empty());

    Ok(())
}

async fn create_product(
    state: &AppState,
    admin: &AuthUser,
    store_id: Uuid,
    name: &str,
    price: i64,
    stock: i32,
) -> anyhow::Result<marketplace_admin_api::models::Product> {
    let product = product_service::create_product(
        state,
        admin,
        CreateProductRequest {
            name: name.into(),
            description: Some(format!("{name} for testing")),
            price,
            stock,
            image_url: Some("   ".into()),
            store_id,
            category_id: None,
            is_active: None,
            sale_type: None,
            package_type: None,
            min_order: None,
            max_order: None,
            badge: None,
        },
    )
    .await?
    .data
    .expect("product");
    Ok(product)
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    // Clean tables between runs
    let backend = orm.get_database_backend();
    orm.execute(Statement::from_string(
        backend,
        "TRUNCATE TABLE order_items, orders, cart_items, bot_buttons, bot_settings, site_settings, \
         become_seller_pages, store_credentials, products, product_categories, stores, audit_logs, users CASCADE",
    ))
    .await?;

    let config = AppConfig {
        database_url: database_url.to_string(),
        host: "127.0.0.1".into(),
        port: 0,
        upload_dir: std::env::temp_dir().to_string_lossy().into_owned(),
        public_upload_url: "/uploads".into(),
        max_upload_bytes: 1024 * 1024,
    };
    Ok(AppState::new(orm, config))
}
