use marketplace_admin_api::{
    config::AppConfig,
    db::{DbPool, create_orm_conn, run_migrations},
    dto::bot::{BecomeSellerPage, SITE_ABOUT_KEY, WELCOME_MESSAGE_KEY},
    models::Role,
    services::auth_service::hash_password,
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let orm = create_orm_conn(&config.database_url).await?;
    run_migrations(&orm).await?;
    let pool = orm.get_postgres_connection_pool().clone();

    let admin_id = ensure_user(&pool, "admin@example.com", "Admin", "admin123", Role::Admin).await?;
    let owner_id =
        ensure_user(&pool, "store@example.com", "Store Owner", "store123", Role::Store).await?;
    let client_id = ensure_user(&pool, "client@example.com", "Client", "client123", Role::Client).await?;

    let store_id = ensure_store(&pool, owner_id, "Fresh Market").await?;
    let category_ids = seed_categories(&pool).await?;
    seed_products(&pool, store_id, &category_ids).await?;
    seed_bot(&pool).await?;

    println!(
        "Seed completed. Admin ID: {admin_id}, Store owner ID: {owner_id}, Client ID: {client_id}, Store ID: {store_id}"
    );
    Ok(())
}

async fn ensure_user(
    pool: &DbPool,
    email: &str,
    name: &str,
    password: &str,
    role: Role,
) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, name, password_hash, role)
        VALUES ($1, $2, $3, $4, $5)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(name)
    .bind(password_hash)
    .bind(role.as_str())
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={})", role.as_str());
    Ok(user_id)
}

async fn ensure_store(pool: &DbPool, owner_id: Uuid, name: &str) -> anyhow::Result<Uuid> {
    let existing: Option<(Uuid,)> =
        sqlx::query_as("SELECT id FROM stores WHERE owner_id = $1 ORDER BY created_at LIMIT 1")
            .bind(owner_id)
            .fetch_optional(pool)
            .await?;
    if let Some((id,)) = existing {
        return Ok(id);
    }

    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO stores (id, name, owner_id, status, working_hours, delivery_radius, delivery_price)
        VALUES ($1, $2, $3, 'active', '09:00-21:00', 5, 1000000)
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(owner_id)
    .fetch_one(pool)
    .await?;

    println!("Created store {name}");
    Ok(id)
}

async fn seed_categories(pool: &DbPool) -> anyhow::Result<Vec<Uuid>> {
    let categories = ["Fruits", "Vegetables", "Dairy", "Bakery"];
    let mut ids = Vec::with_capacity(categories.len());

    for (index, name) in categories.iter().enumerate() {
        let (id,): (Uuid,) = sqlx::query_as(
            r#"
            INSERT INTO product_categories (id, name, order_index)
            VALUES ($1, $2, $3)
            ON CONFLICT (name) DO UPDATE SET order_index = EXCLUDED.order_index
            RETURNING id
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(index as i32)
        .fetch_one(pool)
        .await?;
        ids.push(id);
    }

    println!("Seeded categories");
    Ok(ids)
}

async fn seed_products(pool: &DbPool, store_id: Uuid, categories: &[Uuid]) -> anyhow::Result<()> {
    // (name, description, price, stock, category, sale_type)
    let products = [
        ("Apples", "Red apples, priced per kilogram", 1_800_000_i64, 50_000, 0, "by_weight"),
        ("Tomatoes", "Greenhouse tomatoes", 2_200_000, 30_000, 1, "by_weight"),
        ("Milk 1L", "Whole milk", 1_200_000, 40, 2, "by_piece"),
        ("Bread", "Fresh white loaf", 500_000, 60, 3, "by_piece"),
    ];

    for (name, description, price, stock, category, sale_type) in products {
        sqlx::query(
            r#"
            INSERT INTO products (id, name, description, price, stock, store_id, category_id, sale_type)
            SELECT $1, $2, $3, $4, $5, $6, $7, $8
            WHERE NOT EXISTS (SELECT 1 FROM products WHERE store_id = $6 AND name = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(name)
        .bind(description)
        .bind(price)
        .bind(stock)
        .bind(store_id)
        .bind(categories.get(category).copied())
        .bind(sale_type)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}

async fn seed_bot(pool: &DbPool) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO bot_settings (id, key, value, description)
        VALUES ($1, $2, $3, 'Bot welcome message')
        ON CONFLICT (key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(WELCOME_MESSAGE_KEY)
    .bind("Assalomu alaykum! Marketplace botiga xush kelibsiz.")
    .execute(pool)
    .await?;

    let buttons = [("Sayt haqida", 0), ("Sotuvchi bo'lish", 1)];
    for (text, order_index) in buttons {
        sqlx::query(
            r#"
            INSERT INTO bot_buttons (id, text, order_index)
            SELECT $1, $2, $3
            WHERE NOT EXISTS (SELECT 1 FROM bot_buttons WHERE store_id IS NULL AND text = $2)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(text)
        .bind(order_index)
        .execute(pool)
        .await?;
    }

    sqlx::query(
        r#"
        INSERT INTO site_settings (id, key, value, description)
        VALUES ($1, $2, $3, 'Answer for the site about button')
        ON CONFLICT (key) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(SITE_ABOUT_KEY)
    .bind("Marketplace: local stores, one checkout.")
    .execute(pool)
    .await?;

    let page = BecomeSellerPage::from_text(
        "Sotuvchi bo'lish\nDo'koningizni ochish uchun administrator bilan bog'laning.",
    );
    sqlx::query(
        r#"
        INSERT INTO become_seller_pages (id, title, content)
        SELECT $1, $2, $3
        WHERE NOT EXISTS (SELECT 1 FROM become_seller_pages WHERE is_active)
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(page.title)
    .bind(page.content)
    .execute(pool)
    .await?;

    println!("Seeded bot content");
    Ok(())
}
