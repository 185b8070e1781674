use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{LoginRequest, LoginResponse, RegisterRequest},
        bot::{
            BecomeSellerPage, BotButtonList, BotOverview, CreateBotButtonRequest,
            SaveResponseRequest, SaveWelcomeMessageRequest, UpdateBotButtonRequest,
        },
        cart::{AddToCartRequest, CartLine, CartList},
        orders::{CheckoutItem, CheckoutRequest, OrderList, OrderWithItems, UpdateOrderStatusRequest},
        products::{
            CategoryList, CreateProductRequest, ProductList, ProductStatusRequest,
            UpdateProductRequest,
        },
        statistics::{StatisticsReport, StoreStatistics, TopProduct},
        stores::{
            CreateStoreRequest, NewStoreOwner, StoreCredentialsView, StoreDetails, StoreList,
            StoreOwner, UpdateStoreSettingsRequest, UserList,
        },
        uploads::UploadedImage,
    },
    models::{BotButton, CartItem, Category, Order, OrderItem, Product, ResponseKey, Store, User},
    response::{ApiResponse, Meta},
    routes::{admin, auth, bot, cart, health, orders, params, products, store, stores, uploads},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        products::get_product,
        products::list_categories,
        cart::cart_list,
        cart::add_to_cart,
        cart::remove_from_cart,
        orders::list_orders,
        orders::checkout,
        orders::get_order,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::list_products,
        admin::get_product,
        admin::create_product,
        admin::update_product,
        admin::set_product_active,
        admin::delete_product,
        stores::list_stores,
        stores::list_owner_candidates,
        stores::create_store,
        stores::update_store_settings,
        bot::get_bot_overview,
        bot::save_welcome_message,
        bot::save_button_response,
        bot::list_buttons,
        bot::create_button,
        bot::update_button,
        bot::delete_button,
        store::my_store,
        store::list_store_orders,
        store::get_store_order,
        store::update_store_order_status,
        store::store_statistics,
        store::list_store_buttons,
        store::create_store_button,
        store::update_store_button,
        store::delete_store_button,
        uploads::upload_image
    ),
    components(
        schemas(
            User,
            Product,
            Category,
            Store,
            CartItem,
            Order,
            OrderItem,
            BotButton,
            ResponseKey,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            AddToCartRequest,
            CartLine,
            CartList,
            CheckoutItem,
            CheckoutRequest,
            UpdateOrderStatusRequest,
            OrderList,
            OrderWithItems,
            CreateProductRequest,
            UpdateProductRequest,
            ProductStatusRequest,
            ProductList,
            CategoryList,
            StoreOwner,
            StoreCredentialsView,
            StoreDetails,
            StoreList,
            UserList,
            NewStoreOwner,
            CreateStoreRequest,
            UpdateStoreSettingsRequest,
            BecomeSellerPage,
            BotOverview,
            SaveWelcomeMessageRequest,
            SaveResponseRequest,
            CreateBotButtonRequest,
            UpdateBotButtonRequest,
            BotButtonList,
            StoreStatistics,
            TopProduct,
            StatisticsReport,
            UploadedImage,
            params::Pagination,
            params::ProductQuery,
            params::OrderListQuery,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<OrderWithItems>,
            ApiResponse<OrderList>,
            ApiResponse<StoreList>,
            ApiResponse<BotOverview>,
            ApiResponse<StatisticsReport>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Auth", description = "Registration and login"),
        (name = "Products", description = "Public product endpoints"),
        (name = "Cart", description = "Cart endpoints"),
        (name = "Orders", description = "Checkout and own orders"),
        (name = "Admin", description = "Admin order and product management"),
        (name = "Stores", description = "Admin store onboarding and settings"),
        (name = "Bot", description = "Admin bot content"),
        (name = "Store", description = "Store owner portal"),
        (name = "Uploads", description = "Image uploads"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
