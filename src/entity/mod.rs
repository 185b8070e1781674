pub mod become_seller_pages;
pub mod bot_buttons;
pub mod bot_settings;
pub mod cart_items;
pub mod order_items;
pub mod orders;
pub mod product_categories;
pub mod products;
pub mod site_settings;
pub mod store_credentials;
pub mod stores;
pub mod users;

pub use become_seller_pages::Entity as BecomeSellerPages;
pub use bot_buttons::Entity as BotButtons;
pub use bot_settings::Entity as BotSettings;
pub use cart_items::Entity as CartItems;
pub use order_items::Entity as OrderItems;
pub use orders::Entity as Orders;
pub use product_categories::Entity as ProductCategories;
pub use products::Entity as Products;
pub use site_settings::Entity as SiteSettings;
pub use store_credentials::Entity as StoreCredentials;
pub use stores::Entity as Stores;
pub use users::Entity as Users;
