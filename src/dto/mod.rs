pub mod auth;
pub mod bot;
pub mod cart;
pub mod orders;
pub mod products;
pub mod statistics;
pub mod stores;
pub mod uploads;
