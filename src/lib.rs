pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod geolocation;
pub mod handlers;
pub mod models;

pub use db::create_pool;
