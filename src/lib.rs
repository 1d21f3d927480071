pub mod auth;
pub mod client;
pub mod config;
pub mod db;
pub mod error;
pub mod lifecycle;
pub mod middleware;
pub mod models;
pub mod routes;
pub mod store;
