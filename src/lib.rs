pub mod app_state;
pub mod auth;
pub mod config;
pub mod context;
pub mod entities;
pub mod extract;
pub mod extraction;
pub mod health;
pub mod import;
pub mod items;
pub mod passwords;
pub mod repositories;
pub mod routes;
pub mod telemetry;
