pub mod api;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod media;

/// Embedded schema migrations, shared by the server binary and the tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!();
