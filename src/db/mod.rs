//! Database layer
//!
//! Holds the `users` table and nothing else. Two backends are supported:
//! - SQLite (default, zero setup)
//! - MySQL
//!
//! The backend is picked from [`DatabaseConfig`](crate::config::DatabaseConfig)
//! and hidden behind the [`DatabasePool`] trait, so repositories dispatch on
//! [`DatabasePool::driver`] instead of carrying generic parameters.
//!
//! ```ignore
//! let pool = izma::db::create_pool(&config.database).await?;
//! izma::db::migrations::run_migrations(&pool).await?;
//! ```

pub mod migrations;
pub mod pool;
pub mod repositories;

pub use pool::{
    create_pool, create_test_pool, DatabasePool, DynDatabasePool, MysqlDatabase, SqliteDatabase,
};
