//! User repository
//!
//! - `UserRepository` trait defining user data access
//! - `SqlxUserRepository` implementing it for SQLite and MySQL

use crate::config::DatabaseDriver;
use crate::db::DynDatabasePool;
use crate::models::{NewUser, User};
use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{MySqlPool, Row, SqlitePool};
use std::sync::Arc;
use uuid::Uuid;

const SELECT_USER: &str = r#"
    SELECT id, email, password_hash, experience_level, primary_interest, created_at, last_login
    FROM users
"#;

/// User repository trait
#[async_trait]
pub trait UserRepository: Send + Sync {
    /// Insert a new user; fails if the email is already taken
    async fn create(&self, user: NewUser) -> Result<User>;

    /// Get user by ID
    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>>;

    /// Get user by email
    async fn get_by_email(&self, email: &str) -> Result<Option<User>>;

    /// Set `last_login` to `at`; returns false when no row matched
    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool>;

    /// Count total users
    async fn count(&self) -> Result<i64>;
}

/// SQLx-based user repository implementation
pub struct SqlxUserRepository {
    pool: DynDatabasePool,
}

impl SqlxUserRepository {
    pub fn new(pool: DynDatabasePool) -> Self {
        Self { pool }
    }

    /// Create a shared repository for use with dependency injection
    pub fn boxed(pool: DynDatabasePool) -> Arc<dyn UserRepository> {
        Arc::new(Self::new(pool))
    }

    fn sqlite(&self) -> Result<&SqlitePool> {
        self.pool
            .as_sqlite()
            .context("SQLite driver configured without a SQLite pool")
    }

    fn mysql(&self) -> Result<&MySqlPool> {
        self.pool
            .as_mysql()
            .context("MySQL driver configured without a MySQL pool")
    }
}

#[async_trait]
impl UserRepository for SqlxUserRepository {
    async fn create(&self, user: NewUser) -> Result<User> {
        let user = user.into_user();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => insert_user_sqlite(self.sqlite()?, &user).await?,
            DatabaseDriver::Mysql => insert_user_mysql(self.mysql()?, &user).await?,
        }
        Ok(user)
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE id = ?");
        let id = id.to_string();
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(&id)
                    .fetch_optional(self.sqlite()?)
                    .await
                    .context("Failed to get user by ID")?;
                row.as_ref().map(row_to_user_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(&id)
                    .fetch_optional(self.mysql()?)
                    .await
                    .context("Failed to get user by ID")?;
                row.as_ref().map(row_to_user_mysql).transpose()
            }
        }
    }

    async fn get_by_email(&self, email: &str) -> Result<Option<User>> {
        let sql = format!("{SELECT_USER} WHERE email = ?");
        match self.pool.driver() {
            DatabaseDriver::Sqlite => {
                let row = sqlx::query(&sql)
                    .bind(email)
                    .fetch_optional(self.sqlite()?)
                    .await
                    .context("Failed to get user by email")?;
                row.as_ref().map(row_to_user_sqlite).transpose()
            }
            DatabaseDriver::Mysql => {
                let row = sqlx::query(&sql)
                    .bind(email)
                    .fetch_optional(self.mysql()?)
                    .await
                    .context("Failed to get user by email")?;
                row.as_ref().map(row_to_user_mysql).transpose()
            }
        }
    }

    async fn touch_last_login(&self, id: Uuid, at: DateTime<Utc>) -> Result<bool> {
        const SQL: &str = "UPDATE users SET last_login = ? WHERE id = ?";
        let id = id.to_string();
        let affected = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .bind(at)
                .bind(&id)
                .execute(self.sqlite()?)
                .await
                .context("Failed to update last login")?
                .rows_affected(),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .bind(at)
                .bind(&id)
                .execute(self.mysql()?)
                .await
                .context("Failed to update last login")?
                .rows_affected(),
        };
        Ok(affected > 0)
    }

    async fn count(&self) -> Result<i64> {
        const SQL: &str = "SELECT COUNT(*) AS count FROM users";
        let count = match self.pool.driver() {
            DatabaseDriver::Sqlite => sqlx::query(SQL)
                .fetch_one(self.sqlite()?)
                .await
                .context("Failed to count users")?
                .get("count"),
            DatabaseDriver::Mysql => sqlx::query(SQL)
                .fetch_one(self.mysql()?)
                .await
                .context("Failed to count users")?
                .get("count"),
        };
        Ok(count)
    }
}

// ============================================================================
// SQLite implementations
// ============================================================================

async fn insert_user_sqlite(pool: &SqlitePool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, experience_level, primary_interest, created_at, last_login)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.experience_level)
    .bind(&user.primary_interest)
    .bind(user.created_at)
    .bind(user.last_login)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(())
}

fn row_to_user_sqlite(row: &sqlx::sqlite::SqliteRow) -> Result<User> {
    let id: String = row.get("id");
    Ok(User {
        id: Uuid::parse_str(&id).with_context(|| format!("Invalid user id in database: {}", id))?,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        experience_level: row.get("experience_level"),
        primary_interest: row.get("primary_interest"),
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
    })
}

// ============================================================================
// MySQL implementations
// ============================================================================

async fn insert_user_mysql(pool: &MySqlPool, user: &User) -> Result<()> {
    sqlx::query(
        r#"
        INSERT INTO users (id, email, password_hash, experience_level, primary_interest, created_at, last_login)
        VALUES (?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(user.id.to_string())
    .bind(&user.email)
    .bind(&user.password_hash)
    .bind(&user.experience_level)
    .bind(&user.primary_interest)
    .bind(user.created_at)
    .bind(user.last_login)
    .execute(pool)
    .await
    .context("Failed to create user")?;

    Ok(())
}

fn row_to_user_mysql(row: &sqlx::mysql::MySqlRow) -> Result<User> {
    let id: String = row.get("id");
    Ok(User {
        id: Uuid::parse_str(&id).with_context(|| format!("Invalid user id in database: {}", id))?,
        email: row.get("email"),
        password_hash: row.get("password_hash"),
        experience_level: row.get("experience_level"),
        primary_interest: row.get("primary_interest"),
        created_at: row.get("created_at"),
        last_login: row.get("last_login"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_test_pool, migrations};
    use crate::services::password::hash_password;

    async fn setup_test_repo() -> (DynDatabasePool, SqlxUserRepository) {
        let pool = create_test_pool().await.expect("Failed to create test pool");
        migrations::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");
        let repo = SqlxUserRepository::new(pool.clone());
        (pool, repo)
    }

    fn new_user(email: &str) -> NewUser {
        NewUser::new(email, "hashed", "beginner", "humanoid")
    }

    #[tokio::test]
    async fn test_create_and_get_by_id() {
        let (_pool, repo) = setup_test_repo().await;

        let created = repo.create(new_user("learner@example.com")).await.expect("Failed to create user");
        let found = repo
            .get_by_id(created.id)
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.id, created.id);
        assert_eq!(found.email, "learner@example.com");
        assert_eq!(found.experience_level, "beginner");
        assert_eq!(found.primary_interest, "humanoid");
        assert!(found.last_login.is_none());
    }

    #[tokio::test]
    async fn test_get_by_email() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(new_user("unique@example.com")).await.expect("Failed to create user");

        let found = repo
            .get_by_email("unique@example.com")
            .await
            .expect("Failed to get user")
            .expect("User not found");

        assert_eq!(found.email, "unique@example.com");
        assert!(repo.get_by_email("missing@example.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_by_id_not_found() {
        let (_pool, repo) = setup_test_repo().await;

        let found = repo.get_by_id(Uuid::new_v4()).await.expect("Failed to get user");

        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_rejected() {
        let (_pool, repo) = setup_test_repo().await;
        repo.create(new_user("dup@example.com")).await.expect("Failed to create first user");

        let result = repo.create(new_user("dup@example.com")).await;

        assert!(result.is_err(), "Should fail due to duplicate email");
        assert_eq!(repo.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_touch_last_login() {
        let (_pool, repo) = setup_test_repo().await;
        let created = repo.create(new_user("login@example.com")).await.unwrap();
        let at = Utc::now();

        assert!(repo.touch_last_login(created.id, at).await.unwrap());
        assert!(!repo.touch_last_login(Uuid::new_v4(), at).await.unwrap());

        let found = repo.get_by_id(created.id).await.unwrap().unwrap();
        let stored = found.last_login.expect("last_login should be set");
        assert_eq!(stored.timestamp(), at.timestamp());
    }

    #[tokio::test]
    async fn test_count_users() {
        let (_pool, repo) = setup_test_repo().await;
        assert_eq!(repo.count().await.unwrap(), 0);

        repo.create(new_user("one@example.com")).await.unwrap();
        repo.create(new_user("two@example.com")).await.unwrap();

        assert_eq!(repo.count().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn test_password_hash_stored_correctly() {
        let (_pool, repo) = setup_test_repo().await;
        let hash = hash_password("my_secure_password").expect("Failed to hash password");

        let created = repo
            .create(NewUser::new("hash@example.com", hash.clone(), "advanced", "ai"))
            .await
            .unwrap();
        let found = repo.get_by_id(created.id).await.unwrap().unwrap();

        assert_eq!(found.password_hash, hash);
        assert!(found.password_hash.starts_with("$argon2id$"));
    }
}
