use crate::auth::credentials::normalize_username;
use crate::db::migration::MigrationStrategy;
use crate::db::models::{DbItem, DbUser};
use crate::db::schema::{SQLITE_INIT, statements};
use crate::error::StockroomError;
use crate::inventory::item::{Item, ItemId, clamp_quantity};
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use sqlx::{Pool, Sqlite};
use std::str::FromStr;
use tracing::{debug, info};

pub type SqlitePool = Pool<Sqlite>;

#[derive(Clone)]
pub struct InventoryStorage {
    pool: SqlitePool,
}

impl InventoryStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open (creating if missing) the database at `database_url`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self, StockroomError> {
        let connect_opts = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections.max(1))
            .connect_with(connect_opts)
            .await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub async fn schema_version(&self) -> Result<u32, StockroomError> {
        let version: i64 = sqlx::query_scalar("PRAGMA user_version")
            .fetch_one(&self.pool)
            .await?;
        Ok(u32::try_from(version).unwrap_or(0))
    }

    /// Create missing tables and bring the stored version up to `target`.
    ///
    /// - version 0 (fresh file): create tables, stamp `target`
    /// - older: run the strategy's statements in one transaction, stamp `target`
    /// - newer: refuse with [`StockroomError::SchemaDowngrade`]
    pub async fn init_schema(
        &self,
        target: u32,
        strategy: &dyn MigrationStrategy,
    ) -> Result<(), StockroomError> {
        let found = self.schema_version().await?;
        if found > target {
            return Err(StockroomError::SchemaDowngrade {
                found,
                supported: target,
            });
        }

        let mut tx = self.pool.begin().await?;
        if found != 0 && found < target {
            info!(from = found, to = target, strategy = strategy.name(), "upgrading schema");
            for stmt in strategy.upgrade_statements(found, target)? {
                sqlx::query(&stmt).execute(&mut *tx).await?;
            }
        }
        for stmt in statements(SQLITE_INIT) {
            sqlx::query(stmt).execute(&mut *tx).await?;
        }
        if found != target {
            sqlx::query(&format!("PRAGMA user_version = {target}"))
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        debug!(version = target, "schema ready");
        Ok(())
    }

    pub async fn list_items(&self) -> Result<Vec<Item>, StockroomError> {
        let rows: Vec<DbItem> =
            sqlx::query_as("SELECT id, name, quantity FROM inventory ORDER BY id")
                .fetch_all(&self.pool)
                .await?;
        Ok(rows.into_iter().map(Item::from).collect())
    }

    /// Insert a row and return it with the id SQLite assigned.
    pub async fn insert_item(&self, name: &str, quantity: i64) -> Result<Item, StockroomError> {
        let quantity = clamp_quantity(quantity);
        let id = sqlx::query("INSERT INTO inventory (name, quantity) VALUES (?, ?)")
            .bind(name)
            .bind(i64::from(quantity))
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(Item::new(id, name, i64::from(quantity)))
    }

    /// Replace name and quantity by id. `Ok(false)` when no row matched.
    pub async fn update_item(&self, item: &Item) -> Result<bool, StockroomError> {
        let res = sqlx::query("UPDATE inventory SET name = ?, quantity = ? WHERE id = ?")
            .bind(item.name())
            .bind(i64::from(item.quantity()))
            .bind(item.id())
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    /// `Ok(false)` when no row matched.
    pub async fn delete_item(&self, id: ItemId) -> Result<bool, StockroomError> {
        let res = sqlx::query("DELETE FROM inventory WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(res.rows_affected() > 0)
    }

    pub async fn username_exists(&self, username: &str) -> Result<bool, StockroomError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? LIMIT 1")
                .bind(normalize_username(username))
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    /// Insert unless the username is taken. `Ok(false)` means nothing was written.
    pub async fn insert_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StockroomError> {
        if self.username_exists(username).await? {
            return Ok(false);
        }
        let id = sqlx::query("INSERT INTO users (username, password) VALUES (?, ?)")
            .bind(normalize_username(username))
            .bind(password_hash)
            .execute(&self.pool)
            .await?
            .last_insert_rowid();
        Ok(id > 0)
    }

    pub async fn check_user(
        &self,
        username: &str,
        password_hash: &str,
    ) -> Result<bool, StockroomError> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT 1 FROM users WHERE username = ? AND password = ? LIMIT 1")
                .bind(normalize_username(username))
                .bind(password_hash)
                .fetch_optional(&self.pool)
                .await?;
        Ok(found.is_some())
    }

    pub async fn get_user(&self, username: &str) -> Result<Option<DbUser>, StockroomError> {
        let user = sqlx::query_as(
            "SELECT id, username, password FROM users WHERE username = ? ORDER BY id LIMIT 1",
        )
        .bind(normalize_username(username))
        .fetch_optional(&self.pool)
        .await?;
        Ok(user)
    }
}
