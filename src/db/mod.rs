//! Database module: schema, row models, storage and the actor that owns it.
//!
//! Layout:
//! - `schema.rs`: SQL DDL and schema version
//! - `migration.rs`: upgrade strategies behind a trait seam
//! - `models.rs`: Rust structs mirroring DB rows and conversions
//! - `sqlite.rs`: sqlx queries over the pool
//! - `actor.rs`: ractor actor serializing all store access, plus its handle

pub mod actor;
pub mod migration;
pub mod models;
pub mod schema;
pub mod sqlite;

pub use actor::{StoreHandle, StoreMessage, spawn};
pub use migration::{DropAndRecreate, MigrationPolicy, MigrationStrategy, Reject};
pub use models::{DbItem, DbUser};
pub use schema::{SCHEMA_VERSION, SQLITE_INIT};
pub use sqlite::{InventoryStorage, SqlitePool};
