//! SQL DDL for the inventory database.
//! Stored version lives in SQLite's `PRAGMA user_version`.

/// Version stamped on a freshly created database.
pub const SCHEMA_VERSION: u32 = 1;

/// SQLite schema with two independent tables:
/// - `inventory`: `id` INTEGER PRIMARY KEY AUTOINCREMENT, `name`, `quantity`
/// - `users`: `id` INTEGER PRIMARY KEY AUTOINCREMENT, `username`, `password`
///
/// `users.username` carries no UNIQUE constraint; uniqueness is checked
/// before insert.
pub const SQLITE_INIT: &str = r#"
CREATE TABLE IF NOT EXISTS inventory (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT,
    quantity INTEGER
);

CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    username TEXT,
    password TEXT -- Argon2id PHC string
);
"#;

pub const SQLITE_DROP: &str = r#"
DROP TABLE IF EXISTS users;
DROP TABLE IF EXISTS inventory;
"#;

/// Split a bundled script into individual statements
/// (sqlx::query executes one statement at a time).
pub fn statements(script: &str) -> impl Iterator<Item = &str> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
}
