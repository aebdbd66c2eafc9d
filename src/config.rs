//! Runtime configuration.
//!
//! Layering (lowest to highest precedence):
//! - built-in defaults (`Config::default()`)
//! - `config.toml` in the working directory, if present
//! - `STOCKROOM_*` environment variables, nested keys split by `__`
//!   (e.g. `STOCKROOM_DATABASE__DATABASE_URL=sqlite:/tmp/inv.db`)

use crate::auth::password::Argon2Params;
use crate::db::migration::MigrationPolicy;
use crate::error::StockroomError;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

pub const CONFIG_FILE: &str = "config.toml";
pub const ENV_PREFIX: &str = "STOCKROOM_";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub basic: BasicConfig,
    pub database: DatabaseConfig,
    pub password: Argon2Params,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BasicConfig {
    pub loglevel: String,
    pub preferences_path: PathBuf,
}

impl Default for BasicConfig {
    fn default() -> Self {
        Self {
            loglevel: "info".to_string(),
            preferences_path: PathBuf::from("preferences.json"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
    pub database_url: String,
    /// Statements are serialized by the store actor; more than one
    /// connection only helps concurrent readers outside it.
    pub max_connections: u32,
    pub schema_version: u32,
    pub migration: MigrationPolicy,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            database_url: "sqlite:inventoryApp.db".to_string(),
            max_connections: 1,
            schema_version: crate::db::schema::SCHEMA_VERSION,
            migration: MigrationPolicy::default(),
        }
    }
}

impl Config {
    pub fn figment() -> Figment {
        Figment::from(Serialized::defaults(Config::default()))
            .merge(Toml::file(CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self, StockroomError> {
        Ok(Self::figment().extract()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use figment::Jail;

    #[test]
    fn defaults_apply_without_sources() {
        Jail::expect_with(|_jail| {
            let cfg = Config::load().expect("load defaults");
            assert_eq!(cfg.database.database_url, "sqlite:inventoryApp.db");
            assert_eq!(cfg.database.max_connections, 1);
            assert_eq!(cfg.database.migration, MigrationPolicy::DropAndRecreate);
            assert_eq!(cfg.basic.preferences_path, PathBuf::from("preferences.json"));
            Ok(())
        });
    }

    #[test]
    fn env_overrides_toml() {
        Jail::expect_with(|jail| {
            jail.create_file(
                CONFIG_FILE,
                r#"
                [basic]
                loglevel = "debug"

                [database]
                database_url = "sqlite:from-toml.db"
                migration = "reject"
                "#,
            )?;
            jail.set_env("STOCKROOM_DATABASE__DATABASE_URL", "sqlite:from-env.db");
            jail.set_env("STOCKROOM_PASSWORD__ITERATIONS", "3");

            let cfg = Config::load().expect("load layered config");
            assert_eq!(cfg.basic.loglevel, "debug");
            assert_eq!(cfg.database.database_url, "sqlite:from-env.db");
            assert_eq!(cfg.database.migration, MigrationPolicy::Reject);
            assert_eq!(cfg.password.iterations, 3);
            Ok(())
        });
    }
}
