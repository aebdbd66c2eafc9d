//! Schema upgrade strategies.
//!
//! When the stored `user_version` is older than the configured one, the
//! storage layer asks a [`MigrationStrategy`] for the statements to run and
//! executes them in one transaction before stamping the new version.

use crate::db::schema::{SQLITE_DROP, SQLITE_INIT, statements};
use crate::error::StockroomError;
use serde::{Deserialize, Serialize};
use tracing::warn;

pub trait MigrationStrategy: Send + Sync {
    fn name(&self) -> &'static str;

    /// Statements that bring a `from` database to `to`. `from < to`.
    fn upgrade_statements(&self, from: u32, to: u32) -> Result<Vec<String>, StockroomError>;
}

/// Drops both tables and recreates them empty. Every upgrade loses all
/// stored items and users.
pub struct DropAndRecreate;

impl MigrationStrategy for DropAndRecreate {
    fn name(&self) -> &'static str {
        "drop_and_recreate"
    }

    fn upgrade_statements(&self, from: u32, to: u32) -> Result<Vec<String>, StockroomError> {
        warn!(from, to, "schema upgrade drops all inventory and user rows");
        Ok(statements(SQLITE_DROP)
            .chain(statements(SQLITE_INIT))
            .map(str::to_string)
            .collect())
    }
}

/// Refuses every upgrade, leaving the database untouched.
pub struct Reject;

impl MigrationStrategy for Reject {
    fn name(&self) -> &'static str {
        "reject"
    }

    fn upgrade_statements(&self, from: u32, to: u32) -> Result<Vec<String>, StockroomError> {
        Err(StockroomError::UpgradeRejected { from, to })
    }
}

/// Config-facing selector for the built-in strategies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MigrationPolicy {
    #[default]
    DropAndRecreate,
    Reject,
}

impl MigrationPolicy {
    pub fn strategy(self) -> Box<dyn MigrationStrategy> {
        match self {
            MigrationPolicy::DropAndRecreate => Box::new(DropAndRecreate),
            MigrationPolicy::Reject => Box::new(Reject),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn drop_and_recreate_drops_before_creating() {
        let stmts = DropAndRecreate.upgrade_statements(1, 2).unwrap();
        assert_eq!(stmts.len(), 4);
        assert!(stmts[0].starts_with("DROP TABLE IF EXISTS users"));
        assert!(stmts[1].starts_with("DROP TABLE IF EXISTS inventory"));
        assert!(stmts[2].starts_with("CREATE TABLE IF NOT EXISTS inventory"));
        assert!(stmts[3].starts_with("CREATE TABLE IF NOT EXISTS users"));
    }

    #[test]
    fn reject_reports_versions() {
        let err = Reject.upgrade_statements(1, 3).unwrap_err();
        assert!(matches!(err, StockroomError::UpgradeRejected { from: 1, to: 3 }));
        assert!(err.is_schema_error());
    }

    #[test]
    fn policy_selects_strategy() {
        assert_eq!(MigrationPolicy::default().strategy().name(), "drop_and_recreate");
        assert_eq!(MigrationPolicy::Reject.strategy().name(), "reject");
    }
}
