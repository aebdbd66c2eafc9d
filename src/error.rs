use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;

#[derive(Debug, ThisError)]
pub enum StockroomError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("Ractor error: {0}")]
    RactorError(String),

    #[error("Password hash error: {0}")]
    PasswordHash(String),

    #[error("Schema version {found} is newer than supported version {supported}")]
    SchemaDowngrade { found: u32, supported: u32 },

    #[error("Schema upgrade {from} -> {to} rejected by migration strategy")]
    UpgradeRejected { from: u32, to: u32 },

    #[error("Configuration error: {0}")]
    Config(#[from] figment::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Blocking task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl StockroomError {
    /// Errors caused by the on-disk schema rather than by a single statement.
    pub fn is_schema_error(&self) -> bool {
        matches!(
            self,
            StockroomError::SchemaDowngrade { .. } | StockroomError::UpgradeRejected { .. }
        )
    }
}

impl From<argon2::password_hash::Error> for StockroomError {
    fn from(e: argon2::password_hash::Error) -> Self {
        StockroomError::PasswordHash(e.to_string())
    }
}
