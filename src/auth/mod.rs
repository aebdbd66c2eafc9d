//! User registration and login.

pub mod credentials;
pub mod password;

pub use credentials::{CredentialService, normalize_username};
pub use password::Argon2Params;
