use crate::auth::password::{Argon2Params, hash_password, verify_password};
use crate::db::StoreHandle;
use crate::error::StockroomError;
use tracing::{debug, info, warn};

/// Usernames are compared and stored trimmed and lowercased.
pub fn normalize_username(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// Registration and login over the store's `users` table.
///
/// Both operations fail closed: any hashing or lookup error is logged and
/// reported as `false`.
#[derive(Clone)]
pub struct CredentialService {
    store: StoreHandle,
    params: Argon2Params,
}

impl CredentialService {
    pub fn new(store: StoreHandle, params: Argon2Params) -> Self {
        Self { store, params }
    }

    pub async fn register(&self, username: &str, password: &str) -> bool {
        let Some((username, password)) = validate(username, password) else {
            return false;
        };
        if self.store.username_exists(&username).await {
            debug!(%username, "registration rejected: username taken");
            return false;
        }

        let params = self.params;
        let hashed =
            tokio::task::spawn_blocking(move || hash_password(&password, params)).await;
        let hash = match hashed.map_err(StockroomError::from).and_then(|r| r) {
            Ok(hash) => hash,
            Err(e) => {
                warn!(%username, error = %e, "registration failed while hashing");
                return false;
            }
        };

        let created = self.store.add_user(&username, &hash).await;
        if created {
            info!(%username, "user registered");
        }
        created
    }

    pub async fn login(&self, username: &str, password: &str) -> bool {
        let Some((username, password)) = validate(username, password) else {
            return false;
        };
        match self.verify(&username, password).await {
            Ok(valid) => {
                debug!(%username, valid, "login attempt");
                valid
            }
            Err(e) => {
                warn!(%username, error = %e, "login failed closed");
                false
            }
        }
    }

    async fn verify(&self, username: &str, password: String) -> Result<bool, StockroomError> {
        let Some(stored) = self.store.password_hash_of(username).await? else {
            return Ok(false);
        };
        tokio::task::spawn_blocking(move || verify_password(&password, &stored)).await?
    }
}

/// Both fields trimmed and non-empty; the username is also lowercased.
fn validate(username: &str, password: &str) -> Option<(String, String)> {
    let username = normalize_username(username);
    let password = password.trim();
    if username.is_empty() || password.is_empty() {
        return None;
    }
    Some((username, password.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_trims_and_lowercases() {
        assert_eq!(normalize_username("  BoB "), "bob");
        assert_eq!(normalize_username("alice"), "alice");
    }

    #[test]
    fn validate_rejects_blank_fields() {
        assert!(validate("   ", "secret").is_none());
        assert!(validate("bob", "  ").is_none());
        assert_eq!(
            validate(" Bob ", " secret "),
            Some(("bob".to_string(), "secret".to_string()))
        );
    }
}
