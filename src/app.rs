use crate::auth::CredentialService;
use crate::config::Config;
use crate::db::{self, StoreHandle};
use crate::error::StockroomError;
use crate::inventory::ItemListController;
use crate::preferences::Preferences;
use tracing::info;

/// Composition root: one store actor per `App`, shared by handle.
pub struct App {
    config: Config,
    store: StoreHandle,
    credentials: CredentialService,
    preferences: Preferences,
}

impl App {
    pub async fn bootstrap(config: Config) -> Result<Self, StockroomError> {
        let store = db::spawn(&config.database).await?;
        let credentials = CredentialService::new(store.clone(), config.password);
        let preferences = match Preferences::open(&config.basic.preferences_path) {
            Ok(prefs) => prefs,
            Err(e) => {
                store.stop();
                return Err(e);
            }
        };
        info!(
            database_url = %config.database.database_url,
            preferences = %preferences.path().display(),
            "app bootstrapped"
        );
        Ok(Self {
            config,
            store,
            credentials,
            preferences,
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn store(&self) -> &StoreHandle {
        &self.store
    }

    pub fn credentials(&self) -> &CredentialService {
        &self.credentials
    }

    pub fn preferences(&self) -> &Preferences {
        &self.preferences
    }

    pub fn preferences_mut(&mut self) -> &mut Preferences {
        &mut self.preferences
    }

    /// A fresh list controller loaded from the store.
    pub async fn inventory(&self) -> ItemListController {
        ItemListController::load(self.store.clone()).await
    }

    pub async fn shutdown(self) {
        self.store.shutdown().await;
    }
}
