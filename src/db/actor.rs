use crate::config::DatabaseConfig;
use crate::db::sqlite::InventoryStorage;
use crate::error::StockroomError;
use crate::inventory::item::Item;

use ractor::{Actor, ActorProcessingErr, ActorRef, RactorErr, RpcReplyPort};
use tracing::{debug, info, warn};

type Reply<T> = RpcReplyPort<Result<T, StockroomError>>;

/// Messages handled by the store actor. Every variant is an RPC.
#[derive(Debug)]
pub enum StoreMessage {
    ListItems(Reply<Vec<Item>>),
    /// Name and signed quantity; the quantity is clamped before insert.
    CreateItem(String, i64, Reply<Item>),
    UpdateItem(Item, Reply<bool>),
    DeleteItem(Item, Reply<bool>),
    AddUser(String, String, Reply<bool>),
    CheckUser(String, String, Reply<bool>),
    UsernameExists(String, Reply<bool>),
    PasswordHashOf(String, Reply<Option<String>>),
}

/// Cloneable handle to the store actor.
///
/// The boolean methods follow the store's failure contract: a missing row
/// and a storage error both come back as `false`, the error only goes to
/// the log.
#[derive(Clone)]
pub struct StoreHandle {
    actor: ActorRef<StoreMessage>,
}

fn rpc_failed(op: &'static str) -> impl FnOnce(RactorErr<StoreMessage>) -> StockroomError {
    move |e| StockroomError::RactorError(format!("{op} RPC failed: {e}"))
}

impl StoreHandle {
    pub async fn list_items(&self) -> Result<Vec<Item>, StockroomError> {
        ractor::call!(self.actor, StoreMessage::ListItems).map_err(rpc_failed("ListItems"))?
    }

    /// Insert and return the stored item with its assigned id.
    pub async fn create_item(
        &self,
        name: impl Into<String>,
        quantity: i64,
    ) -> Result<Item, StockroomError> {
        ractor::call!(self.actor, StoreMessage::CreateItem, name.into(), quantity)
            .map_err(rpc_failed("CreateItem"))?
    }

    pub async fn add_item(&self, name: impl Into<String>, quantity: i64) -> bool {
        match self.create_item(name, quantity).await {
            Ok(item) => {
                debug!(id = item.id(), "item added");
                true
            }
            Err(e) => {
                warn!(error = %e, "add item failed");
                false
            }
        }
    }

    pub async fn update_item(&self, item: &Item) -> bool {
        let res = ractor::call!(self.actor, StoreMessage::UpdateItem, item.clone())
            .map_err(rpc_failed("UpdateItem"));
        flatten_bool("update item", res)
    }

    pub async fn delete_item(&self, item: &Item) -> bool {
        let res = ractor::call!(self.actor, StoreMessage::DeleteItem, item.clone())
            .map_err(rpc_failed("DeleteItem"));
        flatten_bool("delete item", res)
    }

    pub async fn add_user(&self, username: &str, password_hash: &str) -> bool {
        let res = ractor::call!(
            self.actor,
            StoreMessage::AddUser,
            username.to_string(),
            password_hash.to_string()
        )
        .map_err(rpc_failed("AddUser"));
        flatten_bool("add user", res)
    }

    pub async fn check_user(&self, username: &str, password_hash: &str) -> bool {
        let res = ractor::call!(
            self.actor,
            StoreMessage::CheckUser,
            username.to_string(),
            password_hash.to_string()
        )
        .map_err(rpc_failed("CheckUser"));
        flatten_bool("check user", res)
    }

    pub async fn username_exists(&self, username: &str) -> bool {
        let res = ractor::call!(self.actor, StoreMessage::UsernameExists, username.to_string())
            .map_err(rpc_failed("UsernameExists"));
        flatten_bool("username lookup", res)
    }

    /// Stored digest for a username, used for salted verification.
    pub async fn password_hash_of(&self, username: &str) -> Result<Option<String>, StockroomError> {
        ractor::call!(self.actor, StoreMessage::PasswordHashOf, username.to_string())
            .map_err(rpc_failed("PasswordHashOf"))?
    }

    /// Stop the actor without waiting; the pool is closed in `post_stop`.
    pub fn stop(&self) {
        self.actor.stop(None);
    }

    /// Stop the actor and wait until the pool is closed.
    pub async fn shutdown(&self) {
        if let Err(e) = self.actor.stop_and_wait(None, None).await {
            warn!(error = %e, "StoreActor did not stop cleanly");
        }
    }
}

fn flatten_bool(
    op: &str,
    res: Result<Result<bool, StockroomError>, StockroomError>,
) -> bool {
    match res.and_then(|inner| inner) {
        Ok(done) => done,
        Err(e) => {
            warn!(error = %e, "{op} failed");
            false
        }
    }
}

struct StoreState {
    storage: InventoryStorage,
}

struct StoreActor;

#[ractor::async_trait]
impl Actor for StoreActor {
    type Msg = StoreMessage;
    type State = StoreState;
    type Arguments = InventoryStorage;

    async fn pre_start(
        &self,
        _myself: ActorRef<Self::Msg>,
        storage: Self::Arguments,
    ) -> Result<Self::State, ActorProcessingErr> {
        info!("StoreActor started");
        Ok(StoreState { storage })
    }

    async fn post_stop(
        &self,
        _myself: ActorRef<Self::Msg>,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        state.storage.pool().close().await;
        info!("StoreActor stopped");
        Ok(())
    }

    async fn handle(
        &self,
        _myself: ActorRef<Self::Msg>,
        message: Self::Msg,
        state: &mut Self::State,
    ) -> Result<(), ActorProcessingErr> {
        let storage = &state.storage;
        match message {
            StoreMessage::ListItems(rp) => {
                let _ = rp.send(storage.list_items().await);
            }
            StoreMessage::CreateItem(name, quantity, rp) => {
                let _ = rp.send(storage.insert_item(&name, quantity).await);
            }
            StoreMessage::UpdateItem(item, rp) => {
                let res = storage.update_item(&item).await;
                if let Ok(false) = res {
                    debug!(id = item.id(), "update matched no row");
                }
                let _ = rp.send(res);
            }
            StoreMessage::DeleteItem(item, rp) => {
                let res = storage.delete_item(item.id()).await;
                if let Ok(false) = res {
                    debug!(id = item.id(), "delete matched no row");
                }
                let _ = rp.send(res);
            }
            StoreMessage::AddUser(username, password_hash, rp) => {
                let _ = rp.send(storage.insert_user(&username, &password_hash).await);
            }
            StoreMessage::CheckUser(username, password_hash, rp) => {
                let _ = rp.send(storage.check_user(&username, &password_hash).await);
            }
            StoreMessage::UsernameExists(username, rp) => {
                let _ = rp.send(storage.username_exists(&username).await);
            }
            StoreMessage::PasswordHashOf(username, rp) => {
                let res = storage
                    .get_user(&username)
                    .await
                    .map(|user| user.map(|u| u.password));
                let _ = rp.send(res);
            }
        }
        Ok(())
    }
}

/// Open the database described by `cfg`, bring its schema up to date and
/// return a handle to the actor that owns it.
///
/// Connection and schema errors come back typed, before any actor exists.
pub async fn spawn(cfg: &DatabaseConfig) -> Result<StoreHandle, StockroomError> {
    let storage = InventoryStorage::connect(&cfg.database_url, cfg.max_connections).await?;

    let strategy = cfg.migration.strategy();
    if let Err(e) = storage
        .init_schema(cfg.schema_version, strategy.as_ref())
        .await
    {
        storage.pool().close().await;
        return Err(e);
    }
    info!(
        database_url = %cfg.database_url,
        schema_version = cfg.schema_version,
        "store schema ready"
    );

    let (actor, _jh) = Actor::spawn(None, StoreActor, storage)
        .await
        .map_err(|e| StockroomError::RactorError(format!("spawn StoreActor failed: {e}")))?;
    Ok(StoreHandle { actor })
}
