use crate::db::StoreHandle;
use crate::inventory::item::{Item, parse_quantity};
use tokio::sync::broadcast;
use tracing::{debug, warn};

const EVENT_CAPACITY: usize = 64;

/// Change notifications for whoever presents the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    /// The whole list was replaced by a fresh read.
    Reset { len: usize },
    Inserted { index: usize },
    Changed { index: usize },
    Removed { index: usize },
    /// The list went from non-empty to empty or back.
    EmptinessChanged { empty: bool },
}

/// In-memory snapshot of the inventory table.
///
/// Every mutation goes to the store first; the snapshot only changes after
/// the store confirms, so a failed write never leaves the displayed list
/// ahead of what is persisted.
pub struct ItemListController {
    store: StoreHandle,
    items: Vec<Item>,
    events: broadcast::Sender<ListEvent>,
}

impl ItemListController {
    /// Build a controller and perform the initial read.
    pub async fn load(store: StoreHandle) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        let mut controller = Self {
            store,
            items: Vec::new(),
            events,
        };
        controller.refresh().await;
        controller
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ListEvent> {
        self.events.subscribe()
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn get(&self, index: usize) -> Option<&Item> {
        self.items.get(index)
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Replace the snapshot with a full read. On failure the previous
    /// snapshot stays and `false` is returned.
    pub async fn refresh(&mut self) -> bool {
        match self.store.list_items().await {
            Ok(items) => {
                let was_empty = self.items.is_empty();
                self.items = items;
                debug!(len = self.items.len(), "inventory refreshed");
                self.publish(ListEvent::Reset { len: self.items.len() }, was_empty);
                true
            }
            Err(e) => {
                warn!(error = %e, "inventory refresh failed; keeping previous snapshot");
                false
            }
        }
    }

    /// Delete the item at `index` from the store, then from the snapshot.
    pub async fn apply_delete(&mut self, index: usize) -> bool {
        let Some(item) = self.items.get(index) else {
            return false;
        };
        if !self.store.delete_item(item).await {
            return false;
        }
        let was_empty = self.items.is_empty();
        let removed = self.items.remove(index);
        debug!(index, id = removed.id(), "item removed");
        self.publish(ListEvent::Removed { index }, was_empty);
        true
    }

    /// Insert a new item and append it to the snapshot. The name is trimmed
    /// and must not be blank.
    pub async fn add_item(&mut self, name: &str, quantity: i64) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        let item = match self.store.create_item(name, quantity).await {
            Ok(item) => item,
            Err(e) => {
                warn!(error = %e, "add item failed");
                return false;
            }
        };
        let was_empty = self.items.is_empty();
        self.items.push(item);
        let index = self.items.len() - 1;
        self.publish(ListEvent::Inserted { index }, was_empty);
        true
    }

    /// Replace name and quantity of the item at `index`.
    pub async fn edit_item(&mut self, index: usize, name: &str, quantity: i64) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }
        self.commit(index, |item| {
            item.set_name(name);
            item.set_quantity(quantity);
        })
        .await
    }

    pub async fn increment(&mut self, index: usize) -> bool {
        self.commit(index, Item::increment).await
    }

    pub async fn decrement(&mut self, index: usize) -> bool {
        self.commit(index, Item::decrement).await
    }

    /// Apply a free-text quantity edit. Callers debounce; each call is one
    /// store write.
    pub async fn commit_quantity(&mut self, index: usize, raw: &str) -> bool {
        let quantity = i64::from(parse_quantity(raw));
        self.commit(index, |item| item.set_quantity(quantity)).await
    }

    async fn commit(&mut self, index: usize, edit: impl FnOnce(&mut Item)) -> bool {
        let Some(current) = self.items.get(index) else {
            return false;
        };
        let mut updated = current.clone();
        edit(&mut updated);
        if updated == *current {
            return true;
        }
        if !self.store.update_item(&updated).await {
            return false;
        }
        self.items[index] = updated;
        self.publish(ListEvent::Changed { index }, self.items.is_empty());
        true
    }

    fn publish(&self, event: ListEvent, was_empty: bool) {
        // No receivers is not an error.
        let _ = self.events.send(event);
        let empty = self.items.is_empty();
        if empty != was_empty {
            let _ = self.events.send(ListEvent::EmptinessChanged { empty });
        }
    }
}
