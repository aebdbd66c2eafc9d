use crate::inventory::item::{Item, ItemId};
use sqlx::FromRow;

/// Raw `inventory` row. `quantity` is read signed so rows written by other
/// tools with a negative count still decode; conversion clamps it.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbItem {
    pub id: ItemId,
    pub name: Option<String>,
    pub quantity: Option<i64>,
}

impl From<DbItem> for Item {
    fn from(d: DbItem) -> Self {
        Item::new(d.id, d.name.unwrap_or_default(), d.quantity.unwrap_or(0))
    }
}

/// Raw `users` row.
#[derive(Debug, Clone, PartialEq, FromRow)]
pub struct DbUser {
    pub id: i64,
    pub username: String,
    pub password: String,
}
