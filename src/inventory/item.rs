use serde::{Deserialize, Serialize};

/// Row id assigned by the store on insert.
pub type ItemId = i64;

/// A named, quantity-tracked inventory record.
///
/// `quantity` is unsigned so a negative count is unrepresentable; every
/// signed input goes through [`Item::set_quantity`], which clamps at zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    id: ItemId,
    name: String,
    quantity: u32,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>, quantity: i64) -> Self {
        let mut item = Self {
            id,
            name: name.into(),
            quantity: 0,
        };
        item.set_quantity(quantity);
        item
    }

    pub fn id(&self) -> ItemId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Stores `max(0, quantity)`.
    pub fn set_quantity(&mut self, quantity: i64) {
        self.quantity = clamp_quantity(quantity);
    }

    pub fn increment(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    pub fn decrement(&mut self) {
        self.quantity = self.quantity.saturating_sub(1);
    }
}

pub(crate) fn clamp_quantity(quantity: i64) -> u32 {
    u32::try_from(quantity.max(0)).unwrap_or(u32::MAX)
}

/// Parse free-text quantity input. Everything but digits and `.` is
/// dropped; anything that is then not a whole number (empty, decimal,
/// overflowing) yields 0.
pub fn parse_quantity(raw: &str) -> u32 {
    let kept: String = raw
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '.')
        .collect();
    kept.trim().parse().unwrap_or(0)
}
