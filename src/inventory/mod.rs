//! Inventory items and the list controller that mirrors them.

pub mod controller;
pub mod item;

pub use controller::{ItemListController, ListEvent};
pub use item::{Item, ItemId, parse_quantity};
