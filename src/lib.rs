pub mod app;
pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod inventory;
pub mod preferences;

pub use app::App;
pub use error::StockroomError;
pub use inventory::{Item, ItemListController, ListEvent};
