pub mod dto;
pub mod handlers;

pub use dto::{InventoryDraft, InventoryForm, InventoryItem, StorageLocation, Unit};
pub use handlers::{take_photo, InventoryController};
