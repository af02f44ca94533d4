pub mod dto;
pub mod handlers;

pub use dto::{format_rupiah, ShoppingDraft, ShoppingForm, ShoppingItem};
pub use handlers::{total_price, ShoppingController};
