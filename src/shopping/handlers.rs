use super::dto::{ShoppingForm, ShoppingItem};
use crate::items::CollectionController;

pub type ShoppingController = CollectionController<ShoppingForm>;

/// Estimated spend for the week.
pub fn total_price(items: &[ShoppingItem]) -> f64 {
    items.iter().map(|i| i.fields.price).sum()
}
