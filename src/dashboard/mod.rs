pub mod menu;
pub mod notifications;
pub mod stats;

use serde::Serialize;
use time::Date;

use crate::inventory::InventoryItem;
use crate::profile::UserProfile;
use crate::shopping::{total_price, ShoppingItem};

pub use menu::{recommended_menu, Portion};
pub use notifications::{expiry_alerts, ExpiryAlert, ExpiryStatus};
pub use stats::{ActivityLevel, BodyStats};

/// Everything the dashboard shows, recomputed on every render.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSummary {
    pub greeting_name: String,
    pub stats: BodyStats,
    pub inventory_count: usize,
    /// Not yet expired, but within the reminder window.
    pub expiring_soon: usize,
    pub shopping_count: usize,
    pub shopping_total: f64,
}

impl DashboardSummary {
    pub fn compute(
        profile: Option<&UserProfile>,
        inventory: &[InventoryItem],
        shopping: &[ShoppingItem],
        today: Date,
    ) -> Self {
        let greeting_name = profile
            .map(|p| p.fields.fullname.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or("there")
            .to_string();
        Self {
            greeting_name,
            stats: profile.map_or_else(BodyStats::empty, BodyStats::from_profile),
            inventory_count: inventory.len(),
            expiring_soon: expiry_alerts(inventory, today)
                .iter()
                .filter(|a| matches!(a.status, ExpiryStatus::ExpiresIn(_)))
                .count(),
            shopping_count: shopping.len(),
            shopping_total: total_price(shopping),
        }
    }
}
