//! Expiry reminders computed from the inventory.

use std::fmt;

use serde::Serialize;
use time::Date;

use crate::inventory::InventoryItem;

/// Items this many days or fewer from expiry get a reminder.
pub const REMIND_WITHIN_DAYS: i64 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "days", rename_all = "snake_case")]
pub enum ExpiryStatus {
    ExpiresIn(i64),
    Expired,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ExpiryAlert {
    pub item_id: u64,
    pub name: String,
    pub status: ExpiryStatus,
}

impl fmt::Display for ExpiryAlert {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.status {
            ExpiryStatus::Expired => write!(f, "{} has expired", self.name),
            ExpiryStatus::ExpiresIn(0) => write!(f, "{} expires today", self.name),
            ExpiryStatus::ExpiresIn(1) => write!(f, "{} expires in 1 day", self.name),
            ExpiryStatus::ExpiresIn(n) => write!(f, "{} expires in {} days", self.name, n),
        }
    }
}

impl ExpiryAlert {
    pub fn hint(&self) -> &'static str {
        "Cook it soon, or give it to a neighbour so it does not go to waste."
    }
}

pub fn days_left(expired_at: Date, today: Date) -> i64 {
    (expired_at - today).whole_days()
}

/// Reminders for expired items and items within `REMIND_WITHIN_DAYS`,
/// most urgent first.
pub fn expiry_alerts(items: &[InventoryItem], today: Date) -> Vec<ExpiryAlert> {
    let mut alerts: Vec<(i64, ExpiryAlert)> = items
        .iter()
        .filter_map(|item| {
            let left = days_left(item.fields.expired_at, today);
            let status = match left {
                n if n < 0 => ExpiryStatus::Expired,
                n if n <= REMIND_WITHIN_DAYS => ExpiryStatus::ExpiresIn(n),
                _ => return None,
            };
            Some((
                left,
                ExpiryAlert {
                    item_id: item.id,
                    name: item.fields.name.clone(),
                    status,
                },
            ))
        })
        .collect();
    alerts.sort_by_key(|(left, alert)| (*left, alert.item_id));
    alerts.into_iter().map(|(_, alert)| alert).collect()
}

#[cfg(test)]
mod notification_tests {
    use time::macros::date;

    use super::*;
    use crate::inventory::{InventoryDraft, StorageLocation, Unit};
    use crate::items::Entity;

    fn item(id: u64, name: &str, expired_at: Date) -> InventoryItem {
        InventoryItem::from_draft(
            id,
            InventoryDraft {
                name: name.into(),
                weight: 1.0,
                photo: "🥛".into(),
                store_at: StorageLocation::Chiller,
                unit: Unit::Liter,
                expired_at,
            },
        )
    }

    #[test]
    fn orders_by_urgency_and_skips_fresh() {
        let today = date!(2025 - 03 - 10);
        let items = vec![
            item(1, "Susu", date!(2025 - 03 - 13)),
            item(2, "Roti", date!(2025 - 03 - 08)),
            item(3, "Beras", date!(2025 - 06 - 01)),
            item(4, "Telur", date!(2025 - 03 - 11)),
            item(5, "Keju", date!(2025 - 03 - 15)),
        ];

        let alerts = expiry_alerts(&items, today);

        let ids: Vec<u64> = alerts.iter().map(|a| a.item_id).collect();
        assert_eq!(ids, vec![2, 4, 1, 5]);
        assert_eq!(alerts[0].status, ExpiryStatus::Expired);
        assert_eq!(alerts[0].to_string(), "Roti has expired");
        assert_eq!(alerts[1].to_string(), "Telur expires in 1 day");
        assert_eq!(alerts[2].to_string(), "Susu expires in 3 days");
        assert_eq!(alerts[3].status, ExpiryStatus::ExpiresIn(5));
    }

    #[test]
    fn same_day_expiry() {
        let today = date!(2025 - 03 - 10);
        let alerts = expiry_alerts(&[item(1, "Tahu", today)], today);
        assert_eq!(alerts[0].to_string(), "Tahu expires today");
    }
}
