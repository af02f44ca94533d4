use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::inventory::Unit;
use crate::items::{number, number_text, required, EditForm, Entity};
use crate::store::{de, Collection};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingItem {
    #[serde(deserialize_with = "de::id_lenient")]
    pub id: u64,
    #[serde(flatten)]
    pub fields: ShoppingDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ShoppingDraft {
    pub name: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub weight: f64,
    #[serde(default)]
    pub unit: Unit,
    /// Rupiah.
    #[serde(deserialize_with = "de::f64_lenient")]
    pub price: f64,
}

impl Entity for ShoppingItem {
    type Draft = ShoppingDraft;

    const COLLECTION: Collection = Collection::Items;
    const LABEL: &'static str = "shopping item";

    fn id(&self) -> u64 {
        self.id
    }

    fn draft(&self) -> ShoppingDraft {
        self.fields.clone()
    }

    fn from_draft(id: u64, fields: ShoppingDraft) -> Self {
        Self { id, fields }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShoppingForm {
    pub id: Option<u64>,
    pub name: String,
    pub weight: String,
    pub unit: Unit,
    pub price: String,
}

impl EditForm for ShoppingForm {
    type Entity = ShoppingItem;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn from_entity(item: &ShoppingItem) -> Self {
        Self {
            id: Some(item.id),
            name: item.fields.name.clone(),
            weight: number_text(item.fields.weight),
            unit: item.fields.unit,
            price: number_text(item.fields.price),
        }
    }

    fn validate(&self) -> Result<ShoppingDraft, ValidationError> {
        Ok(ShoppingDraft {
            name: required("name", &self.name)?.to_string(),
            weight: number("weight", &self.weight)?,
            unit: self.unit,
            price: number("price", &self.price)?,
        })
    }
}

/// `Rp 28.000`: rupiah without decimals, dot as thousands separator.
pub fn format_rupiah(amount: f64) -> String {
    let rounded = amount.round();
    let sign = if rounded < 0.0 { "-" } else { "" };
    let digits = format!("{}", rounded.abs() as u64);
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push('.');
        }
        grouped.push(ch);
    }
    format!("{}Rp {}", sign, grouped)
}
