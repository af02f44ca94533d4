use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use time::Date;

use crate::error::ValidationError;
use crate::images::compress_photo;
use crate::items::{date, number, number_text, required, EditForm, Entity};
use crate::store::{de, Collection};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StorageLocation {
    #[default]
    Chiller,
    Freezer,
    #[serde(alias = "room-temperature", alias = "room")]
    RoomTemperature,
}

impl fmt::Display for StorageLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Chiller => "chiller",
            Self::Freezer => "freezer",
            Self::RoomTemperature => "room temperature",
        })
    }
}

impl FromStr for StorageLocation {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace(['-', ' '], "_").as_str() {
            "chiller" => Ok(Self::Chiller),
            "freezer" => Ok(Self::Freezer),
            "room_temperature" | "room" => Ok(Self::RoomTemperature),
            other => Err(format!("unknown storage location {other:?}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Unit {
    #[default]
    #[serde(alias = "Kilogram", alias = "kg")]
    Kilogram,
    #[serde(alias = "Gram", alias = "g")]
    Gram,
    #[serde(alias = "Liter", alias = "l")]
    Liter,
    #[serde(alias = "Buah", alias = "buah", alias = "pcs")]
    Piece,
}

impl Unit {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Kilogram => "kg",
            Self::Gram => "g",
            Self::Liter => "l",
            Self::Piece => "pcs",
        }
    }
}

impl FromStr for Unit {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "kilogram" | "kg" => Ok(Self::Kilogram),
            "gram" | "g" => Ok(Self::Gram),
            "liter" | "l" => Ok(Self::Liter),
            "piece" | "pcs" | "buah" => Ok(Self::Piece),
            other => Err(format!("unknown unit {other:?}")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryItem {
    #[serde(deserialize_with = "de::id_lenient")]
    pub id: u64,
    #[serde(flatten)]
    pub fields: InventoryDraft,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InventoryDraft {
    pub name: String,
    #[serde(deserialize_with = "de::f64_lenient")]
    pub weight: f64,
    /// Emoji or short label, or a base64 image data URI.
    #[serde(default)]
    pub photo: String,
    #[serde(default)]
    pub store_at: StorageLocation,
    #[serde(default)]
    pub unit: Unit,
    #[serde(with = "de::date")]
    pub expired_at: Date,
}

impl Entity for InventoryItem {
    type Draft = InventoryDraft;

    const COLLECTION: Collection = Collection::Inventory;
    const LABEL: &'static str = "inventory item";

    fn id(&self) -> u64 {
        self.id
    }

    fn draft(&self) -> InventoryDraft {
        self.fields.clone()
    }

    fn from_draft(id: u64, fields: InventoryDraft) -> Self {
        Self { id, fields }
    }

    /// Photos are shrunk before they leave the device.
    fn outbound(mut draft: InventoryDraft) -> InventoryDraft {
        draft.photo = compress_photo(&draft.photo);
        draft
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryForm {
    pub id: Option<u64>,
    pub name: String,
    pub weight: String,
    pub photo: String,
    pub store_at: StorageLocation,
    pub unit: Unit,
    /// `YYYY-MM-DD`.
    pub expired_at: String,
}

impl EditForm for InventoryForm {
    type Entity = InventoryItem;

    fn id(&self) -> Option<u64> {
        self.id
    }

    fn from_entity(item: &InventoryItem) -> Self {
        let f = &item.fields;
        Self {
            id: Some(item.id),
            name: f.name.clone(),
            weight: number_text(f.weight),
            photo: f.photo.clone(),
            store_at: f.store_at,
            unit: f.unit,
            expired_at: de::format_date(f.expired_at),
        }
    }

    fn validate(&self) -> Result<InventoryDraft, ValidationError> {
        let name = required("name", &self.name)?.to_string();
        let photo = required("photo", &self.photo)?.to_string();
        let weight = number("weight", &self.weight)?;
        let expired_at = date("expired_at", &self.expired_at)?;
        Ok(InventoryDraft {
            name,
            weight,
            photo,
            store_at: self.store_at,
            unit: self.unit,
            expired_at,
        })
    }
}
