//! Seam to the remote item store: three REST collections that answer with
//! `{ message, data }` envelopes and are keyed by a numeric id.

pub mod de;
pub mod http;
#[cfg(test)]
pub mod memory;

use std::fmt;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::StoreError;

pub use http::HttpStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Collection {
    Users,
    Inventory,
    Items,
}

impl Collection {
    pub fn path(self) -> &'static str {
        match self {
            Self::Users => "users",
            Self::Inventory => "inventory",
            Self::Items => "item",
        }
    }
}

impl fmt::Display for Collection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

/// Write body as a flat set of named fields.
pub type Fields = Map<String, Value>;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Envelope {
    pub message: Option<String>,
    pub data: Value,
}

impl Envelope {
    /// Bodies without a `data` key are taken as the payload itself.
    pub fn from_body(body: Value) -> Self {
        match body {
            Value::Object(mut obj) if obj.contains_key("data") => {
                let message = obj
                    .get("message")
                    .and_then(Value::as_str)
                    .map(str::to_owned);
                let data = obj.remove("data").unwrap_or(Value::Null);
                Self { message, data }
            }
            other => Self {
                message: None,
                data: other,
            },
        }
    }

    pub fn list<T: DeserializeOwned>(self) -> Result<Vec<T>, StoreError> {
        match self.data {
            Value::Null => Ok(Vec::new()),
            Value::Array(_) => serde_json::from_value(self.data)
                .map_err(|e| StoreError::Decode(format!("list: {e}"))),
            other => Err(StoreError::Decode(format!(
                "expected a list, got {}",
                kind_of(&other)
            ))),
        }
    }

    /// `None` when the store answered without an entity.
    pub fn entity<T: DeserializeOwned>(self) -> Result<Option<T>, StoreError> {
        match self.data {
            Value::Null => Ok(None),
            Value::Object(ref obj) if obj.is_empty() => Ok(None),
            data => serde_json::from_value(data)
                .map(Some)
                .map_err(|e| StoreError::Decode(format!("entity: {e}"))),
        }
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[async_trait]
pub trait StoreClient: Send + Sync {
    async fn list(&self, collection: Collection) -> Result<Envelope, StoreError>;
    async fn create(&self, collection: Collection, body: Fields) -> Result<Envelope, StoreError>;
    async fn update(
        &self,
        collection: Collection,
        id: u64,
        body: Fields,
    ) -> Result<Envelope, StoreError>;
    async fn delete(&self, collection: Collection, id: u64) -> Result<Envelope, StoreError>;
}
