//! Shared shape of every persisted record and its edit buffer.

pub mod handlers;
pub mod services;

use std::fmt;

use serde::{de::DeserializeOwned, Serialize};
use time::Date;

use crate::error::ValidationError;
use crate::store::{de, Collection};

pub use handlers::CollectionController;
pub use services::ItemService;

/// A record the store owns and numbers.
pub trait Entity:
    Clone + fmt::Debug + PartialEq + Serialize + DeserializeOwned + Send + Sync + 'static
{
    /// Same fields without the id, as sent on create and update.
    type Draft: Serialize + Clone + fmt::Debug + Send + Sync + 'static;

    const COLLECTION: Collection;
    /// Human name used in prompts and messages.
    const LABEL: &'static str;

    fn id(&self) -> u64;
    fn draft(&self) -> Self::Draft;
    fn from_draft(id: u64, draft: Self::Draft) -> Self;

    /// Last chance to rewrite a draft before it leaves the client. Runs on
    /// the blocking pool, so it may do CPU-heavy work.
    fn outbound(draft: Self::Draft) -> Self::Draft {
        draft
    }
}

/// Text-typed edit buffer for one entity. `validate` is the single place
/// where text becomes typed values.
pub trait EditForm: Default + Clone + fmt::Debug + Send + Sync {
    type Entity: Entity;

    fn id(&self) -> Option<u64>;
    fn from_entity(entity: &Self::Entity) -> Self;
    fn validate(&self) -> Result<<Self::Entity as Entity>::Draft, ValidationError>;
}

pub(crate) fn required<'a>(field: &'static str, value: &'a str) -> Result<&'a str, ValidationError> {
    let v = value.trim();
    if v.is_empty() {
        return Err(ValidationError::Missing(field));
    }
    Ok(v)
}

pub(crate) fn number(field: &'static str, value: &str) -> Result<f64, ValidationError> {
    let v = required(field, value)?;
    v.parse::<f64>()
        .ok()
        .filter(|n| n.is_finite() && *n >= 0.0)
        .ok_or_else(|| ValidationError::NotANumber {
            field,
            value: v.to_string(),
        })
}

pub(crate) fn whole(field: &'static str, value: &str) -> Result<u32, ValidationError> {
    let n = number(field, value)?;
    if n.fract() != 0.0 || n > f64::from(u32::MAX) {
        return Err(ValidationError::NotANumber {
            field,
            value: value.trim().to_string(),
        });
    }
    Ok(n as u32)
}

pub(crate) fn date(field: &'static str, value: &str) -> Result<Date, ValidationError> {
    let v = required(field, value)?;
    de::parse_date(v).ok_or_else(|| ValidationError::InvalidDate {
        field,
        value: v.to_string(),
    })
}

/// Text shown in an edit buffer for a stored number.
pub(crate) fn number_text(n: f64) -> String {
    if n.fract() == 0.0 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
