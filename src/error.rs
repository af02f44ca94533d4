use thiserror::Error;

use crate::store::Collection;

/// Failures talking to the remote item store. Never retried.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("request to {url} failed: {source}")]
    Transport {
        url: String,
        #[source]
        source: reqwest::Error,
    },
    #[error("store responded {status}: {message}")]
    Status { status: u16, message: String },
    #[error("unexpected response body: {0}")]
    Decode(String),
}

/// Edit buffer rejected before any network call.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("{0} is required")]
    Missing(&'static str),
    #[error("{field} must be a number, got {value:?}")]
    NotANumber { field: &'static str, value: String },
    #[error("{field} must be a date (YYYY-MM-DD), got {value:?}")]
    InvalidDate { field: &'static str, value: String },
}

/// Outcome of a failed user action on a screen.
#[derive(Debug, Error)]
pub enum ActionError {
    #[error(transparent)]
    Validation(#[from] ValidationError),
    #[error("{collection} item {id} not found")]
    NotFound { collection: Collection, id: u64 },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("another save is still in progress")]
    Busy,
}
