//! In-memory store used by tests. Records every call and can be told to fail.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::{json, Value};

use super::{Collection, Envelope, Fields, StoreClient};
use crate::error::StoreError;

#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    List(Collection),
    Create(Collection, Fields),
    Update(Collection, u64, Fields),
    Delete(Collection, u64),
}

#[derive(Default)]
pub struct MemoryStore {
    rows: Mutex<BTreeMap<(Collection, u64), Fields>>,
    next_id: AtomicU64,
    calls: Mutex<Vec<Call>>,
    fail_next_write: AtomicBool,
    echo_writes: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        let store = Self::default();
        store.next_id.store(1, Ordering::SeqCst);
        store.echo_writes.store(true, Ordering::SeqCst);
        store
    }

    pub fn seed(&self, collection: Collection, row: Value) -> u64 {
        let mut fields = match row {
            Value::Object(obj) => obj,
            _ => Fields::new(),
        };
        let id = fields
            .get("id")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| self.next_id.fetch_add(1, Ordering::SeqCst));
        if id >= self.next_id.load(Ordering::SeqCst) {
            self.next_id.store(id + 1, Ordering::SeqCst);
        }
        fields.insert("id".into(), json!(id));
        self.rows.lock().unwrap().insert((collection, id), fields);
        id
    }

    pub fn fail_next_write(&self) {
        self.fail_next_write.store(true, Ordering::SeqCst);
    }

    /// Writes answer with `data: null` instead of the stored row.
    pub fn silent_writes(&self) {
        self.echo_writes.store(false, Ordering::SeqCst);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn writes(&self) -> Vec<Call> {
        self.calls()
            .into_iter()
            .filter(|c| !matches!(c, Call::List(_)))
            .collect()
    }

    pub fn row(&self, collection: Collection, id: u64) -> Option<Fields> {
        self.rows.lock().unwrap().get(&(collection, id)).cloned()
    }

    fn check_write(&self) -> Result<(), StoreError> {
        if self.fail_next_write.swap(false, Ordering::SeqCst) {
            return Err(StoreError::Status {
                status: 500,
                message: "simulated failure".into(),
            });
        }
        Ok(())
    }

    fn reply(&self, row: Fields) -> Envelope {
        let data = if self.echo_writes.load(Ordering::SeqCst) {
            Value::Object(row)
        } else {
            Value::Null
        };
        Envelope {
            message: Some("ok".into()),
            data,
        }
    }
}

#[async_trait]
impl StoreClient for MemoryStore {
    async fn list(&self, collection: Collection) -> Result<Envelope, StoreError> {
        self.calls.lock().unwrap().push(Call::List(collection));
        let rows: Vec<Value> = self
            .rows
            .lock()
            .unwrap()
            .iter()
            .filter(|((c, _), _)| *c == collection)
            .map(|(_, row)| Value::Object(row.clone()))
            .collect();
        Ok(Envelope {
            message: Some("ok".into()),
            data: Value::Array(rows),
        })
    }

    async fn create(&self, collection: Collection, body: Fields) -> Result<Envelope, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Create(collection, body.clone()));
        self.check_write()?;
        let id = self.seed(collection, Value::Object(body));
        let row = self.row(collection, id).unwrap_or_default();
        Ok(self.reply(row))
    }

    async fn update(
        &self,
        collection: Collection,
        id: u64,
        body: Fields,
    ) -> Result<Envelope, StoreError> {
        self.calls
            .lock()
            .unwrap()
            .push(Call::Update(collection, id, body.clone()));
        self.check_write()?;
        let mut rows = self.rows.lock().unwrap();
        let Some(row) = rows.get_mut(&(collection, id)) else {
            return Err(StoreError::Status {
                status: 404,
                message: "data tidak ditemukan".into(),
            });
        };
        row.extend(body);
        row.insert("id".into(), json!(id));
        let row = row.clone();
        drop(rows);
        Ok(self.reply(row))
    }

    async fn delete(&self, collection: Collection, id: u64) -> Result<Envelope, StoreError> {
        self.calls.lock().unwrap().push(Call::Delete(collection, id));
        self.check_write()?;
        self.rows.lock().unwrap().remove(&(collection, id));
        Ok(Envelope {
            message: Some("data dihapus".into()),
            data: Value::Null,
        })
    }
}
