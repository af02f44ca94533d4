use std::marker::PhantomData;
use std::sync::Arc;

use serde::Serialize;
use serde_json::Value;
use tracing::{debug, info, instrument};

use super::Entity;
use crate::error::StoreError;
use crate::store::{Fields, StoreClient};

/// Typed list/create/update/delete over one store collection.
pub struct ItemService<E> {
    store: Arc<dyn StoreClient>,
    _entity: PhantomData<fn() -> E>,
}

impl<E> Clone for ItemService<E> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
            _entity: PhantomData,
        }
    }
}

impl<E: Entity> ItemService<E> {
    pub fn new(store: Arc<dyn StoreClient>) -> Self {
        Self {
            store,
            _entity: PhantomData,
        }
    }

    #[instrument(skip(self), fields(collection = %E::COLLECTION))]
    pub async fn list(&self) -> Result<Vec<E>, StoreError> {
        let items: Vec<E> = self.store.list(E::COLLECTION).await?.list()?;
        debug!(count = items.len(), "listed");
        Ok(items)
    }

    #[instrument(skip(self, draft), fields(collection = %E::COLLECTION))]
    pub async fn create(&self, draft: E::Draft) -> Result<E, StoreError> {
        let body = to_fields(&outbound::<E>(draft).await?)?;
        let created: E = self
            .store
            .create(E::COLLECTION, body)
            .await?
            .entity()?
            .ok_or_else(|| StoreError::Decode("create returned no entity".into()))?;
        info!(id = created.id(), "created");
        Ok(created)
    }

    /// An answer without an entity counts as success; the submitted values stand.
    #[instrument(skip(self, entity), fields(collection = %E::COLLECTION, id = entity.id()))]
    pub async fn update(&self, entity: &E) -> Result<E, StoreError> {
        let id = entity.id();
        let draft = outbound::<E>(entity.draft()).await?;
        let body = to_fields(&draft)?;
        let updated = self
            .store
            .update(E::COLLECTION, id, body)
            .await?
            .entity::<E>()?
            .unwrap_or_else(|| E::from_draft(id, draft));
        info!("updated");
        Ok(updated)
    }

    #[instrument(skip(self), fields(collection = %E::COLLECTION))]
    pub async fn delete(&self, id: u64) -> Result<String, StoreError> {
        let env = self.store.delete(E::COLLECTION, id).await?;
        info!(id, "deleted");
        Ok(env.message.unwrap_or_else(|| "data dihapus".into()))
    }
}

/// Runs `Entity::outbound` off the async workers.
async fn outbound<E: Entity>(draft: E::Draft) -> Result<E::Draft, StoreError> {
    tokio::task::spawn_blocking(move || E::outbound(draft))
        .await
        .map_err(|e| StoreError::Decode(format!("preparing {} draft: {e}", E::LABEL)))
}

pub(crate) fn to_fields<T: Serialize>(value: &T) -> Result<Fields, StoreError> {
    match serde_json::to_value(value) {
        Ok(Value::Object(fields)) => Ok(fields),
        Ok(_) => Err(StoreError::Decode("draft is not an object".into())),
        Err(e) => Err(StoreError::Decode(e.to_string())),
    }
}
