use tracing::{error, info, warn};

use super::{EditForm, Entity, ItemService};
use crate::error::{ActionError, StoreError};
use crate::ui::Prompt;

/// Screen state for a list of entities: the loaded collection plus the
/// flags a form binds to.
///
/// Every write that reaches the store ends in reconciliation: on success
/// exactly one entry is patched, on failure the whole collection is
/// fetched again.
pub struct CollectionController<F: EditForm> {
    service: ItemService<F::Entity>,
    pub items: Vec<F::Entity>,
    pub loading: bool,
    pub submitting: bool,
    pub message: Option<String>,
}

impl<F: EditForm> CollectionController<F> {
    pub fn new(service: ItemService<F::Entity>) -> Self {
        Self {
            service,
            items: Vec::new(),
            loading: false,
            submitting: false,
            message: None,
        }
    }

    /// Replaces the collection with the store's. On failure the old
    /// collection stays and the message is set.
    pub async fn load(&mut self) -> Result<(), StoreError> {
        self.loading = true;
        let res = self.service.list().await;
        self.loading = false;
        match res {
            Ok(items) => {
                self.items = items;
                Ok(())
            }
            Err(e) => {
                error!(error = %e, collection = %F::Entity::COLLECTION, "load failed");
                self.message = Some(format!("Failed to load {} list.", F::Entity::LABEL));
                Err(e)
            }
        }
    }

    pub fn find(&self, id: u64) -> Result<&F::Entity, ActionError> {
        self.items
            .iter()
            .find(|item| item.id() == id)
            .ok_or(ActionError::NotFound {
                collection: F::Entity::COLLECTION,
                id,
            })
    }

    /// Edit buffer for `id`. The store has no fetch-by-id, so the full
    /// collection is reloaded and filtered here.
    pub async fn open_edit(&mut self, id: u64, prompt: &dyn Prompt) -> Result<F, ActionError> {
        if let Err(e) = self.load().await {
            prompt.alert(&format!("Failed to load {} data.", F::Entity::LABEL));
            return Err(e.into());
        }
        match self.find(id) {
            Ok(entity) => Ok(F::from_entity(entity)),
            Err(e) => {
                warn!(id, collection = %F::Entity::COLLECTION, "edit target missing");
                prompt.alert(&format!("{} not found.", capitalize(F::Entity::LABEL)));
                Err(e)
            }
        }
    }

    /// Creates when the buffer has no id, updates otherwise.
    pub async fn submit(&mut self, form: &F, prompt: &dyn Prompt) -> Result<F::Entity, ActionError> {
        if self.submitting {
            return Err(ActionError::Busy);
        }
        let draft = match form.validate() {
            Ok(d) => d,
            Err(e) => {
                let msg = e.to_string();
                prompt.alert(&msg);
                self.message = Some(msg);
                return Err(e.into());
            }
        };

        self.submitting = true;
        self.message = None;
        let res = match form.id() {
            Some(id) => {
                self.service
                    .update(&F::Entity::from_draft(id, draft))
                    .await
            }
            None => self.service.create(draft).await,
        };
        self.submitting = false;

        match res {
            Ok(saved) => {
                replace_or_append(&mut self.items, saved.clone());
                info!(id = saved.id(), collection = %F::Entity::COLLECTION, "saved");
                Ok(saved)
            }
            Err(e) => {
                error!(error = %e, collection = %F::Entity::COLLECTION, "save failed");
                let msg = format!(
                    "Failed to save {}: {}. Check your connection and try again.",
                    F::Entity::LABEL,
                    e
                );
                prompt.alert(&msg);
                self.message = Some(msg);
                // Reload errors are already logged; the save error is what the caller sees.
                let _ = self.load().await;
                Err(e.into())
            }
        }
    }

    /// Returns `false` when the user declined; nothing is sent then.
    pub async fn delete(&mut self, id: u64, prompt: &dyn Prompt) -> Result<bool, ActionError> {
        let question = format!("Are you sure you want to delete this {}?", F::Entity::LABEL);
        if !prompt.confirm(&question) {
            return Ok(false);
        }
        match self.service.delete(id).await {
            Ok(_) => {
                self.items.retain(|item| item.id() != id);
                Ok(true)
            }
            Err(e) => {
                error!(error = %e, id, collection = %F::Entity::COLLECTION, "delete failed");
                let msg = format!("Failed to delete {}. Please try again.", F::Entity::LABEL);
                prompt.alert(&msg);
                self.message = Some(msg);
                Err(e.into())
            }
        }
    }
}

/// Puts `saved` where its id already is, or at the end.
pub(crate) fn replace_or_append<E: Entity>(items: &mut Vec<E>, saved: E) {
    match items.iter_mut().find(|item| item.id() == saved.id()) {
        Some(slot) => *slot = saved,
        None => items.push(saved),
    }
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
