use tracing::{error, info};

use super::dto::{ProfileForm, UserProfile};
use super::services::fetch_current;
use crate::error::ActionError;
use crate::items::{EditForm, ItemService};
use crate::ui::Prompt;

/// Profile screen: one entity, one edit buffer.
pub struct ProfileController {
    service: ItemService<UserProfile>,
    pub profile: Option<UserProfile>,
    pub form: ProfileForm,
    pub loading: bool,
    pub submitting: bool,
    pub message: Option<String>,
}

impl ProfileController {
    pub fn new(service: ItemService<UserProfile>) -> Self {
        Self {
            service,
            profile: None,
            form: ProfileForm::default(),
            loading: false,
            submitting: false,
            message: None,
        }
    }

    /// Loads the stored profile into the edit buffer; a blank buffer when
    /// none exists yet.
    pub async fn load(&mut self) -> Result<Option<&UserProfile>, ActionError> {
        self.loading = true;
        let res = fetch_current(&self.service).await;
        self.loading = false;
        match res {
            Ok(profile) => {
                self.form = profile.as_ref().map(ProfileForm::from_entity).unwrap_or_default();
                self.profile = profile;
                Ok(self.profile.as_ref())
            }
            Err(e) => {
                error!(error = %e, "profile load failed");
                self.message =
                    Some("Failed to load user data. Please try refreshing the page.".into());
                Err(e.into())
            }
        }
    }

    /// Saves the edit buffer: create on first save, update afterwards.
    pub async fn submit(&mut self, prompt: &dyn Prompt) -> Result<&UserProfile, ActionError> {
        if self.submitting {
            return Err(ActionError::Busy);
        }
        let draft = match self.form.validate() {
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
        let res = match self.form.id {
            Some(id) => self.service.update(&UserProfile { id, fields: draft }).await,
            None => self.service.create(draft).await,
        };
        self.submitting = false;

        match res {
            Ok(saved) => {
                let created = self.form.id.is_none();
                info!(id = saved.id, created, "profile saved");
                self.message = Some(if created {
                    "Profile created successfully!".into()
                } else {
                    "Profile updated successfully!".into()
                });
                self.form = ProfileForm::from_entity(&saved);
                Ok(self.profile.insert(saved))
            }
            Err(e) => {
                error!(error = %e, "profile save failed");
                let msg = format!(
                    "Failed to save profile: {}. Please check your connection and try again.",
                    e
                );
                prompt.alert(&msg);
                self.message = Some(msg);
                // The edit buffer is kept; only the stored profile is refreshed.
                match fetch_current(&self.service).await {
                    Ok(profile) => self.profile = profile,
                    Err(reload) => error!(error = %reload, "profile reload failed"),
                }
                Err(e.into())
            }
        }
    }
}
