use tracing::warn;

use super::dto::UserProfile;
use crate::error::StoreError;
use crate::items::ItemService;

/// The single household profile: the first row of the users collection.
///
/// This is the only place that knows the profile is positional.
pub async fn fetch_current(service: &ItemService<UserProfile>) -> Result<Option<UserProfile>, StoreError> {
    let mut users = service.list().await?;
    if users.len() > 1 {
        warn!(count = users.len(), "more than one profile stored; using the first");
    }
    Ok(if users.is_empty() {
        None
    } else {
        Some(users.swap_remove(0))
    })
}
