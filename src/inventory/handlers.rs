use tracing::error;

use super::dto::InventoryForm;
use crate::images::{CameraDevice, CameraError, CameraSession};
use crate::items::CollectionController;
use crate::ui::Prompt;

pub type InventoryController = CollectionController<InventoryForm>;

/// Opens the camera, freezes one frame into the buffer's photo and
/// releases the camera again.
pub async fn take_photo(
    form: &mut InventoryForm,
    device: &dyn CameraDevice,
    prompt: &dyn Prompt,
) -> Result<(), CameraError> {
    let res = async {
        let mut session = CameraSession::start(device).await?;
        session.capture()
    }
    .await;
    match res {
        Ok(photo) => {
            form.photo = photo;
            Ok(())
        }
        Err(e) => {
            error!(error = %e, "camera capture failed");
            prompt.alert("Could not access the camera. Please check permissions.");
            Err(e)
        }
    }
}
