pub mod camera;
pub mod services;

pub use camera::{CameraDevice, CameraError, CameraSession, StillImageCamera};
pub use services::{compress_photo, is_image_data_uri, DataUri, ImageError};
