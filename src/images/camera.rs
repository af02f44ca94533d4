use std::path::PathBuf;

use async_trait::async_trait;
use image::RgbImage;
use thiserror::Error;
use tracing::{debug, info, warn};

use super::services::{encode_jpeg, DataUri, CAPTURE_QUALITY};

#[derive(Debug, Error)]
pub enum CameraError {
    #[error("could not access the camera: {0}")]
    Unavailable(String),
    #[error("camera stream already stopped")]
    Stopped,
    #[error(transparent)]
    Image(#[from] super::services::ImageError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Facing {
    /// Rear camera.
    Environment,
    /// Front camera.
    User,
}

/// A live video source.
pub trait VideoStream: Send {
    /// Current frame.
    fn frame(&mut self) -> Result<RgbImage, CameraError>;
    /// Stops every track. Idempotent.
    fn stop(&mut self);
}

#[async_trait]
pub trait CameraDevice: Send + Sync {
    async fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError>;
}

/// An acquired camera stream. Dropping the session stops the stream,
/// whether or not a capture was taken.
pub struct CameraSession {
    stream: Box<dyn VideoStream>,
    pub facing: Facing,
}

impl CameraSession {
    /// Opens the rear camera, or the front one when there is no rear camera.
    pub async fn start(device: &dyn CameraDevice) -> Result<Self, CameraError> {
        match device.open(Facing::Environment).await {
            Ok(stream) => Ok(Self {
                stream,
                facing: Facing::Environment,
            }),
            Err(e) => {
                warn!(error = %e, "rear camera unavailable, trying front camera");
                let stream = device.open(Facing::User).await?;
                Ok(Self {
                    stream,
                    facing: Facing::User,
                })
            }
        }
    }

    /// Freezes the current frame as a JPEG data URI.
    pub fn capture(&mut self) -> Result<String, CameraError> {
        let frame = self.stream.frame()?;
        let jpeg = encode_jpeg(&frame, CAPTURE_QUALITY)?;
        info!(width = frame.width(), height = frame.height(), bytes = jpeg.len(), "photo captured");
        Ok(DataUri::jpeg(jpeg).encode())
    }
}

impl Drop for CameraSession {
    fn drop(&mut self) {
        self.stream.stop();
        debug!("camera stream released");
    }
}

/// Camera whose "stream" is a still image read from disk.
pub struct StillImageCamera {
    pub path: PathBuf,
}

struct StillStream {
    frame: Option<RgbImage>,
}

impl VideoStream for StillStream {
    fn frame(&mut self) -> Result<RgbImage, CameraError> {
        self.frame.clone().ok_or(CameraError::Stopped)
    }

    fn stop(&mut self) {
        self.frame = None;
    }
}

#[async_trait]
impl CameraDevice for StillImageCamera {
    async fn open(&self, _facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
        let path = self.path.clone();
        let img = tokio::task::spawn_blocking(move || image::open(path))
            .await
            .map_err(|e| CameraError::Unavailable(e.to_string()))?
            .map_err(|e| CameraError::Unavailable(format!("{}: {}", self.path.display(), e)))?;
        Ok(Box::new(StillStream {
            frame: Some(img.to_rgb8()),
        }))
    }
}

#[cfg(test)]
mod camera_tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use image::{GenericImageView, Rgb};

    use super::*;
    use crate::images::services::decode;

    struct FakeStream {
        stops: Arc<AtomicUsize>,
    }

    impl VideoStream for FakeStream {
        fn frame(&mut self) -> Result<RgbImage, CameraError> {
            Ok(RgbImage::from_pixel(64, 48, Rgb([200, 10, 10])))
        }
        fn stop(&mut self) {
            self.stops.fetch_add(1, Ordering::SeqCst);
        }
    }

    struct FakeCamera {
        has_rear: bool,
        stops: Arc<AtomicUsize>,
    }

    #[async_trait]
    impl CameraDevice for FakeCamera {
        async fn open(&self, facing: Facing) -> Result<Box<dyn VideoStream>, CameraError> {
            if facing == Facing::Environment && !self.has_rear {
                return Err(CameraError::Unavailable("no rear camera".into()));
            }
            Ok(Box::new(FakeStream {
                stops: self.stops.clone(),
            }))
        }
    }

    #[tokio::test]
    async fn prefers_rear_camera_and_captures_jpeg() {
        let stops = Arc::new(AtomicUsize::new(0));
        let cam = FakeCamera { has_rear: true, stops: stops.clone() };

        let mut session = CameraSession::start(&cam).await.unwrap();
        assert_eq!(session.facing, Facing::Environment);
        let photo = session.capture().unwrap();

        assert!(photo.starts_with("data:image/jpeg;base64,"));
        let img = decode(&DataUri::parse(&photo).unwrap()).unwrap();
        assert_eq!(img.dimensions(), (64, 48));
        drop(session);
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn falls_back_to_front_camera() {
        let stops = Arc::new(AtomicUsize::new(0));
        let cam = FakeCamera { has_rear: false, stops };
        let session = CameraSession::start(&cam).await.unwrap();
        assert_eq!(session.facing, Facing::User);
    }

    #[tokio::test]
    async fn stream_released_without_capture() {
        let stops = Arc::new(AtomicUsize::new(0));
        let cam = FakeCamera { has_rear: true, stops: stops.clone() };
        {
            let _session = CameraSession::start(&cam).await.unwrap();
        }
        assert_eq!(stops.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn still_image_camera_reports_missing_file() {
        let cam = StillImageCamera { path: "/nonexistent/photo.jpg".into() };
        let err = CameraSession::start(&cam).await.err().unwrap();
        assert!(matches!(err, CameraError::Unavailable(_)));
    }
}
