use std::io::Cursor;

use base64::{engine::general_purpose, Engine as _};
use bytes::Bytes;
use image::{codecs::jpeg::JpegEncoder, imageops::FilterType, DynamicImage, RgbImage};
use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::{debug, warn};

/// Longest side, in pixels, of any photo sent to the store.
pub const MAX_DIMENSION: u32 = 800;
/// JPEG quality of a frame frozen from the camera.
pub const CAPTURE_QUALITY: u8 = 90;
/// JPEG quality after downscaling.
pub const COMPRESS_QUALITY: u8 = 70;

#[derive(Debug, Error)]
pub enum ImageError {
    #[error("not a base64 image data URI")]
    NotDataUri,
    #[error("invalid base64 payload: {0}")]
    Base64(#[from] base64::DecodeError),
    #[error("image codec error: {0}")]
    Codec(#[from] image::ImageError),
}

/// `data:image/<type>;base64,<payload>` with the payload decoded.
#[derive(Debug, Clone, PartialEq)]
pub struct DataUri {
    pub mime: String,
    pub bytes: Bytes,
}

impl DataUri {
    pub fn parse(raw: &str) -> Result<Self, ImageError> {
        lazy_static! {
            static ref DATA_URI_RE: Regex =
                Regex::new(r"^data:(image/[A-Za-z0-9.+-]+);base64,([A-Za-z0-9+/=\s]*)$").unwrap();
        }
        let caps = DATA_URI_RE.captures(raw.trim()).ok_or(ImageError::NotDataUri)?;
        let payload: String = caps[2].chars().filter(|c| !c.is_whitespace()).collect();
        let bytes = general_purpose::STANDARD.decode(payload)?;
        Ok(Self {
            mime: caps[1].to_lowercase(),
            bytes: Bytes::from(bytes),
        })
    }

    pub fn jpeg(bytes: Vec<u8>) -> Self {
        Self {
            mime: "image/jpeg".into(),
            bytes: Bytes::from(bytes),
        }
    }

    pub fn encode(&self) -> String {
        format!(
            "data:{};base64,{}",
            self.mime,
            general_purpose::STANDARD.encode(&self.bytes)
        )
    }
}

/// True for photos carried as an image data URI rather than an emoji or label.
pub fn is_image_data_uri(photo: &str) -> bool {
    photo.trim_start().starts_with("data:image/")
}

pub fn encode_jpeg(frame: &RgbImage, quality: u8) -> Result<Vec<u8>, ImageError> {
    let mut buf = Vec::new();
    let mut encoder = JpegEncoder::new_with_quality(&mut buf, quality);
    encoder.encode_image(frame)?;
    Ok(buf)
}

/// Size that fits `bound` on the long side, keeping the aspect ratio.
pub fn fit_within(width: u32, height: u32, bound: u32) -> (u32, u32) {
    let long = width.max(height);
    if long <= bound {
        return (width, height);
    }
    let scale = f64::from(bound) / f64::from(long);
    let shrink = |side: u32| ((f64::from(side) * scale).round() as u32).clamp(1, bound);
    if width >= height {
        (bound, shrink(height))
    } else {
        (shrink(width), bound)
    }
}

/// Decodes, downsizes to `MAX_DIMENSION` and re-encodes as JPEG.
/// `None` when the image is already within bounds.
pub fn compress(uri: &DataUri) -> Result<Option<DataUri>, ImageError> {
    let img = image::load_from_memory(&uri.bytes)?;
    let (w, h) = (img.width(), img.height());
    let (nw, nh) = fit_within(w, h, MAX_DIMENSION);
    if (nw, nh) == (w, h) {
        return Ok(None);
    }
    let resized = img.resize_exact(nw, nh, FilterType::Triangle).to_rgb8();
    let jpeg = encode_jpeg(&resized, COMPRESS_QUALITY)?;
    debug!(from = ?(w, h), to = ?(nw, nh), before = uri.bytes.len(), after = jpeg.len(), "photo compressed");
    Ok(Some(DataUri::jpeg(jpeg)))
}

/// Best effort: anything that is not a decodable image goes out as it came in.
pub fn compress_photo(photo: &str) -> String {
    if !is_image_data_uri(photo) {
        return photo.to_string();
    }
    match DataUri::parse(photo).and_then(|uri| compress(&uri)) {
        Ok(Some(smaller)) => smaller.encode(),
        Ok(None) => photo.to_string(),
        Err(e) => {
            warn!(error = %e, "photo compression skipped");
            photo.to_string()
        }
    }
}

pub fn decode(uri: &DataUri) -> Result<DynamicImage, ImageError> {
    Ok(image::load_from_memory(&uri.bytes)?)
}

/// Encodes an image as a PNG data URI.
pub fn png_data_uri(img: &DynamicImage) -> Result<String, ImageError> {
    let mut buf = Vec::new();
    img.write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)?;
    Ok(DataUri {
        mime: "image/png".into(),
        bytes: Bytes::from(buf),
    }
    .encode())
}

#[cfg(test)]
mod image_tests {
    use image::{GenericImageView, Rgb};

    use super::*;

    fn sample(w: u32, h: u32) -> DynamicImage {
        DynamicImage::ImageRgb8(RgbImage::from_fn(w, h, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 128])
        }))
    }

    fn dims(photo: &str) -> (u32, u32) {
        decode(&DataUri::parse(photo).unwrap()).unwrap().dimensions()
    }

    #[test]
    fn wide_image_long_side_becomes_bound() {
        let photo = png_data_uri(&sample(1600, 1200)).unwrap();
        let out = compress_photo(&photo);
        assert!(out.starts_with("data:image/jpeg;base64,"));
        assert_eq!(dims(&out), (800, 600));
    }

    #[test]
    fn tall_image_long_side_becomes_bound() {
        let photo = png_data_uri(&sample(500, 1000)).unwrap();
        assert_eq!(dims(&compress_photo(&photo)), (400, 800));
    }

    #[test]
    fn image_within_bounds_is_untouched() {
        let photo = png_data_uri(&sample(400, 300)).unwrap();
        let out = compress_photo(&photo);
        assert_eq!(out, photo);
        assert_eq!(dims(&out), (400, 300));
    }

    #[test]
    fn emoji_and_broken_payloads_pass_through() {
        assert_eq!(compress_photo("🍅"), "🍅");
        let broken = "data:image/jpeg;base64,bm90IGFuIGltYWdl";
        assert_eq!(compress_photo(broken), broken);
        let bad_b64 = "data:image/png;base64,@@@";
        assert_eq!(compress_photo(bad_b64), bad_b64);
    }

    #[test]
    fn fit_within_keeps_ratio() {
        assert_eq!(fit_within(800, 800, 800), (800, 800));
        assert_eq!(fit_within(1000, 333, 800), (800, 266));
        assert_eq!(fit_within(4000, 1, 800), (800, 1));
    }

    #[test]
    fn data_uri_parse_and_encode() {
        let uri = DataUri::parse("data:image/PNG;base64,AAEC").unwrap();
        assert_eq!(uri.mime, "image/png");
        assert_eq!(&uri.bytes[..], &[0u8, 1, 2]);
        assert_eq!(uri.encode(), "data:image/png;base64,AAEC");
        assert!(matches!(DataUri::parse("🍅"), Err(ImageError::NotDataUri)));
    }
}
