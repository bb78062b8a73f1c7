//! Photo normalisation before upload.
//!
//! Whatever the child attaches (a phone snapshot, a scanned drawing, a camera
//! still) is decoded, scaled so its longer side is at most
//! [`MAX_DIMENSION`] pixels and re-encoded as JPEG at [`JPEG_QUALITY`].

use std::fmt;

use chrono::{DateTime, Utc};
use image::RgbImage;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use rand::Rng;

/// Upper bound, in pixels, for the longer side of an uploaded photo.
pub const MAX_DIMENSION: u32 = 600;

/// JPEG quality used for every encoded photo (0.8 on a unit scale).
pub const JPEG_QUALITY: u8 = 80;

const BLOB_SUFFIX_LEN: usize = 8;
const BASE36: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";

/// Errors raised while normalising a photo.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PhotoError {
    /// The bytes are not an image in a supported format.
    #[error("photo could not be decoded: {0}")]
    Decode(String),
    /// The JPEG encoder rejected the image.
    #[error("photo could not be encoded: {0}")]
    Encode(String),
}

/// JPEG bytes ready for upload.
#[derive(Clone, PartialEq, Eq)]
pub struct JpegPhoto {
    bytes: Vec<u8>,
    width: u32,
    height: u32,
}

impl JpegPhoto {
    /// Encoded JPEG bytes.
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    /// Pixel width of the encoded image.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Pixel height of the encoded image.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Consume the photo, returning its encoded bytes.
    pub fn into_bytes(self) -> Vec<u8> {
        self.bytes
    }
}

impl fmt::Debug for JpegPhoto {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("JpegPhoto")
            .field("len", &self.bytes.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .finish()
    }
}

/// Target size for an image of `width` x `height` bounded by `max`.
///
/// Landscape images are bounded by width, everything else by height. Images
/// already within bounds keep their size; nothing is upscaled.
///
/// # Examples
/// ```
/// use mailroom::domain::photo::bounded_dimensions;
///
/// assert_eq!(bounded_dimensions(1200, 800, 600), (600, 400));
/// assert_eq!(bounded_dimensions(300, 200, 600), (300, 200));
/// ```
#[must_use]
pub fn bounded_dimensions(width: u32, height: u32, max: u32) -> (u32, u32) {
    if width > height && width > max {
        (max, scale(height, max, width))
    } else if height > max {
        (scale(width, max, height), max)
    } else {
        (width, height)
    }
}

fn scale(side: u32, numerator: u32, denominator: u32) -> u32 {
    let scaled = (u64::from(side) * u64::from(numerator) + u64::from(denominator) / 2)
        / u64::from(denominator);
    u32::try_from(scaled).unwrap_or(u32::MAX).max(1)
}

/// Decode, bound and re-encode a user-supplied photo.
///
/// # Errors
/// Returns [`PhotoError::Decode`] for unreadable input and
/// [`PhotoError::Encode`] if JPEG encoding fails.
pub fn resize_to_jpeg(bytes: &[u8]) -> Result<JpegPhoto, PhotoError> {
    let image =
        image::load_from_memory(bytes).map_err(|error| PhotoError::Decode(error.to_string()))?;
    let (width, height) = bounded_dimensions(image.width(), image.height(), MAX_DIMENSION);
    let resized = if (width, height) == (image.width(), image.height()) {
        image
    } else {
        image.resize_exact(width, height, FilterType::Triangle)
    };
    encode_jpeg(&resized.to_rgb8())
}

/// Encode an RGB frame as JPEG at [`JPEG_QUALITY`] without resizing.
///
/// # Errors
/// Returns [`PhotoError::Encode`] if the encoder fails.
pub fn encode_jpeg(frame: &RgbImage) -> Result<JpegPhoto, PhotoError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, JPEG_QUALITY)
        .encode_image(frame)
        .map_err(|error| PhotoError::Encode(error.to_string()))?;
    Ok(JpegPhoto {
        bytes,
        width: frame.width(),
        height: frame.height(),
    })
}

/// Storage key for an uploaded photo: `{unix_millis}-{random base36}.jpg`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct BlobName(String);

impl BlobName {
    /// Generate a collision-resistant name from the upload time.
    pub fn generate(now: DateTime<Utc>, rng: &mut impl Rng) -> Self {
        let suffix: String = (0..BLOB_SUFFIX_LEN)
            .map(|_| char::from(BASE36[rng.gen_range(0..BASE36.len())]))
            .collect();
        Self(format!("{}-{suffix}.jpg", now.timestamp_millis()))
    }

    /// The key as stored in the bucket.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for BlobName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
