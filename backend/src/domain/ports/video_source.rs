//! Port for camera hardware.
//!
//! A [`VideoStream`] holds the device until [`VideoStream::stop`] is called.
//! Adapters must make `stop` idempotent.

use image::RgbImage;

use super::define_port_error;

define_port_error! {
    /// Errors raised while acquiring or reading a camera.
    pub enum CameraError {
        /// The user or platform refused camera access.
        PermissionDenied => "camera permission denied",
        /// No matching device, or the device is busy.
        Unavailable { message: String } => "camera unavailable: {message}",
        /// The stream could not produce a frame.
        Frame { message: String } => "camera frame could not be read: {message}",
    }
}

/// Which way the camera should face.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacingMode {
    /// Front camera, facing the user.
    User,
    /// Rear camera.
    Environment,
}

/// Requested stream characteristics. Sizes are preferences, not guarantees.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoConstraints {
    pub facing: FacingMode,
    pub ideal_width: u32,
    pub ideal_height: u32,
}

impl VideoConstraints {
    /// Front-facing stream at 600x600, the size of an uploaded photo.
    #[must_use]
    pub const fn selfie() -> Self {
        Self {
            facing: FacingMode::User,
            ideal_width: 600,
            ideal_height: 600,
        }
    }
}

/// A live, device-holding video stream.
pub trait VideoStream: Send {
    /// Copy the current frame.
    fn grab_frame(&mut self) -> Result<RgbImage, CameraError>;

    /// Release every track held by the stream.
    fn stop(&mut self);
}

/// Acquires video streams.
pub trait VideoSource: Send + Sync {
    /// Open a stream matching `constraints`.
    fn open(&self, constraints: &VideoConstraints) -> Result<Box<dyn VideoStream>, CameraError>;
}
