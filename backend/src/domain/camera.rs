//! Selfie capture session over a [`VideoSource`].
//!
//! A session holds at most one live stream. The stream is stopped on capture,
//! close, confirm and drop, so no exit path leaves the device held.

use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::domain::photo::{self, JpegPhoto};
use crate::domain::ports::{CameraError, VideoConstraints, VideoSource, VideoStream};

/// Message shown whenever the camera cannot be used.
pub const CAMERA_ACCESS_MESSAGE: &str =
    "Could not access camera. Please allow camera permissions.";

/// Why the session could not show a live picture.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFailure {
    PermissionDenied,
    Unavailable(String),
    Frame(String),
}

impl CameraFailure {
    /// Text for the user. Every failure reads the same.
    pub fn message(&self) -> &'static str {
        CAMERA_ACCESS_MESSAGE
    }
}

impl From<CameraError> for CameraFailure {
    fn from(err: CameraError) -> Self {
        match err {
            CameraError::PermissionDenied => Self::PermissionDenied,
            CameraError::Unavailable { message } => Self::Unavailable(message),
            CameraError::Frame { message } => Self::Frame(message),
        }
    }
}

/// Observable state of a [`CameraCapture`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CaptureState {
    Closed,
    Live,
    Captured,
    Failed(CameraFailure),
}

/// Calling an operation from the wrong state.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CaptureError {
    #[error("the camera is not live")]
    NotLive,
    #[error("no photo has been captured")]
    NoStill,
}

enum Phase {
    Closed,
    Live(Box<dyn VideoStream>),
    Captured(JpegPhoto),
    Failed(CameraFailure),
}

/// One selfie capture session.
pub struct CameraCapture {
    source: Arc<dyn VideoSource>,
    constraints: VideoConstraints,
    phase: Phase,
}

impl CameraCapture {
    /// Closed session using front-facing 600x600 constraints.
    pub fn new(source: Arc<dyn VideoSource>) -> Self {
        Self {
            source,
            constraints: VideoConstraints::selfie(),
            phase: Phase::Closed,
        }
    }

    pub fn state(&self) -> CaptureState {
        match &self.phase {
            Phase::Closed => CaptureState::Closed,
            Phase::Live(_) => CaptureState::Live,
            Phase::Captured(_) => CaptureState::Captured,
            Phase::Failed(failure) => CaptureState::Failed(failure.clone()),
        }
    }

    /// The still awaiting confirmation, if any.
    pub fn still(&self) -> Option<&JpegPhoto> {
        match &self.phase {
            Phase::Captured(photo) => Some(photo),
            _ => None,
        }
    }

    /// Acquire a stream. Failures land in [`CaptureState::Failed`].
    pub fn open(&mut self) -> CaptureState {
        if matches!(self.phase, Phase::Live(_)) {
            return CaptureState::Live;
        }
        self.release();
        self.phase = match self.source.open(&self.constraints) {
            Ok(stream) => {
                debug!("camera stream opened");
                Phase::Live(stream)
            }
            Err(err) => {
                warn!(error = %err, "camera could not be opened");
                Phase::Failed(err.into())
            }
        };
        self.state()
    }

    /// Grab one frame, encode it and stop the stream.
    ///
    /// A frame or encode failure stops the stream and moves the session to
    /// [`CaptureState::Failed`].
    pub fn capture(&mut self) -> Result<CaptureState, CaptureError> {
        let mut stream = match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Live(stream) => stream,
            other => {
                self.phase = other;
                return Err(CaptureError::NotLive);
            }
        };
        let grabbed = stream.grab_frame();
        stream.stop();
        self.phase = match grabbed {
            Ok(frame) => match photo::encode_jpeg(&frame) {
                Ok(jpeg) => Phase::Captured(jpeg),
                Err(err) => Phase::Failed(CameraFailure::Frame(err.to_string())),
            },
            Err(err) => {
                warn!(error = %err, "camera frame could not be read");
                Phase::Failed(err.into())
            }
        };
        Ok(self.state())
    }

    /// Discard the still and reopen the stream.
    pub fn retake(&mut self) -> Result<CaptureState, CaptureError> {
        if !matches!(self.phase, Phase::Captured(_)) {
            return Err(CaptureError::NoStill);
        }
        self.phase = Phase::Closed;
        self.open();
        Ok(self.state())
    }

    /// Hand over the still and close the session.
    pub fn confirm(&mut self) -> Result<JpegPhoto, CaptureError> {
        match std::mem::replace(&mut self.phase, Phase::Closed) {
            Phase::Captured(photo) => Ok(photo),
            other => {
                self.phase = other;
                Err(CaptureError::NoStill)
            }
        }
    }

    /// Close without a photo.
    pub fn close(&mut self) {
        self.release();
        self.phase = Phase::Closed;
    }

    fn release(&mut self) {
        if let Phase::Live(stream) = &mut self.phase {
            stream.stop();
            debug!("camera stream released");
        }
    }
}

impl Drop for CameraCapture {
    fn drop(&mut self) {
        self.release();
    }
}

impl fmt::Debug for CameraCapture {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CameraCapture")
            .field("state", &self.state())
            .finish_non_exhaustive()
    }
}
