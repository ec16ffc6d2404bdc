//! Camera capability: open a device, capture one JPEG frame, release.
//!
//! # Lifecycle
//!
//! ```text
//! Camera::open() ──▶ Box<dyn CameraStream>   (live preview held by the session)
//!                      ├─ capture_jpeg()     → Vec<u8>
//!                      └─ release()          → device handed back, exactly once
//! ```
//!
//! The session holds at most one open stream and releases it before leaving
//! the Scanning screen.

pub mod still;

use async_trait::async_trait;
use thiserror::Error;

pub use still::StillImageCamera;

// ---------------------------------------------------------------------------
// CameraError
// ---------------------------------------------------------------------------

/// Errors that can occur while acquiring or reading the camera.
#[derive(Debug, Error)]
pub enum CameraError {
    /// The user or the OS refused access to the device.
    #[error("camera access denied: {0}")]
    PermissionDenied(String),

    /// No usable device was found.
    #[error("no camera available: {0}")]
    NoDevice(String),

    /// The device was open but the frame could not be read or encoded.
    #[error("failed to capture frame: {0}")]
    Capture(String),
}

// ---------------------------------------------------------------------------
// Traits
// ---------------------------------------------------------------------------

/// An acquirable camera device.
#[async_trait]
pub trait Camera: Send + Sync {
    /// Acquire the device and start a live stream.
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError>;
}

/// An open camera stream.
pub trait CameraStream: Send {
    /// Capture the current frame as JPEG bytes.
    fn capture_jpeg(&mut self) -> Result<Vec<u8>, CameraError>;

    /// Stop the stream and hand the device back.
    fn release(self: Box<Self>);
}
