//! A camera backed by photos on disk.
//!
//! [`StillImageCamera`] treats a configured file, or the newest image inside a
//! configured directory, as the device.  Opening decodes the photo; capturing
//! downsizes it to `max_dimension` and encodes it as JPEG.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use image::codecs::jpeg::JpegEncoder;
use image::imageops::FilterType;
use image::{DynamicImage, ImageReader};

use crate::camera::{Camera, CameraError, CameraStream};
use crate::config::AppConfig;

/// File extensions accepted when the source is a directory.
const IMAGE_EXTENSIONS: [&str; 4] = ["jpg", "jpeg", "png", "webp"];

// ---------------------------------------------------------------------------
// StillImageCamera
// ---------------------------------------------------------------------------

/// Camera device that reads fridge photos from the filesystem.
#[derive(Debug, Clone)]
pub struct StillImageCamera {
    source: PathBuf,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl StillImageCamera {
    pub fn new(source: impl Into<PathBuf>, max_dimension: u32, jpeg_quality: u8) -> Self {
        Self {
            source: source.into(),
            max_dimension: max_dimension.max(1),
            jpeg_quality: jpeg_quality.clamp(1, 100),
        }
    }

    pub fn from_config(config: &AppConfig) -> Self {
        Self::new(
            config.camera_source(),
            config.camera.max_dimension,
            config.camera.jpeg_quality,
        )
    }

    pub fn source(&self) -> &Path {
        &self.source
    }
}

/// Resolve the photo to use: the source itself, or the most recently
/// modified image inside it.
fn resolve_photo(source: &Path) -> Result<PathBuf, CameraError> {
    let meta = std::fs::metadata(source).map_err(|e| io_error(source, e))?;
    if meta.is_file() {
        return Ok(source.to_path_buf());
    }

    let entries = std::fs::read_dir(source).map_err(|e| io_error(source, e))?;
    entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.to_ascii_lowercase().as_str()))
        })
        .filter_map(|path| {
            let modified = std::fs::metadata(&path).and_then(|m| m.modified()).ok()?;
            Some((modified, path))
        })
        .max_by_key(|(modified, _)| *modified)
        .map(|(_, path)| path)
        .ok_or_else(|| CameraError::NoDevice(format!("no photos in {}", source.display())))
}

fn io_error(path: &Path, e: std::io::Error) -> CameraError {
    match e.kind() {
        std::io::ErrorKind::PermissionDenied => {
            CameraError::PermissionDenied(format!("{}: {e}", path.display()))
        }
        _ => CameraError::NoDevice(format!("{}: {e}", path.display())),
    }
}

fn decode(path: &Path) -> Result<DynamicImage, CameraError> {
    ImageReader::open(path)
        .map_err(|e| io_error(path, e))?
        .with_guessed_format()
        .map_err(|e| io_error(path, e))?
        .decode()
        .map_err(|e| CameraError::Capture(format!("{}: {e}", path.display())))
}

#[async_trait]
impl Camera for StillImageCamera {
    async fn open(&self) -> Result<Box<dyn CameraStream>, CameraError> {
        let source = self.source.clone();

        let (path, frame) = tokio::task::spawn_blocking(move || {
            let path = resolve_photo(&source)?;
            let frame = decode(&path)?;
            Ok::<_, CameraError>((path, frame))
        })
        .await
        .map_err(|e| CameraError::Capture(format!("decode task failed: {e}")))??;

        log::info!(
            "camera: opened {} ({}x{})",
            path.display(),
            frame.width(),
            frame.height()
        );

        Ok(Box::new(StillImageStream {
            path,
            frame,
            max_dimension: self.max_dimension,
            jpeg_quality: self.jpeg_quality,
        }))
    }
}

// ---------------------------------------------------------------------------
// StillImageStream
// ---------------------------------------------------------------------------

struct StillImageStream {
    path: PathBuf,
    frame: DynamicImage,
    max_dimension: u32,
    jpeg_quality: u8,
}

impl CameraStream for StillImageStream {
    fn capture_jpeg(&mut self) -> Result<Vec<u8>, CameraError> {
        encode_jpeg(&self.frame, self.max_dimension, self.jpeg_quality)
    }

    fn release(self: Box<Self>) {
        log::debug!("camera: released {}", self.path.display());
    }
}

/// Downsize `frame` so its longest edge is at most `max_dimension`, then
/// encode it as JPEG.
pub fn encode_jpeg(
    frame: &DynamicImage,
    max_dimension: u32,
    quality: u8,
) -> Result<Vec<u8>, CameraError> {
    let scaled = if frame.width() > max_dimension || frame.height() > max_dimension {
        frame.resize(max_dimension, max_dimension, FilterType::Triangle)
    } else {
        frame.clone()
    };

    let rgb = scaled.to_rgb8();
    let mut jpeg = Vec::new();
    JpegEncoder::new_with_quality(&mut jpeg, quality)
        .encode_image(&rgb)
        .map_err(|e| CameraError::Capture(e.to_string()))?;
    Ok(jpeg)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
