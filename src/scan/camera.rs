use std::future::Future;
use std::io;
use std::path::PathBuf;

use reqwest::Url;

use crate::error::{AppError, AppResult};

use super::decoder::CameraConstraint;

/// Hosts on which camera access is allowed without https.
const LOCAL_DEV_HOSTS: &[&str] = &["localhost", "127.0.0.1", "[::1]"];

/// Why acquiring a capture stream failed, as reported by the platform.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CameraFailure {
    NotAllowed,
    NotFound,
    Other(String),
}

impl CameraFailure {
    /// Classifies a platform error by its reason name.
    pub fn from_reason(name: &str, message: &str) -> Self {
        match name {
            "NotAllowedError" | "PermissionDeniedError" => CameraFailure::NotAllowed,
            "NotFoundError" | "DevicesNotFoundError" => CameraFailure::NotFound,
            _ => CameraFailure::Other(message.to_string()),
        }
    }
}

impl From<io::Error> for CameraFailure {
    fn from(err: io::Error) -> Self {
        match err.kind() {
            io::ErrorKind::PermissionDenied => CameraFailure::NotAllowed,
            io::ErrorKind::NotFound => CameraFailure::NotFound,
            _ => CameraFailure::Other(err.to_string()),
        }
    }
}

impl From<CameraFailure> for AppError {
    fn from(failure: CameraFailure) -> Self {
        match failure {
            CameraFailure::NotAllowed => AppError::PermissionDenied,
            CameraFailure::NotFound => AppError::NoCamera,
            CameraFailure::Other(msg) => AppError::Camera(msg),
        }
    }
}

pub trait CaptureStream: Send {
    /// Releases every track of the stream.
    fn stop_tracks(&mut self);
}

pub trait Camera: Send + Sync {
    type Stream: CaptureStream;

    fn is_available(&self) -> bool;

    fn acquire(
        &self,
        constraint: CameraConstraint,
    ) -> impl Future<Output = Result<Self::Stream, CameraFailure>> + Send;
}

pub fn is_secure_origin(origin: &Url) -> bool {
    origin.scheme() == "https"
        || origin
            .host_str()
            .is_some_and(|host| LOCAL_DEV_HOSTS.contains(&host))
}

/// Checks that the camera can be opened before the decoder is attached.
///
/// The probe stream is released before returning.
pub async fn probe_camera<C: Camera>(camera: &C, origin: &Url) -> AppResult<()> {
    if !is_secure_origin(origin) {
        return Err(AppError::InsecureContext);
    }
    if !camera.is_available() {
        return Err(AppError::CameraUnsupported);
    }

    let mut stream = camera.acquire(CameraConstraint::default()).await?;
    stream.stop_tracks();
    Ok(())
}

/// Scanner attached as a device node, or the keyboard wedge when none is set.
#[derive(Debug, Clone, Default)]
pub struct DeviceCamera {
    device: Option<PathBuf>,
}

impl DeviceCamera {
    pub fn new(device: Option<PathBuf>) -> Self {
        Self { device }
    }
}

#[derive(Debug)]
pub struct DeviceStream {
    handle: Option<std::fs::File>,
}

impl CaptureStream for DeviceStream {
    fn stop_tracks(&mut self) {
        self.handle.take();
    }
}

impl Camera for DeviceCamera {
    type Stream = DeviceStream;

    fn is_available(&self) -> bool {
        true
    }

    async fn acquire(&self, _constraint: CameraConstraint) -> Result<DeviceStream, CameraFailure> {
        let Some(path) = &self.device else {
            return Ok(DeviceStream { handle: None });
        };
        let file = tokio::fs::File::open(path).await?;
        Ok(DeviceStream {
            handle: Some(file.into_std().await),
        })
    }
}
