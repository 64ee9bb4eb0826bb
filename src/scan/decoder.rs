use std::future::Future;

use tokio::sync::mpsc;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FacingMode {
    /// Rear camera.
    #[default]
    Environment,
    User,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CameraConstraint {
    pub facing_mode: FacingMode,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScanConfig {
    pub fps: u32,
    pub box_width: u32,
    pub box_height: u32,
    pub aspect_ratio: f32,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            fps: 10,
            box_width: 250,
            box_height: 250,
            aspect_ratio: 1.0,
        }
    }
}

/// One frame's outcome as reported by the decoder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeEvent {
    Decoded(String),
    /// Frame without a readable symbol. Routine; never surfaced.
    NoSymbol,
}

pub type DecodeSink = mpsc::UnboundedSender<DecodeEvent>;

/// External QR decoding capability.
pub trait Decoder: Send {
    type Session: DecoderSession;

    fn start(
        &mut self,
        constraint: CameraConstraint,
        config: ScanConfig,
        sink: DecodeSink,
    ) -> impl Future<Output = Result<Self::Session, String>> + Send;
}

/// A running decoder. Stopping consumes it, so it can only stop once.
pub trait DecoderSession: Send {
    fn stop(self) -> impl Future<Output = Result<(), String>> + Send;
}

/// Maps a decoder start failure onto the banner taxonomy.
pub fn classify_start_failure(message: &str) -> AppError {
    let lower = message.to_lowercase();
    if lower.contains("permission") {
        AppError::PermissionDenied
    } else if lower.contains("notfound") || lower.contains("not found") {
        AppError::NoCamera
    } else {
        AppError::Decoder(message.to_string())
    }
}
