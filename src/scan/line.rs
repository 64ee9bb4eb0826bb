use std::sync::Arc;

use tokio::sync::Mutex;

use super::decoder::{
    CameraConstraint, DecodeEvent, DecodeSink, Decoder, DecoderSession, ScanConfig,
};

type Slot = Arc<Mutex<Option<DecodeSink>>>;

/// Decoder fed by a keyboard-wedge scanner: every input line is one frame.
pub struct LineDecoder {
    slot: Slot,
}

/// Input side of a [`LineDecoder`].
#[derive(Clone)]
pub struct FrameFeed {
    slot: Slot,
}

pub struct LineSession {
    slot: Slot,
}

impl LineDecoder {
    pub fn new() -> (Self, FrameFeed) {
        let slot: Slot = Arc::new(Mutex::new(None));
        (Self { slot: slot.clone() }, FrameFeed { slot })
    }
}

impl FrameFeed {
    /// Pushes one frame. Returns `false` when no session is running.
    pub async fn push(&self, line: &str) -> bool {
        let guard = self.slot.lock().await;
        let Some(sink) = guard.as_ref() else {
            return false;
        };
        let text = line.trim();
        let event = if text.is_empty() {
            DecodeEvent::NoSymbol
        } else {
            DecodeEvent::Decoded(text.to_string())
        };
        sink.send(event).is_ok()
    }
}

impl Decoder for LineDecoder {
    type Session = LineSession;

    async fn start(
        &mut self,
        _constraint: CameraConstraint,
        config: ScanConfig,
        sink: DecodeSink,
    ) -> Result<LineSession, String> {
        let mut guard = self.slot.lock().await;
        if guard.is_some() {
            return Err("decoder is already running".to_string());
        }
        *guard = Some(sink);
        tracing::debug!("Line decoder started ({} fps target)", config.fps);
        Ok(LineSession {
            slot: self.slot.clone(),
        })
    }
}

impl DecoderSession for LineSession {
    async fn stop(self) -> Result<(), String> {
        self.slot.lock().await.take();
        Ok(())
    }
}
