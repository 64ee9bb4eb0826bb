pub mod camera;
pub mod decoder;
pub mod line;
pub mod payload;

pub use camera::{probe_camera, Camera, CameraFailure, CaptureStream, DeviceCamera};
pub use decoder::{
    CameraConstraint, DecodeEvent, DecodeSink, Decoder, DecoderSession, FacingMode, ScanConfig,
};
pub use line::{FrameFeed, LineDecoder};
pub use payload::parse_payload;
