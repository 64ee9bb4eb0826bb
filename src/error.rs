use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Camera requires a secure (https) origin")]
    InsecureContext,

    #[error("Camera API is not available")]
    CameraUnsupported,

    #[error("Camera access denied")]
    PermissionDenied,

    #[error("No camera found")]
    NoCamera,

    #[error("Camera error: {0}")]
    Camera(String),

    #[error("Decoder error: {0}")]
    Decoder(String),

    #[error("QR code carries no item id")]
    MissingItemId,

    #[error("Invalid QR code format: {0}")]
    InvalidPayload(String),

    #[error("Item not found: {0}")]
    NotFound(String),

    #[error("Fetch error: {0}")]
    Fetch(String),

    #[error("Update error: {0}")]
    Update(String),

    #[error("Malformed record: {0}")]
    Decode(String),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
}

impl AppError {
    /// Text shown in the error banner.
    pub fn user_message(&self) -> String {
        match self {
            AppError::Config(msg) => format!("Configuration error: {}", msg),
            AppError::InsecureContext => "Camera requires an HTTPS connection".to_string(),
            AppError::CameraUnsupported => "Camera is not supported on this device".to_string(),
            AppError::PermissionDenied => {
                "Camera access was denied. Please allow camera access in the settings.".to_string()
            }
            AppError::NoCamera => "No camera found".to_string(),
            AppError::Camera(msg) => format!("Camera error: {}", msg),
            AppError::Decoder(msg) if msg.is_empty() => "Camera could not be started".to_string(),
            AppError::Decoder(msg) => format!("Camera could not be started: {}", msg),
            AppError::MissingItemId => "Invalid QR code: no item id found".to_string(),
            AppError::InvalidPayload(_) => "Invalid QR code format".to_string(),
            AppError::NotFound(id) => format!("Item not found (id/item no.: {})", id),
            AppError::Fetch(_) | AppError::Decode(_) | AppError::Http(_) => {
                "Failed to load item".to_string()
            }
            AppError::Update(_) => "Failed to update stock".to_string(),
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;
