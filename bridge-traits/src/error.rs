use thiserror::Error;

#[derive(Error, Debug)]
pub enum BridgeError {
    #[error("Bridge capability not available: {0}")]
    NotAvailable(String),

    #[error("Bridge operation failed: {0}")]
    OperationFailed(String),

    #[error("Asset not found: {0}")]
    AssetNotFound(String),

    #[error("Image decode failed: {0}")]
    Decode(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<image::ImageError> for BridgeError {
    fn from(err: image::ImageError) -> Self {
        match err {
            image::ImageError::IoError(io) => BridgeError::Io(io),
            other => BridgeError::Decode(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, BridgeError>;
