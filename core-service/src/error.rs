use bridge_traits::BridgeError;
use serde::Serialize;
use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("{0}")]
    InvalidArgument(String),

    #[error("Image not found: {0}")]
    ImageNotFound(String),

    #[error("{message}")]
    ImageLoadFailed {
        message: String,
        details: Option<String>,
    },

    #[error("Bridge error: {0}")]
    Bridge(#[from] BridgeError),

    #[error("Failed to encode response: {0}")]
    Encoding(#[from] serde_json::Error),

    #[error("Method not implemented: {0}")]
    Unimplemented(String),

    #[error("Bridge initialization failed: {0}")]
    InitializationFailed(String),

    #[error("Runtime error: {0}")]
    Runtime(#[from] core_runtime::Error),
}

impl ServiceError {
    pub(crate) fn load_failed(message: impl Into<String>) -> Self {
        Self::ImageLoadFailed {
            message: message.into(),
            details: None,
        }
    }

    /// Wire code reported to the caller.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidArgument(_) => ErrorCode::MissingOrInvalidArg,
            Self::ImageNotFound(_) => ErrorCode::ImgNotFound,
            Self::Unimplemented(_) => ErrorCode::Unimplemented,
            Self::ImageLoadFailed { .. }
            | Self::Bridge(_)
            | Self::Encoding(_)
            | Self::InitializationFailed(_)
            | Self::Runtime(_) => ErrorCode::ImgLoadFailed,
        }
    }
}

pub type Result<T> = std::result::Result<T, ServiceError>;

/// Stable error codes of the method channel.
///
/// The wire strings are the raw values the host plugin has always sent
/// (`imgLoadFailed`, `imgNotFound`, `missingOrInvalidArg`, `unimplemented`),
/// so existing callers keep matching on them unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum ErrorCode {
    ImgLoadFailed,
    ImgNotFound,
    MissingOrInvalidArg,
    Unimplemented,
}

impl ErrorCode {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::ImgLoadFailed => "imgLoadFailed",
            Self::ImgNotFound => "imgNotFound",
            Self::MissingOrInvalidArg => "missingOrInvalidArg",
            Self::Unimplemented => "unimplemented",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// `(code, message, details)` error reply of a method call.
#[derive(Error, Debug, Clone, PartialEq, Eq, Serialize)]
#[error("{code}: {message}")]
pub struct MethodError {
    pub code: ErrorCode,
    pub message: String,
    pub details: Option<String>,
}

impl From<ServiceError> for MethodError {
    fn from(err: ServiceError) -> Self {
        let code = err.code();
        match err {
            ServiceError::ImageLoadFailed { message, details } => Self {
                code,
                message,
                details,
            },
            other => Self {
                code,
                message: other.to_string(),
                details: None,
            },
        }
    }
}

/// Failure to deliver a call over the in-process method channel.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ChannelError {
    #[error("Method channel is closed")]
    Closed,

    #[error("Method channel dropped the call before replying")]
    NoReply,
}
