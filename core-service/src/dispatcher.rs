//! Named-method dispatch for the photo channel
//!
//! Turns a loosely typed [`MethodCall`] into a typed request, runs the
//! matching [`PhotoService`] operation and converts the outcome into a
//! [`MethodReply`]. Argument validation happens before any bridge call.

use crate::error::{MethodError, Result, ServiceError};
use crate::method::Method;
use crate::request::{AlbumsRequest, ImageBytesRequest, ImagesInAlbumRequest, LatestImagesRequest};
use crate::service::{PhotoService, Session};
use crate::summary::ImageSummary;
use bytes::Bytes;
use serde_json::Value;
use std::sync::OnceLock;
use tracing::{info_span, warn, Instrument};

/// One incoming call
#[derive(Debug, Clone, PartialEq)]
pub struct MethodCall {
    pub method: String,
    pub arguments: Option<Value>,
}

impl MethodCall {
    pub fn new(method: impl Into<String>, arguments: Option<Value>) -> Self {
        Self {
            method: method.into(),
            arguments,
        }
    }
}

/// Successful reply payloads
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyValue {
    Bool(bool),
    /// JSON-encoded summaries, in order
    Records(Vec<String>),
    Bytes(Bytes),
}

impl ReplyValue {
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(value) => Some(*value),
            _ => None,
        }
    }

    pub fn into_records(self) -> Option<Vec<String>> {
        match self {
            Self::Records(records) => Some(records),
            _ => None,
        }
    }

    pub fn into_bytes(self) -> Option<Bytes> {
        match self {
            Self::Bytes(bytes) => Some(bytes),
            _ => None,
        }
    }
}

pub type MethodReply = std::result::Result<ReplyValue, MethodError>;

/// Routes calls to a [`PhotoService`], holding the session bound by the
/// first authorized `initialize`.
pub struct RequestDispatcher {
    service: PhotoService,
    session: OnceLock<Session>,
}

impl RequestDispatcher {
    pub fn new(service: PhotoService) -> Self {
        Self {
            service,
            session: OnceLock::new(),
        }
    }

    pub fn service(&self) -> &PhotoService {
        &self.service
    }

    pub fn is_initialized(&self) -> bool {
        self.session.get().is_some()
    }

    /// Handle one call. Exactly one reply is produced per call.
    pub async fn handle(&self, call: MethodCall) -> MethodReply {
        let method: Method = match call.method.parse() {
            Ok(method) => method,
            Err(never) => match never {},
        };
        let span = info_span!("method", name = %method);

        async {
            let result = self.dispatch(&method, call.arguments.as_ref()).await;
            if let Err(err) = &result {
                warn!(code = %err.code(), error = %err, "Method call failed");
            }
            result.map_err(MethodError::from)
        }
        .instrument(span)
        .await
    }

    async fn dispatch(&self, method: &Method, arguments: Option<&Value>) -> Result<ReplyValue> {
        match method {
            Method::HasPermission => Ok(ReplyValue::Bool(self.service.has_permission())),
            Method::Initialize => {
                let authorized = match self.service.initialize().await {
                    Some(session) => {
                        // Later initializes keep the first session.
                        let _ = self.session.set(session);
                        true
                    }
                    None => false,
                };
                Ok(ReplyValue::Bool(authorized))
            }
            Method::Albums => {
                let request = AlbumsRequest::from_arguments(arguments)?;
                let albums = self.service.albums(request).await?;
                let records = albums
                    .iter()
                    .map(|album| album.encode())
                    .collect::<Result<Vec<_>>>()?;
                Ok(ReplyValue::Records(records))
            }
            Method::LatestImages => {
                let request = LatestImagesRequest::from_arguments(arguments)?;
                let images = self.service.latest_images(request).await?;
                encode_images(&images)
            }
            Method::ImagesInAlbum => {
                let request = ImagesInAlbumRequest::from_arguments(arguments)?;
                let images = self.service.images_in_album(request).await?;
                encode_images(&images)
            }
            Method::ImageBytes => {
                let request = ImageBytesRequest::from_arguments(arguments)?;
                let session = self.session.get().ok_or_else(|| {
                    ServiceError::load_failed("image manager not initialized")
                })?;
                let bytes = self.service.image_bytes(session, request).await?;
                Ok(ReplyValue::Bytes(bytes))
            }
            Method::Unknown(name) => Err(ServiceError::Unimplemented(name.clone())),
        }
    }
}

fn encode_images(images: &[ImageSummary]) -> Result<ReplyValue> {
    let records = images
        .iter()
        .map(|image| image.encode())
        .collect::<Result<Vec<_>>>()?;
    Ok(ReplyValue::Records(records))
}
