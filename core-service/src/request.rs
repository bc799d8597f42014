//! Typed requests parsed from method-call arguments
//!
//! Arguments arrive loosely typed: a plain integer for single-value
//! operations, a map for the others. Each request is validated here, once,
//! before any bridge is touched.

use crate::error::{Result, ServiceError};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// `albums(albumType)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AlbumsRequest {
    /// Raw top-level collection type
    pub album_type: i64,
}

impl AlbumsRequest {
    pub fn from_arguments(arguments: Option<&Value>) -> Result<Self> {
        let album_type = arguments
            .and_then(Value::as_i64)
            .ok_or_else(|| ServiceError::InvalidArgument("Missing arg albumType".to_string()))?;
        Ok(Self { album_type })
    }
}

/// `latest_images(maxImages)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LatestImagesRequest {
    pub max_images: usize,
}

impl LatestImagesRequest {
    pub fn new(max_images: usize) -> Self {
        Self { max_images }
    }

    pub fn from_arguments(arguments: Option<&Value>) -> Result<Self> {
        let max_images = arguments
            .and_then(Value::as_u64)
            .and_then(|n| usize::try_from(n).ok())
            .ok_or_else(|| ServiceError::InvalidArgument("Missing arg maxPhotos".to_string()))?;
        Ok(Self { max_images })
    }
}

/// `images_in_album({albumId, maxImages})`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImagesInAlbumRequest {
    pub album_id: String,
    pub max_images: usize,
}

impl ImagesInAlbumRequest {
    pub fn new(album_id: impl Into<String>, max_images: usize) -> Self {
        Self {
            album_id: album_id.into(),
            max_images,
        }
    }

    pub fn from_arguments(arguments: Option<&Value>) -> Result<Self> {
        from_map(arguments, "Missing args requires albumId, maxImages")
    }
}

/// `image_bytes({id, pixelWidth, pixelHeight})`
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageBytesRequest {
    pub id: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl ImageBytesRequest {
    pub fn new(id: impl Into<String>, pixel_width: u32, pixel_height: u32) -> Self {
        Self {
            id: id.into(),
            pixel_width,
            pixel_height,
        }
    }

    pub fn from_arguments(arguments: Option<&Value>) -> Result<Self> {
        let request: Self = from_map(
            arguments,
            "Missing args requires id, pixelWidth, pixelHeight",
        )?;
        request.validate()?;
        Ok(request)
    }

    /// Rejects an empty target box.
    pub fn validate(&self) -> Result<()> {
        if self.pixel_width == 0 || self.pixel_height == 0 {
            return Err(ServiceError::InvalidArgument(format!(
                "Target size must be positive, got {}x{}",
                self.pixel_width, self.pixel_height
            )));
        }
        Ok(())
    }
}

fn from_map<T: DeserializeOwned>(arguments: Option<&Value>, missing: &str) -> Result<T> {
    let value = match arguments {
        Some(value) if value.is_object() => value,
        _ => return Err(ServiceError::InvalidArgument(missing.to_string())),
    };
    T::deserialize(value).map_err(|e| ServiceError::InvalidArgument(format!("{}: {}", missing, e)))
}
