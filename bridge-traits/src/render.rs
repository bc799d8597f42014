//! Image Rendering Abstraction
//!
//! Asynchronous, callback-driven image requests against the host render
//! pipeline. A request may produce several deliveries: zero or more fast
//! degraded previews followed by one final image or an error.

use image::DynamicImage;
use std::fmt;

use crate::{error::BridgeError, photos::Asset};

/// Target box in pixels
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl TargetSize {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

/// How the image is fitted into the target box
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentMode {
    /// Preserve aspect ratio, fit inside the box, never crop
    #[default]
    AspectFit,
    /// Preserve aspect ratio, fill the box, crop the overflow
    AspectFill,
}

/// Quality/latency trade-off for deliveries
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeliveryMode {
    /// Degraded preview first, final image afterwards
    #[default]
    Opportunistic,
    /// Only the final, full quality image
    HighQualityFormat,
    /// A single quickly produced image
    FastFormat,
}

/// Resampling effort when resizing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResizeMode {
    /// Deliver the source pixels unchanged
    None,
    #[default]
    Fast,
    Exact,
}

/// Options attached to an image request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImageRequestOptions {
    /// Allow the host to download assets that are not stored locally
    pub network_access_allowed: bool,
    pub delivery_mode: DeliveryMode,
    pub resize_mode: ResizeMode,
}

/// A complete image request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageRequest {
    pub target: TargetSize,
    pub content_mode: ContentMode,
    pub options: ImageRequestOptions,
}

/// One delivery from the render pipeline
pub struct ImageDelivery {
    pub image: Option<DynamicImage>,
    /// Low-quality preview; a final delivery follows
    pub degraded: bool,
    pub error: Option<BridgeError>,
}

impl ImageDelivery {
    pub fn final_image(image: DynamicImage) -> Self {
        Self {
            image: Some(image),
            degraded: false,
            error: None,
        }
    }

    pub fn degraded(image: DynamicImage) -> Self {
        Self {
            image: Some(image),
            degraded: true,
            error: None,
        }
    }

    pub fn failed(error: BridgeError) -> Self {
        Self {
            image: None,
            degraded: false,
            error: Some(error),
        }
    }
}

impl fmt::Debug for ImageDelivery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ImageDelivery")
            .field(
                "image",
                &self.image.as_ref().map(|img| (img.width(), img.height())),
            )
            .field("degraded", &self.degraded)
            .field("error", &self.error)
            .finish()
    }
}

/// Callback receiving deliveries; may be invoked from any thread.
pub type DeliveryHandler = Box<dyn FnMut(ImageDelivery) + Send + 'static>;

/// Identifier of an in-flight image request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RequestId(pub u64);

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Host image render pipeline.
///
/// `request_image` returns immediately; results arrive through `handler`,
/// possibly on a background thread. Implementations must eventually invoke
/// the handler with a non-degraded delivery or an error, or drop it.
///
/// # Platform Support
///
/// - **Desktop**: `image` crate decode/resize on a blocking thread
/// - **iOS**: `PHImageManager::requestImage`
/// - **Android**: `ContentResolver::loadThumbnail`
pub trait ImageRenderer: Send + Sync {
    fn request_image(
        &self,
        asset: &Asset,
        request: ImageRequest,
        handler: DeliveryHandler,
    ) -> RequestId;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delivery_constructors() {
        let img = DynamicImage::new_rgb8(4, 2);

        let preview = ImageDelivery::degraded(img.clone());
        assert!(preview.degraded);
        assert!(preview.error.is_none());

        let done = ImageDelivery::final_image(img);
        assert!(!done.degraded);
        assert_eq!(format!("{:?}", done.image.as_ref().map(|i| i.width())), "Some(4)");

        let failed = ImageDelivery::failed(BridgeError::AssetNotFound("x".into()));
        assert!(failed.image.is_none());
        assert!(failed.error.is_some());
    }

    #[test]
    fn test_default_options() {
        let options = ImageRequestOptions::default();
        assert!(!options.network_access_allowed);
        assert_eq!(options.delivery_mode, DeliveryMode::Opportunistic);
        assert_eq!(options.resize_mode, ResizeMode::Fast);
        assert_eq!(ContentMode::default(), ContentMode::AspectFit);
    }
}
