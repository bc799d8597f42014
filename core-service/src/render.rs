//! Single-shot adapter over the callback-driven renderer, and JPEG encoding

use crate::error::{Result, ServiceError};
use bridge_traits::{
    Asset, BridgeError, ContentMode, DeliveryHandler, DeliveryMode, ImageDelivery, ImageRenderer,
    ImageRequest, ImageRequestOptions, ResizeMode, TargetSize,
};
use bytes::Bytes;
use image::{codecs::jpeg::JpegEncoder, DynamicImage};
use tokio::sync::oneshot;
use tracing::trace;

type Outcome = std::result::Result<Option<DynamicImage>, BridgeError>;

/// Request used for `image_bytes`: aspect-fit, fast resize, high quality,
/// network allowed.
pub fn byte_fetch_request(width: u32, height: u32) -> ImageRequest {
    ImageRequest {
        target: TargetSize::new(width, height),
        content_mode: ContentMode::AspectFit,
        options: ImageRequestOptions {
            network_access_allowed: true,
            delivery_mode: DeliveryMode::HighQualityFormat,
            resize_mode: ResizeMode::Fast,
        },
    }
}

/// Issue `request` and wait for its first non-degraded delivery.
///
/// Degraded previews are dropped. An error ends the request even when the
/// delivery carrying it is flagged degraded. Later deliveries are ignored.
pub async fn render_final(
    renderer: &dyn ImageRenderer,
    asset: &Asset,
    request: ImageRequest,
) -> Result<DynamicImage> {
    let (tx, rx) = oneshot::channel::<Outcome>();
    let mut slot = Some(tx);

    let handler: DeliveryHandler = Box::new(move |delivery: ImageDelivery| {
        let ImageDelivery {
            image,
            degraded,
            error,
        } = delivery;

        let outcome = match error {
            Some(err) => Err(err),
            None if degraded => {
                trace!("Skipping degraded delivery");
                return;
            }
            None => Ok(image),
        };
        if let Some(tx) = slot.take() {
            let _ = tx.send(outcome);
        }
    });

    let id = &asset.local_identifier;
    let size = format!("{}x{}", request.target.width, request.target.height);
    let request_id = renderer.request_image(asset, request, handler);
    trace!(request_id = %request_id, asset = %id, "Waiting for final delivery");

    match rx.await {
        Ok(Ok(Some(image))) => Ok(image),
        Ok(Ok(None)) => Err(ServiceError::load_failed(format!(
            "Could not load image: {}",
            id
        ))),
        Ok(Err(err)) => Err(ServiceError::ImageLoadFailed {
            message: format!("request image failed: {} {} - {}", id, err, size),
            details: None,
        }),
        Err(_) => Err(ServiceError::ImageLoadFailed {
            message: format!("Could not load image: {}", id),
            details: Some("renderer dropped the request".to_string()),
        }),
    }
}

/// Encode `image` as a baseline JPEG on a blocking worker.
pub async fn encode_jpeg(id: &str, image: DynamicImage, quality: u8) -> Result<Bytes> {
    let id = id.to_string();
    tokio::task::spawn_blocking(move || {
        let rgb = image.to_rgb8();
        let mut buffer = Vec::new();
        JpegEncoder::new_with_quality(&mut buffer, quality)
            .encode_image(&rgb)
            .map_err(|e| ServiceError::ImageLoadFailed {
                message: format!("Could not convert image: {}", id),
                details: Some(e.to_string()),
            })?;
        Ok(Bytes::from(buffer))
    })
    .await
    .map_err(|e| ServiceError::ImageLoadFailed {
        message: "JPEG encoder task failed".to_string(),
        details: Some(e.to_string()),
    })?
}
