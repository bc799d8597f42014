//! Image Renderer using the `image` crate

use bridge_traits::{
    error::BridgeError, Asset, ContentMode, DeliveryHandler, DeliveryMode, ImageDelivery,
    ImageRenderer, ImageRequest, RequestId, ResizeMode,
};
use image::{imageops::FilterType, DynamicImage};
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use tracing::{debug, trace, warn};

use crate::library::SharedIndex;

/// Divisor applied to the target box for opportunistic previews
const PREVIEW_DIVISOR: u32 = 4;

/// Renders library files on a blocking worker.
///
/// Identifiers are resolved against the owning library's snapshot at request
/// time. Deliveries are produced on the blocking thread; the handler is
/// responsible for moving them back to its own task.
pub struct FsImageRenderer {
    index: SharedIndex,
    next_request: AtomicU64,
}

impl FsImageRenderer {
    pub(crate) fn new(index: SharedIndex) -> Self {
        Self {
            index,
            next_request: AtomicU64::new(1),
        }
    }
}

impl ImageRenderer for FsImageRenderer {
    fn request_image(
        &self,
        asset: &Asset,
        request: ImageRequest,
        handler: DeliveryHandler,
    ) -> RequestId {
        let id = RequestId(self.next_request.fetch_add(1, Ordering::Relaxed));
        let path = self.index.read().path_of(&asset.local_identifier);
        let asset_id = asset.local_identifier.clone();

        debug!(request_id = %id, asset = %asset_id, ?request, "Image requested");
        if request.options.network_access_allowed {
            trace!(request_id = %id, "Network access allowed but all desktop assets are local");
        }

        let job = move || render(id, asset_id, path, request, handler);
        match tokio::runtime::Handle::try_current() {
            Ok(handle) => {
                handle.spawn_blocking(job);
            }
            Err(_) => {
                std::thread::spawn(job);
            }
        }
        id
    }
}

fn render(
    id: RequestId,
    asset_id: String,
    path: Option<PathBuf>,
    request: ImageRequest,
    mut handler: DeliveryHandler,
) {
    let Some(path) = path else {
        handler(ImageDelivery::failed(BridgeError::AssetNotFound(asset_id)));
        return;
    };

    let source = match image::open(&path) {
        Ok(img) => img,
        Err(err) => {
            warn!(request_id = %id, error = %err, "Failed to decode asset");
            handler(ImageDelivery::failed(err.into()));
            return;
        }
    };

    match request.options.delivery_mode {
        DeliveryMode::Opportunistic => {
            handler(ImageDelivery::degraded(preview(&source, &request)));
            handler(ImageDelivery::final_image(fit(&source, &request)));
        }
        DeliveryMode::HighQualityFormat => {
            handler(ImageDelivery::final_image(fit(&source, &request)));
        }
        DeliveryMode::FastFormat => {
            handler(ImageDelivery::final_image(resize_with(
                &source,
                &request,
                FilterType::Nearest,
            )));
        }
    }
    trace!(request_id = %id, "Image request completed");
}

fn filter_for(mode: ResizeMode) -> FilterType {
    match mode {
        ResizeMode::Exact => FilterType::Lanczos3,
        ResizeMode::Fast | ResizeMode::None => FilterType::Triangle,
    }
}

/// Resize `source` into the requested box per the request's content mode.
pub(crate) fn fit(source: &DynamicImage, request: &ImageRequest) -> DynamicImage {
    if request.options.resize_mode == ResizeMode::None {
        return source.clone();
    }
    resize_with(source, request, filter_for(request.options.resize_mode))
}

fn resize_with(source: &DynamicImage, request: &ImageRequest, filter: FilterType) -> DynamicImage {
    let width = request.target.width.max(1);
    let height = request.target.height.max(1);

    match request.content_mode {
        ContentMode::AspectFit => {
            // Aspect-fit never upscales.
            if source.width() <= width && source.height() <= height {
                source.clone()
            } else {
                source.resize(width, height, filter)
            }
        }
        ContentMode::AspectFill => source.resize_to_fill(width, height, filter),
    }
}

fn preview(source: &DynamicImage, request: &ImageRequest) -> DynamicImage {
    let width = (request.target.width / PREVIEW_DIVISOR).max(1);
    let height = (request.target.height / PREVIEW_DIVISOR).max(1);
    source.resize(width, height, FilterType::Nearest)
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{ImageRequestOptions, TargetSize};

    fn request(width: u32, height: u32, content_mode: ContentMode) -> ImageRequest {
        ImageRequest {
            target: TargetSize::new(width, height),
            content_mode,
            options: ImageRequestOptions {
                network_access_allowed: true,
                delivery_mode: DeliveryMode::HighQualityFormat,
                resize_mode: ResizeMode::Fast,
            },
        }
    }

    #[test]
    fn test_aspect_fit_preserves_ratio() {
        let source = DynamicImage::new_rgb8(800, 400);
        let out = fit(&source, &request(200, 200, ContentMode::AspectFit));
        assert_eq!((out.width(), out.height()), (200, 100));
    }

    #[test]
    fn test_aspect_fit_does_not_upscale() {
        let source = DynamicImage::new_rgb8(50, 30);
        let out = fit(&source, &request(200, 200, ContentMode::AspectFit));
        assert_eq!((out.width(), out.height()), (50, 30));
    }

    #[test]
    fn test_aspect_fill_crops_to_box() {
        let source = DynamicImage::new_rgb8(800, 400);
        let out = fit(&source, &request(100, 100, ContentMode::AspectFill));
        assert_eq!((out.width(), out.height()), (100, 100));
    }

    #[test]
    fn test_resize_none_keeps_source() {
        let source = DynamicImage::new_rgb8(640, 480);
        let mut req = request(10, 10, ContentMode::AspectFit);
        req.options.resize_mode = ResizeMode::None;
        let out = fit(&source, &req);
        assert_eq!((out.width(), out.height()), (640, 480));
    }

    #[test]
    fn test_preview_is_smaller_than_target() {
        let source = DynamicImage::new_rgb8(1000, 1000);
        let out = preview(&source, &request(200, 200, ContentMode::AspectFit));
        assert_eq!((out.width(), out.height()), (50, 50));
    }
}
