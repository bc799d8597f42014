//! Typed photo operations over the injected bridges

use crate::error::{Result, ServiceError};
use crate::render::{byte_fetch_request, encode_jpeg, render_final};
use crate::request::{AlbumsRequest, ImageBytesRequest, ImagesInAlbumRequest, LatestImagesRequest};
use crate::summary::{AlbumSummary, ImageSummary};
use bridge_traits::{
    AssetCollection, CollectionType, FetchOptions, FetchResult, ImageRenderer, PhotoAuthorization,
    PhotoLibrary, ALBUM_SUBTYPES,
};
use bytes::Bytes;
use core_runtime::config::DEFAULT_JPEG_QUALITY;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, info, instrument};

/// Image-rendering accessor bound by a successful [`PhotoService::initialize`].
///
/// Only an authorized initialize produces one, so holding a `Session` is
/// proof that byte fetches may proceed.
#[derive(Clone)]
pub struct Session {
    renderer: Arc<dyn ImageRenderer>,
}

impl Session {
    pub fn renderer(&self) -> &dyn ImageRenderer {
        self.renderer.as_ref()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session").finish_non_exhaustive()
    }
}

/// Photo operations against one host library.
///
/// Every method is independent and may run concurrently with the others.
#[derive(Clone)]
pub struct PhotoService {
    library: Arc<dyn PhotoLibrary>,
    authorization: Arc<dyn PhotoAuthorization>,
    renderer: Arc<dyn ImageRenderer>,
    jpeg_quality: u8,
}

impl PhotoService {
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        authorization: Arc<dyn PhotoAuthorization>,
        renderer: Arc<dyn ImageRenderer>,
    ) -> Self {
        Self {
            library,
            authorization,
            renderer,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
        }
    }

    pub fn with_jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Whether the host currently grants photo access. Never prompts.
    pub fn has_permission(&self) -> bool {
        self.authorization.authorization_status().is_authorized()
    }

    /// Resolve authorization, prompting when the user has not decided yet.
    ///
    /// Returns a [`Session`] when access is granted, `None` otherwise.
    #[instrument(skip(self))]
    pub async fn initialize(&self) -> Option<Session> {
        let status = self.authorization.request_authorization().await;
        info!(?status, "Photo library authorization resolved");

        status.is_authorized().then(|| Session {
            renderer: Arc::clone(&self.renderer),
        })
    }

    /// One summary per album of `request.album_type` holding at least one
    /// image, in subtype order.
    ///
    /// An unknown collection type yields an empty list.
    #[instrument(skip(self))]
    pub async fn albums(&self, request: AlbumsRequest) -> Result<Vec<AlbumSummary>> {
        let Some(collection_type) = CollectionType::from_raw(request.album_type) else {
            debug!(album_type = request.album_type, "Unknown album type");
            return Ok(Vec::new());
        };

        let mut summaries = Vec::new();
        for subtype in ALBUM_SUBTYPES {
            let collections = self
                .library
                .fetch_collections(collection_type, subtype)
                .await?;
            for collection in collections {
                if let Some(summary) = self.summarize_album(&collection).await? {
                    summaries.push(summary);
                }
            }
        }

        debug!(count = summaries.len(), "Listed albums");
        Ok(summaries)
    }

    async fn summarize_album(&self, collection: &AssetCollection) -> Result<Option<AlbumSummary>> {
        let images = self
            .library
            .fetch_assets_in(collection, &FetchOptions::newest_images())
            .await?;
        let image_count = FetchResult::count(&images);
        Ok(images
            .first()
            .map(|cover| AlbumSummary::new(collection, &cover, image_count)))
    }

    /// Newest images across the library, at most `request.max_images`.
    #[instrument(skip(self))]
    pub async fn latest_images(&self, request: LatestImagesRequest) -> Result<Vec<ImageSummary>> {
        let options = FetchOptions::newest_images().with_fetch_limit(request.max_images);
        let assets = self.library.fetch_assets(&options).await?;
        Ok(assets.map(|asset| ImageSummary::from(&asset)).collect())
    }

    /// Newest images of one album, at most `request.max_images`.
    ///
    /// An album id that does not resolve yields an empty list.
    #[instrument(skip(self))]
    pub async fn images_in_album(
        &self,
        request: ImagesInAlbumRequest,
    ) -> Result<Vec<ImageSummary>> {
        let album = self
            .library
            .fetch_collections_with_ids(std::slice::from_ref(&request.album_id))
            .await?
            .first();
        let Some(album) = album else {
            debug!(album = %request.album_id, "Album not found");
            return Ok(Vec::new());
        };

        let options = FetchOptions::newest_images().with_fetch_limit(request.max_images);
        let assets = self.library.fetch_assets_in(&album, &options).await?;
        Ok(assets.map(|asset| ImageSummary::from(&asset)).collect())
    }

    /// JPEG rendering of one asset, aspect-fit into the requested box.
    ///
    /// # Errors
    ///
    /// - [`ServiceError::InvalidArgument`] for an empty target box
    /// - [`ServiceError::ImageNotFound`] unless the id matches exactly one asset
    /// - [`ServiceError::ImageLoadFailed`] when rendering or encoding fails
    #[instrument(skip(self, session))]
    pub async fn image_bytes(&self, session: &Session, request: ImageBytesRequest) -> Result<Bytes> {
        request.validate()?;

        let assets = self
            .library
            .fetch_assets_with_ids(std::slice::from_ref(&request.id))
            .await?;
        if FetchResult::count(&assets) != 1 {
            return Err(ServiceError::ImageNotFound(request.id));
        }
        let Some(asset) = assets.first() else {
            return Err(ServiceError::ImageNotFound(request.id));
        };

        let render = byte_fetch_request(request.pixel_width, request.pixel_height);
        let image = render_final(session.renderer(), &asset, render).await?;
        let bytes = encode_jpeg(&request.id, image, self.jpeg_quality).await?;

        debug!(asset = %request.id, len = bytes.len(), "Encoded image bytes");
        Ok(bytes)
    }
}
