//! In-memory bridges shared by the integration suites

#![allow(dead_code)]

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    Asset, AssetCollection, AuthorizationStatus, CollectionSubtype, CollectionType,
    DeliveryHandler, FetchOptions, FetchResult, ImageDelivery, ImageRenderer, ImageRequest,
    MediaType, PhotoAuthorization, PhotoLibrary, RequestId, SortOrder,
};
use chrono::{TimeZone, Utc};
use image::{imageops::FilterType, DynamicImage};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

pub fn image_asset(id: &str, minutes: i64, width: u32, height: u32) -> Asset {
    Asset {
        local_identifier: id.to_string(),
        media_type: MediaType::Image,
        creation_date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap()
            + chrono::Duration::minutes(minutes),
        pixel_width: width,
        pixel_height: height,
    }
}

pub fn video(id: &str, minutes: i64) -> Asset {
    Asset {
        media_type: MediaType::Video,
        ..image_asset(id, minutes, 1920, 1080)
    }
}

pub fn album(id: &str, title: Option<&str>, subtype: CollectionSubtype) -> AssetCollection {
    AssetCollection {
        local_identifier: id.to_string(),
        localized_title: title.map(str::to_string),
        collection_type: CollectionType::Album,
        subtype,
    }
}

/// Library held entirely in memory.
#[derive(Default)]
pub struct MemoryLibrary {
    assets: Vec<Asset>,
    collections: Vec<(AssetCollection, Vec<String>)>,
}

impl MemoryLibrary {
    pub fn with_asset(mut self, asset: Asset) -> Self {
        self.assets.push(asset);
        self
    }

    pub fn with_album(mut self, collection: AssetCollection, members: &[&str]) -> Self {
        self.collections.push((
            collection,
            members.iter().map(|id| id.to_string()).collect(),
        ));
        self
    }

    pub fn asset(&self, id: &str) -> Option<Asset> {
        self.assets
            .iter()
            .find(|asset| asset.local_identifier == id)
            .cloned()
    }

    fn select(&self, candidates: Vec<Asset>, options: &FetchOptions) -> FetchResult<Asset> {
        let mut selected: Vec<Asset> = candidates
            .into_iter()
            .filter(|asset| options.matches(asset))
            .collect();
        match options.sort {
            SortOrder::CreationDateDescending => {
                selected.sort_by(|a, b| b.creation_date.cmp(&a.creation_date))
            }
            SortOrder::CreationDateAscending => {
                selected.sort_by(|a, b| a.creation_date.cmp(&b.creation_date))
            }
            SortOrder::Unspecified => {}
        }
        if let Some(limit) = options.fetch_limit {
            selected.truncate(limit);
        }
        FetchResult::from_vec(selected)
    }
}

#[async_trait]
impl PhotoLibrary for MemoryLibrary {
    async fn fetch_collections(
        &self,
        collection_type: CollectionType,
        subtype: CollectionSubtype,
    ) -> Result<FetchResult<AssetCollection>> {
        Ok(FetchResult::from_vec(
            self.collections
                .iter()
                .map(|(collection, _)| collection)
                .filter(|c| c.collection_type == collection_type && c.subtype == subtype)
                .cloned()
                .collect(),
        ))
    }

    async fn fetch_collections_with_ids(
        &self,
        ids: &[String],
    ) -> Result<FetchResult<AssetCollection>> {
        Ok(FetchResult::from_vec(
            self.collections
                .iter()
                .map(|(collection, _)| collection)
                .filter(|c| ids.contains(&c.local_identifier))
                .cloned()
                .collect(),
        ))
    }

    async fn fetch_assets(&self, options: &FetchOptions) -> Result<FetchResult<Asset>> {
        Ok(self.select(self.assets.clone(), options))
    }

    async fn fetch_assets_in(
        &self,
        collection: &AssetCollection,
        options: &FetchOptions,
    ) -> Result<FetchResult<Asset>> {
        let members = self
            .collections
            .iter()
            .find(|(c, _)| c.local_identifier == collection.local_identifier)
            .map(|(_, members)| members.clone())
            .unwrap_or_default();
        let candidates = self
            .assets
            .iter()
            .filter(|asset| members.contains(&asset.local_identifier))
            .cloned()
            .collect();
        Ok(self.select(candidates, options))
    }

    async fn fetch_assets_with_ids(&self, ids: &[String]) -> Result<FetchResult<Asset>> {
        Ok(FetchResult::from_vec(
            self.assets
                .iter()
                .filter(|asset| ids.contains(&asset.local_identifier))
                .cloned()
                .collect(),
        ))
    }
}

/// Renders a blank image of the asset's size, aspect-fit into the target,
/// on a separate thread. Sends a degraded preview first.
#[derive(Default)]
pub struct MemoryRenderer {
    next: AtomicU64,
    requests: Mutex<Vec<(String, ImageRequest)>>,
    fail_with: Mutex<Option<String>>,
}

impl MemoryRenderer {
    pub fn failing(message: &str) -> Self {
        let renderer = Self::default();
        *renderer.fail_with.lock().unwrap() = Some(message.to_string());
        renderer
    }

    pub fn requests(&self) -> Vec<(String, ImageRequest)> {
        self.requests.lock().unwrap().clone()
    }
}

impl ImageRenderer for MemoryRenderer {
    fn request_image(
        &self,
        asset: &Asset,
        request: ImageRequest,
        mut handler: DeliveryHandler,
    ) -> RequestId {
        self.requests
            .lock()
            .unwrap()
            .push((asset.local_identifier.clone(), request));
        let failure = self.fail_with.lock().unwrap().clone();
        let (width, height) = (asset.pixel_width, asset.pixel_height);

        std::thread::spawn(move || {
            let source = DynamicImage::new_rgb8(width, height);
            handler(ImageDelivery::degraded(source.thumbnail(8, 8)));
            if let Some(message) = failure {
                handler(ImageDelivery::failed(BridgeError::OperationFailed(message)));
                return;
            }
            let target = request.target;
            let fitted = if width <= target.width && height <= target.height {
                source
            } else {
                source.resize(target.width, target.height, FilterType::Triangle)
            };
            handler(ImageDelivery::final_image(fitted));
        });

        RequestId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

/// Authorization with a scripted prompt answer.
pub struct ScriptedAuthorization {
    status: Mutex<AuthorizationStatus>,
    answer: AuthorizationStatus,
    pub prompts: AtomicUsize,
}

impl ScriptedAuthorization {
    pub fn new(status: AuthorizationStatus, answer: AuthorizationStatus) -> Self {
        Self {
            status: Mutex::new(status),
            answer,
            prompts: AtomicUsize::new(0),
        }
    }

    pub fn undetermined(answer: AuthorizationStatus) -> Self {
        Self::new(AuthorizationStatus::NotDetermined, answer)
    }

    pub fn prompt_count(&self) -> usize {
        self.prompts.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PhotoAuthorization for ScriptedAuthorization {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.status.lock().unwrap()
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        let current = self.authorization_status();
        if current != AuthorizationStatus::NotDetermined {
            return current;
        }
        self.prompts.fetch_add(1, Ordering::SeqCst);
        *self.status.lock().unwrap() = self.answer;
        self.answer
    }
}

/// "Trips" with three images, an imported album with one image, an empty
/// album, loose images and a video.
pub fn trips_library() -> MemoryLibrary {
    MemoryLibrary::default()
        .with_asset(image_asset("beach", 10, 400, 300))
        .with_asset(image_asset("mountain", 30, 300, 400))
        .with_asset(image_asset("city", 20, 640, 480))
        .with_asset(image_asset("scan", 5, 50, 50))
        .with_asset(image_asset("loose", 40, 20, 10))
        .with_asset(image_asset("older", -100, 20, 10))
        .with_asset(video("clip", 50))
        .with_album(
            album("trips", Some("Trips"), CollectionSubtype::AlbumRegular),
            &["beach", "mountain", "city", "clip"],
        )
        .with_album(
            album("imports", None, CollectionSubtype::AlbumImported),
            &["scan"],
        )
        .with_album(
            album("empty", Some("Empty"), CollectionSubtype::AlbumRegular),
            &["clip"],
        )
}

pub struct Harness {
    pub library: Arc<MemoryLibrary>,
    pub authorization: Arc<ScriptedAuthorization>,
    pub renderer: Arc<MemoryRenderer>,
}

impl Harness {
    pub fn new(library: MemoryLibrary, authorization: ScriptedAuthorization) -> Self {
        Self::with_renderer(library, authorization, MemoryRenderer::default())
    }

    pub fn with_renderer(
        library: MemoryLibrary,
        authorization: ScriptedAuthorization,
        renderer: MemoryRenderer,
    ) -> Self {
        Self {
            library: Arc::new(library),
            authorization: Arc::new(authorization),
            renderer: Arc::new(renderer),
        }
    }

    pub fn service(&self) -> core_service::PhotoService {
        core_service::PhotoService::new(
            self.library.clone(),
            self.authorization.clone(),
            self.renderer.clone(),
        )
    }
}
