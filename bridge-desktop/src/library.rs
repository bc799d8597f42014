//! Directory-backed Photo Library

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    Asset, AssetCollection, CollectionSubtype, CollectionType, FetchOptions, FetchResult,
    PhotoLibrary,
};
use parking_lot::RwLock;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::info;

use crate::index::{self, LibraryIndex};
use crate::renderer::FsImageRenderer;

pub(crate) type SharedIndex = Arc<RwLock<Arc<LibraryIndex>>>;

/// Photo library served from a directory tree.
///
/// The tree is scanned once on [`open`](FsPhotoLibrary::open) and again on
/// every [`refresh`](FsPhotoLibrary::refresh). Each fetch works against the
/// snapshot current when it started, so identifiers handed out by one fetch
/// stay resolvable until the next refresh.
pub struct FsPhotoLibrary {
    root: PathBuf,
    index: SharedIndex,
}

impl FsPhotoLibrary {
    /// Scan `root` and build a library over it.
    pub async fn open(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        let index = scan_blocking(root.clone()).await?;
        info!(
            root = %root.display(),
            assets = index.asset_count(),
            "Opened photo library"
        );

        Ok(Self {
            root,
            index: Arc::new(RwLock::new(Arc::new(index))),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the tree and swap in the new snapshot.
    pub async fn refresh(&self) -> Result<()> {
        let index = scan_blocking(self.root.clone()).await?;
        *self.index.write() = Arc::new(index);
        Ok(())
    }

    /// Renderer resolving identifiers against this library.
    pub fn renderer(&self) -> FsImageRenderer {
        FsImageRenderer::new(Arc::clone(&self.index))
    }

    fn snapshot(&self) -> Arc<LibraryIndex> {
        Arc::clone(&*self.index.read())
    }
}

async fn scan_blocking(root: PathBuf) -> Result<LibraryIndex> {
    tokio::task::spawn_blocking(move || index::scan(&root))
        .await
        .map_err(|e| BridgeError::OperationFailed(format!("Library scan task failed: {}", e)))?
}

/// Lazily clone assets out of the snapshot as the caller iterates.
fn lazy_assets(index: Arc<LibraryIndex>, positions: Vec<usize>) -> FetchResult<Asset> {
    let count = positions.len();
    FetchResult::from_iter_with_count(
        count,
        positions
            .into_iter()
            .filter_map(move |pos| index.asset(pos).cloned()),
    )
}

#[async_trait]
impl PhotoLibrary for FsPhotoLibrary {
    async fn fetch_collections(
        &self,
        collection_type: CollectionType,
        subtype: CollectionSubtype,
    ) -> Result<FetchResult<AssetCollection>> {
        let index = self.snapshot();
        Ok(FetchResult::from_vec(
            index.collections_of(collection_type, subtype),
        ))
    }

    async fn fetch_collections_with_ids(
        &self,
        ids: &[String],
    ) -> Result<FetchResult<AssetCollection>> {
        let index = self.snapshot();
        let found = ids
            .iter()
            .filter_map(|id| index.collection(id))
            .map(|entry| entry.collection.clone())
            .collect();
        Ok(FetchResult::from_vec(found))
    }

    async fn fetch_assets(&self, options: &FetchOptions) -> Result<FetchResult<Asset>> {
        let index = self.snapshot();
        let positions = index.select(&index.all_positions(), options);
        Ok(lazy_assets(index, positions))
    }

    async fn fetch_assets_in(
        &self,
        collection: &AssetCollection,
        options: &FetchOptions,
    ) -> Result<FetchResult<Asset>> {
        let index = self.snapshot();
        let positions = match index.collection(&collection.local_identifier) {
            Some(entry) => index.select(&entry.members, options),
            None => Vec::new(),
        };
        Ok(lazy_assets(index, positions))
    }

    async fn fetch_assets_with_ids(&self, ids: &[String]) -> Result<FetchResult<Asset>> {
        let index = self.snapshot();
        let positions = ids
            .iter()
            .filter_map(|id| index.asset_position(id))
            .collect();
        Ok(lazy_assets(index, positions))
    }
}
