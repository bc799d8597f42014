//! Photo Library Access
//!
//! Enumeration of assets and collections held by the host media index.

use async_trait::async_trait;

use crate::{
    error::Result,
    photos::{Asset, AssetCollection, CollectionSubtype, CollectionType, FetchOptions, FetchResult},
};

/// Read-only access to the host photo index.
///
/// All fetches return a [`FetchResult`], a finite sequence that can be
/// iterated once. Implementations must apply [`FetchOptions`] in the order
/// filter, sort, limit so that `fetch_limit` truncates the already-sorted
/// result.
///
/// # Platform Support
///
/// - **Desktop**: directory-backed index (`bridge-desktop`)
/// - **iOS**: Photos framework fetch requests
/// - **Android**: MediaStore queries
///
/// # Example
///
/// ```ignore
/// use bridge_traits::{FetchOptions, PhotoLibrary};
///
/// async fn newest(library: &dyn PhotoLibrary) -> Option<String> {
///     let options = FetchOptions::newest_images().with_fetch_limit(1);
///     let newest = library.fetch_assets(&options).await.ok()?.first()?;
///     Some(newest.local_identifier)
/// }
/// ```
#[async_trait]
pub trait PhotoLibrary: Send + Sync {
    /// Fetch every collection of the given type and subtype
    async fn fetch_collections(
        &self,
        collection_type: CollectionType,
        subtype: CollectionSubtype,
    ) -> Result<FetchResult<AssetCollection>>;

    /// Fetch collections by identifier; unknown ids are skipped
    async fn fetch_collections_with_ids(
        &self,
        ids: &[String],
    ) -> Result<FetchResult<AssetCollection>>;

    /// Fetch assets across the whole library
    async fn fetch_assets(&self, options: &FetchOptions) -> Result<FetchResult<Asset>>;

    /// Fetch assets contained in a collection
    async fn fetch_assets_in(
        &self,
        collection: &AssetCollection,
        options: &FetchOptions,
    ) -> Result<FetchResult<Asset>>;

    /// Fetch assets by identifier; unknown ids are skipped
    async fn fetch_assets_with_ids(&self, ids: &[String]) -> Result<FetchResult<Asset>>;
}
