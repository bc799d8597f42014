//! Photo Library Model
//!
//! Read-only projections of the host's media index: assets, collections,
//! fetch options and the single-pass fetch result they produce.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Photo library authorization state as reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuthorizationStatus {
    /// The user has not been asked yet
    NotDetermined,
    /// The user (or a policy) refused access
    Denied,
    /// Access granted
    Authorized,
}

impl AuthorizationStatus {
    pub fn is_authorized(self) -> bool {
        matches!(self, AuthorizationStatus::Authorized)
    }
}

/// Kind of media an asset holds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MediaType {
    Unknown,
    Image,
    Video,
    Audio,
}

/// Top-level collection type.
///
/// Raw values follow the host photo framework numbering so callers can pass
/// them through the wire unchanged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionType {
    Album,
    SmartAlbum,
    Moment,
}

impl CollectionType {
    /// Map a raw wire value to a collection type.
    pub fn from_raw(raw: i64) -> Option<Self> {
        match raw {
            1 => Some(CollectionType::Album),
            2 => Some(CollectionType::SmartAlbum),
            3 => Some(CollectionType::Moment),
            _ => None,
        }
    }

    pub fn raw_value(self) -> i64 {
        match self {
            CollectionType::Album => 1,
            CollectionType::SmartAlbum => 2,
            CollectionType::Moment => 3,
        }
    }
}

/// Collection subtype within a [`CollectionType`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CollectionSubtype {
    AlbumRegular,
    AlbumSyncedEvent,
    AlbumSyncedFaces,
    AlbumSyncedAlbum,
    AlbumImported,
    AlbumCloudShared,
    SmartAlbumGeneric,
}

impl CollectionSubtype {
    pub fn raw_value(self) -> i64 {
        match self {
            CollectionSubtype::AlbumRegular => 2,
            CollectionSubtype::AlbumSyncedEvent => 3,
            CollectionSubtype::AlbumSyncedFaces => 4,
            CollectionSubtype::AlbumSyncedAlbum => 5,
            CollectionSubtype::AlbumImported => 6,
            CollectionSubtype::AlbumCloudShared => 101,
            CollectionSubtype::SmartAlbumGeneric => 200,
        }
    }
}

/// Album subtypes enumerated when listing albums, in listing order.
pub const ALBUM_SUBTYPES: [CollectionSubtype; 6] = [
    CollectionSubtype::AlbumRegular,
    CollectionSubtype::AlbumSyncedEvent,
    CollectionSubtype::AlbumSyncedFaces,
    CollectionSubtype::AlbumSyncedAlbum,
    CollectionSubtype::AlbumImported,
    CollectionSubtype::AlbumCloudShared,
];

/// A single media item in the host index
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Asset {
    /// Opaque identifier, stable for the lifetime of the library state
    pub local_identifier: String,
    pub media_type: MediaType,
    pub creation_date: DateTime<Utc>,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl Asset {
    pub fn is_image(&self) -> bool {
        self.media_type == MediaType::Image
    }
}

/// A named grouping of assets
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetCollection {
    pub local_identifier: String,
    /// Display title; untitled collections carry `None`
    pub localized_title: Option<String>,
    pub collection_type: CollectionType,
    pub subtype: CollectionSubtype,
}

/// Ordering applied to asset fetches
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortOrder {
    #[default]
    Unspecified,
    CreationDateDescending,
    CreationDateAscending,
}

/// Options applied to an asset fetch
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchOptions {
    /// Restrict results to one media type
    pub media_type: Option<MediaType>,
    pub sort: SortOrder,
    /// Maximum number of items returned, applied after filtering and sorting
    pub fetch_limit: Option<usize>,
}

impl FetchOptions {
    /// Images only, newest first.
    pub fn newest_images() -> Self {
        Self {
            media_type: Some(MediaType::Image),
            sort: SortOrder::CreationDateDescending,
            fetch_limit: None,
        }
    }

    pub fn with_fetch_limit(mut self, limit: usize) -> Self {
        self.fetch_limit = Some(limit);
        self
    }

    /// Whether an asset passes the media type filter
    pub fn matches(&self, asset: &Asset) -> bool {
        self.media_type.map_or(true, |kind| asset.media_type == kind)
    }
}

/// Finite, single-pass sequence returned by library fetches.
///
/// `count` is the number of items the fetch matched, which is also the
/// number of items the iterator yields.
pub struct FetchResult<T> {
    count: usize,
    items: Box<dyn Iterator<Item = T> + Send>,
}

impl<T: Send + 'static> FetchResult<T> {
    /// Build a result over an owned list of items.
    pub fn from_vec(items: Vec<T>) -> Self {
        Self {
            count: items.len(),
            items: Box::new(items.into_iter()),
        }
    }

    /// Build a result from a lazy iterator and its known length.
    pub fn from_iter_with_count<I>(count: usize, items: I) -> Self
    where
        I: Iterator<Item = T> + Send + 'static,
    {
        Self {
            count,
            items: Box::new(items.take(count)),
        }
    }

    pub fn empty() -> Self {
        Self::from_vec(Vec::new())
    }
}

impl<T> FetchResult<T> {
    pub fn count(&self) -> usize {
        self.count
    }

    pub fn is_empty(&self) -> bool {
        self.count == 0
    }

    /// Consume the sequence and return its first item.
    pub fn first(mut self) -> Option<T> {
        self.items.next()
    }
}

impl<T> Iterator for FetchResult<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.items.next()
    }
}

impl<T> fmt::Debug for FetchResult<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FetchResult")
            .field("count", &self.count)
            .finish_non_exhaustive()
    }
}
