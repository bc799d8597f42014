//! Directory scan producing an immutable library snapshot.
//!
//! Layout conventions:
//! - every supported file below the root is an asset
//! - each directory directly below the root is a regular album
//! - directories below the group folders (`Events`, `Faces`, `Synced`,
//!   `Imports`, `Shared`) are albums of the matching subtype
//! - album membership is recursive

use bridge_traits::{
    error::{BridgeError, Result},
    Asset, AssetCollection, CollectionSubtype, CollectionType, FetchOptions, MediaType, SortOrder,
};
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use std::collections::HashMap;
use std::path::{Component, Path, PathBuf};
use std::time::UNIX_EPOCH;
use tracing::{debug, warn};
use walkdir::{DirEntry, WalkDir};

const IMAGE_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "gif", "bmp", "tif", "tiff", "webp"];
const VIDEO_EXTENSIONS: &[&str] = &["mp4", "mov", "m4v"];

/// Group folders and the album subtype of the directories they contain.
const GROUP_FOLDERS: &[(&str, CollectionSubtype)] = &[
    ("Events", CollectionSubtype::AlbumSyncedEvent),
    ("Faces", CollectionSubtype::AlbumSyncedFaces),
    ("Synced", CollectionSubtype::AlbumSyncedAlbum),
    ("Imports", CollectionSubtype::AlbumImported),
    ("Shared", CollectionSubtype::AlbumCloudShared),
];

const ID_LENGTH: usize = 32;

pub(crate) struct IndexedAsset {
    pub asset: Asset,
    pub path: PathBuf,
}

pub(crate) struct IndexedCollection {
    pub collection: AssetCollection,
    /// Positions in `LibraryIndex::assets`, newest first
    pub members: Vec<usize>,
}

/// Immutable view of the library at scan time
#[derive(Default)]
pub(crate) struct LibraryIndex {
    /// Sorted by creation date descending, ties broken by identifier
    assets: Vec<IndexedAsset>,
    collections: Vec<IndexedCollection>,
    asset_lookup: HashMap<String, usize>,
    collection_lookup: HashMap<String, usize>,
}

impl LibraryIndex {
    pub fn asset_count(&self) -> usize {
        self.assets.len()
    }

    pub fn asset(&self, position: usize) -> Option<&Asset> {
        self.assets.get(position).map(|entry| &entry.asset)
    }

    pub fn asset_position(&self, id: &str) -> Option<usize> {
        self.asset_lookup.get(id).copied()
    }

    pub fn path_of(&self, id: &str) -> Option<PathBuf> {
        self.asset_position(id)
            .and_then(|pos| self.assets.get(pos))
            .map(|entry| entry.path.clone())
    }

    pub fn collections_of(
        &self,
        collection_type: CollectionType,
        subtype: CollectionSubtype,
    ) -> Vec<AssetCollection> {
        self.collections
            .iter()
            .map(|entry| &entry.collection)
            .filter(|c| c.collection_type == collection_type && c.subtype == subtype)
            .cloned()
            .collect()
    }

    pub fn collection(&self, id: &str) -> Option<&IndexedCollection> {
        self.collection_lookup
            .get(id)
            .and_then(|pos| self.collections.get(*pos))
    }

    /// Filter, sort and limit candidate positions per `options`.
    pub fn select(&self, candidates: &[usize], options: &FetchOptions) -> Vec<usize> {
        let mut selected: Vec<usize> = candidates
            .iter()
            .copied()
            .filter(|pos| self.asset(*pos).is_some_and(|asset| options.matches(asset)))
            .collect();

        // Positions already follow newest-first order.
        if options.sort == SortOrder::CreationDateAscending {
            selected.reverse();
        }

        if let Some(limit) = options.fetch_limit {
            selected.truncate(limit);
        }
        selected
    }

    pub fn all_positions(&self) -> Vec<usize> {
        (0..self.assets.len()).collect()
    }
}

/// Walk `root` and build a fresh index.
pub(crate) fn scan(root: &Path) -> Result<LibraryIndex> {
    if !root.is_dir() {
        return Err(BridgeError::NotAvailable(format!(
            "photo library root {} is not a directory",
            root.display()
        )));
    }

    let mut assets = Vec::new();
    let mut albums: HashMap<Vec<u8>, (AssetCollection, Vec<String>)> = HashMap::new();

    let walker = WalkDir::new(root)
        .follow_links(false)
        .into_iter()
        .filter_entry(|entry| entry.depth() == 0 || !is_hidden(entry));

    for entry in walker {
        let entry = match entry {
            Ok(entry) => entry,
            Err(err) => {
                warn!(error = %err, "Skipping unreadable library entry");
                continue;
            }
        };
        if entry.depth() == 0 {
            continue;
        }

        let relative = RelativePath::new(root, entry.path());

        if entry.file_type().is_dir() {
            if let Some((album_key, collection)) = album_for_dir(&relative) {
                albums
                    .entry(album_key)
                    .or_insert_with(|| (collection, Vec::new()));
            }
            continue;
        }

        let Some(media_type) = classify(entry.path()) else {
            continue;
        };

        let Some(asset) = index_file(&entry, &relative, media_type) else {
            continue;
        };

        if let Some(album_key) = album_key_for_file(&relative) {
            if let Some((_, members)) = albums.get_mut(&album_key) {
                members.push(asset.local_identifier.clone());
            }
        }

        assets.push(IndexedAsset {
            asset,
            path: entry.into_path(),
        });
    }

    assets.sort_by(|a, b| {
        b.asset
            .creation_date
            .cmp(&a.asset.creation_date)
            .then_with(|| a.asset.local_identifier.cmp(&b.asset.local_identifier))
    });

    let asset_lookup: HashMap<String, usize> = assets
        .iter()
        .enumerate()
        .map(|(pos, entry)| (entry.asset.local_identifier.clone(), pos))
        .collect();

    let mut collections: Vec<IndexedCollection> = albums
        .into_values()
        .map(|(collection, member_ids)| {
            let mut members: Vec<usize> = member_ids
                .iter()
                .filter_map(|id| asset_lookup.get(id).copied())
                .collect();
            members.sort_unstable();
            IndexedCollection {
                collection,
                members,
            }
        })
        .collect();

    collections.sort_by(|a, b| {
        a.collection
            .localized_title
            .cmp(&b.collection.localized_title)
            .then_with(|| {
                a.collection
                    .local_identifier
                    .cmp(&b.collection.local_identifier)
            })
    });

    let collection_lookup = collections
        .iter()
        .enumerate()
        .map(|(pos, entry)| (entry.collection.local_identifier.clone(), pos))
        .collect();

    debug!(
        assets = assets.len(),
        collections = collections.len(),
        "Indexed photo library"
    );

    Ok(LibraryIndex {
        assets,
        collections,
        asset_lookup,
        collection_lookup,
    })
}

fn is_hidden(entry: &DirEntry) -> bool {
    entry
        .file_name()
        .to_str()
        .map(|name| name.starts_with('.'))
        .unwrap_or(false)
}

fn classify(path: &Path) -> Option<MediaType> {
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    if IMAGE_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Image)
    } else if VIDEO_EXTENSIONS.contains(&ext.as_str()) {
        Some(MediaType::Video)
    } else {
        None
    }
}

fn index_file(entry: &DirEntry, relative: &RelativePath, media_type: MediaType) -> Option<Asset> {
    let (pixel_width, pixel_height) = match media_type {
        MediaType::Image => match image::image_dimensions(entry.path()) {
            Ok(dims) => dims,
            Err(err) => {
                warn!(file = ?entry.file_name(), error = %err, "Skipping undecodable image");
                return None;
            }
        },
        _ => (0, 0),
    };

    Some(Asset {
        local_identifier: make_id("asset", &relative.full_key()),
        media_type,
        creation_date: creation_date(entry),
        pixel_width,
        pixel_height,
    })
}

/// Modification time is preferred since copies usually preserve it, whereas
/// the filesystem birth time records when the copy was made.
fn creation_date(entry: &DirEntry) -> DateTime<Utc> {
    entry
        .metadata()
        .ok()
        .and_then(|meta| meta.modified().or_else(|_| meta.created()).ok())
        .map(DateTime::<Utc>::from)
        .unwrap_or_else(|| DateTime::<Utc>::from(UNIX_EPOCH))
}

/// Root-relative path of an entry.
///
/// `raw` keeps the exact name bytes for identity; `names` is the lossy
/// rendering used for titles and group folder matching.
pub(crate) struct RelativePath {
    raw: Vec<Vec<u8>>,
    names: Vec<String>,
}

impl RelativePath {
    fn new(root: &Path, path: &Path) -> Self {
        let (raw, names) = path
            .strip_prefix(root)
            .unwrap_or(path)
            .components()
            .filter_map(|component| match component {
                Component::Normal(part) => Some((
                    part.as_encoded_bytes().to_vec(),
                    part.to_string_lossy().into_owned(),
                )),
                _ => None,
            })
            .unzip();
        Self { raw, names }
    }

    fn len(&self) -> usize {
        self.raw.len()
    }

    /// Raw bytes of the first `depth` components joined by `/`.
    fn key(&self, depth: usize) -> Vec<u8> {
        self.raw[..depth.min(self.raw.len())].join(&b'/')
    }

    fn full_key(&self) -> Vec<u8> {
        self.key(self.raw.len())
    }
}

fn group_subtype(name: &str) -> Option<CollectionSubtype> {
    GROUP_FOLDERS
        .iter()
        .find(|(folder, _)| *folder == name)
        .map(|(_, subtype)| *subtype)
}

/// Number of leading path components naming the album directory.
fn album_depth(relative: &RelativePath) -> Option<usize> {
    let top = relative.names.first()?;
    if group_subtype(top).is_some() {
        Some(2)
    } else {
        Some(1)
    }
}

fn album_for_dir(relative: &RelativePath) -> Option<(Vec<u8>, AssetCollection)> {
    let depth = album_depth(relative)?;
    if relative.len() != depth {
        return None;
    }

    let subtype = match depth {
        2 => group_subtype(&relative.names[0])?,
        _ => CollectionSubtype::AlbumRegular,
    };

    let key = relative.full_key();
    let title = relative.names.last().cloned().filter(|t| !t.trim().is_empty());
    let collection = AssetCollection {
        local_identifier: make_id("collection", &key),
        localized_title: title,
        collection_type: CollectionType::Album,
        subtype,
    };
    Some((key, collection))
}

fn album_key_for_file(relative: &RelativePath) -> Option<Vec<u8>> {
    let depth = album_depth(relative)?;
    // The file itself must sit below the album directory.
    if relative.len() <= depth {
        return None;
    }
    Some(relative.key(depth))
}

/// Stable opaque identifier for the raw bytes of a root-relative path.
pub(crate) fn make_id(kind: &str, relative: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(kind.as_bytes());
    hasher.update(b":");
    hasher.update(relative);
    let mut id = format!("{:x}", hasher.finalize());
    id.truncate(ID_LENGTH);
    id
}
