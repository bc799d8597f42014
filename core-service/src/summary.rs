//! Wire records for images and albums
//!
//! Each record is sent as its own JSON-encoded string; list replies are an
//! ordered sequence of such strings.

use crate::error::Result;
use bridge_traits::{Asset, AssetCollection};
use chrono::SecondsFormat;
use serde::{Deserialize, Serialize};

/// Title used for collections without a localized title
pub const UNTITLED_ALBUM: &str = "n/a";

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageSummary {
    pub id: String,
    /// ISO-8601, UTC, second precision
    pub creation_date: String,
    pub pixel_width: u32,
    pub pixel_height: u32,
}

impl From<&Asset> for ImageSummary {
    fn from(asset: &Asset) -> Self {
        Self {
            id: asset.local_identifier.clone(),
            creation_date: asset
                .creation_date
                .to_rfc3339_opts(SecondsFormat::Secs, true),
            pixel_width: asset.pixel_width,
            pixel_height: asset.pixel_height,
        }
    }
}

impl ImageSummary {
    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlbumSummary {
    pub id: String,
    pub title: String,
    /// Most recently created image of the album
    pub cover_img: ImageSummary,
    pub image_count: usize,
}

impl AlbumSummary {
    pub fn new(collection: &AssetCollection, cover: &Asset, image_count: usize) -> Self {
        Self {
            id: collection.local_identifier.clone(),
            title: collection
                .localized_title
                .clone()
                .unwrap_or_else(|| UNTITLED_ALBUM.to_string()),
            cover_img: ImageSummary::from(cover),
            image_count,
        }
    }

    pub fn encode(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bridge_traits::{CollectionSubtype, CollectionType, MediaType};
    use chrono::{TimeZone, Utc};
    use serde_json::Value;

    fn asset() -> Asset {
        Asset {
            local_identifier: "img-1".into(),
            media_type: MediaType::Image,
            creation_date: Utc.with_ymd_and_hms(2019, 7, 4, 18, 30, 5).unwrap(),
            pixel_width: 4032,
            pixel_height: 3024,
        }
    }

    #[test]
    fn test_image_summary_wire_shape() {
        let encoded = ImageSummary::from(&asset()).encode().unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["id"], "img-1");
        assert_eq!(value["creationDate"], "2019-07-04T18:30:05Z");
        assert_eq!(value["pixelWidth"], 4032);
        assert_eq!(value["pixelHeight"], 3024);
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_album_summary_wire_shape() {
        let collection = AssetCollection {
            local_identifier: "album-1".into(),
            localized_title: Some("Trips \"2019\"".into()),
            collection_type: CollectionType::Album,
            subtype: CollectionSubtype::AlbumRegular,
        };
        let encoded = AlbumSummary::new(&collection, &asset(), 3).encode().unwrap();
        let value: Value = serde_json::from_str(&encoded).unwrap();

        assert_eq!(value["id"], "album-1");
        assert_eq!(value["title"], "Trips \"2019\"");
        assert_eq!(value["imageCount"], 3);
        assert_eq!(value["coverImg"]["id"], "img-1");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }

    #[test]
    fn test_album_title_fallback() {
        let collection = AssetCollection {
            local_identifier: "album-2".into(),
            localized_title: None,
            collection_type: CollectionType::Album,
            subtype: CollectionSubtype::AlbumImported,
        };
        let summary = AlbumSummary::new(&collection, &asset(), 1);
        assert_eq!(summary.title, UNTITLED_ALBUM);
    }
}
