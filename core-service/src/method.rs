//! Method names of the photo channel

use std::fmt;
use std::str::FromStr;

/// Operations understood by the dispatcher.
///
/// Unrecognized names parse to [`Method::Unknown`] so the caller gets an
/// `unimplemented` reply instead of a parse failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Method {
    HasPermission,
    Initialize,
    Albums,
    LatestImages,
    ImagesInAlbum,
    ImageBytes,
    Unknown(String),
}

impl Method {
    pub fn as_str(&self) -> &str {
        match self {
            Self::HasPermission => "has_permission",
            Self::Initialize => "initialize",
            Self::Albums => "albums",
            Self::LatestImages => "latest_images",
            Self::ImagesInAlbum => "images_in_album",
            Self::ImageBytes => "image_bytes",
            Self::Unknown(name) => name,
        }
    }
}

impl FromStr for Method {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "has_permission" => Self::HasPermission,
            "initialize" => Self::Initialize,
            "albums" => Self::Albums,
            "latest_images" => Self::LatestImages,
            "images_in_album" => Self::ImagesInAlbum,
            "image_bytes" => Self::ImageBytes,
            other => Self::Unknown(other.to_string()),
        })
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_names_round_trip() {
        for name in [
            "has_permission",
            "initialize",
            "albums",
            "latest_images",
            "images_in_album",
            "image_bytes",
        ] {
            let method: Method = name.parse().unwrap();
            assert!(!matches!(method, Method::Unknown(_)), "{}", name);
            assert_eq!(method.as_str(), name);
        }
    }

    #[test]
    fn test_unknown_method() {
        let method: Method = "getPlatformVersion".parse().unwrap();
        assert_eq!(method, Method::Unknown("getPlatformVersion".into()));
        assert_eq!(method.to_string(), "getPlatformVersion");
    }
}
