//! # Desktop Bridge Implementations
//!
//! Implementations of the photo bridge traits for desktop platforms
//! (macOS, Windows, Linux), where there is no system photo framework to
//! delegate to.
//!
//! ## Overview
//!
//! - `PhotoLibrary` as [`FsPhotoLibrary`], a directory tree indexed with `walkdir`
//! - `ImageRenderer` as [`FsImageRenderer`], decoding and resizing with `image`
//! - `PhotoAuthorization` as [`DesktopAuthorization`], a consent prompt whose
//!   answer can be persisted as JSON
//!
//! ## Usage
//!
//! ```ignore
//! use bridge_desktop::{DesktopAuthorization, FixedConsent, FsPhotoLibrary};
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> bridge_traits::error::Result<()> {
//!     let library = FsPhotoLibrary::open("/home/me/Pictures").await?;
//!     let renderer = library.renderer();
//!     let authorization = DesktopAuthorization::new(Arc::new(FixedConsent(true)));
//!
//!     // Inject into the bridge configuration
//!     Ok(())
//! }
//! ```

mod authorization;
mod index;
mod library;
mod renderer;

pub use authorization::{ConsentPrompt, DesktopAuthorization, FixedConsent};
pub use library::FsPhotoLibrary;
pub use renderer::FsImageRenderer;

use std::path::PathBuf;

/// Default library location: the user's picture directory.
pub fn default_library_root() -> PathBuf {
    dirs::picture_dir().unwrap_or_else(|| {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("Pictures")
    })
}
