//! # Bridge Configuration Module
//!
//! Provides configuration management for the photo bridge.
//!
//! ## Overview
//!
//! The configuration system uses a builder pattern to construct a
//! `BridgeConfig` holding the injected host bridges and the tunables of the
//! request layer. Validation is fail-fast: out-of-range values and
//! inconsistent bridge combinations are rejected by
//! [`build()`](BridgeConfigBuilder::build).
//!
//! ## Injected Bridges
//!
//! - `PhotoLibrary` - asset and collection enumeration
//! - `PhotoAuthorization` - permission state and consent flow
//! - `ImageRenderer` - asynchronous image rendering
//!
//! All three are optional here. When the `desktop-shims` feature of
//! `core-service` is enabled, missing bridges are filled with the
//! directory-backed desktop implementations rooted at `library_root`.
//!
//! ## Usage
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//!
//! let config = BridgeConfig::builder()
//!     .library_root("/home/me/Pictures")
//!     .consent_state_path("/home/me/.local/share/photo-bridge/consent.json")
//!     .auto_grant_consent(true)
//!     .build()
//!     .expect("Failed to build config");
//! ```
//!
//! ## Error Handling
//!
//! ```should_panic
//! use core_runtime::config::BridgeConfig;
//!
//! // JPEG quality must be within 1..=100
//! let config = BridgeConfig::builder()
//!     .jpeg_quality(0)
//!     .build()
//!     .expect("Should fail - invalid quality");
//! ```

use crate::error::{Error, Result};
use bridge_traits::{ImageRenderer, PhotoAuthorization, PhotoLibrary};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// JPEG quality used for `image_bytes` responses
pub const DEFAULT_JPEG_QUALITY: u8 = 70;

/// Pending calls the method channel buffers before callers wait
pub const DEFAULT_CHANNEL_CAPACITY: usize = 64;

/// Configuration for the photo bridge.
///
/// Use [`BridgeConfigBuilder`] to construct instances.
#[derive(Clone)]
pub struct BridgeConfig {
    /// Root directory of the desktop photo library
    pub library_root: Option<PathBuf>,

    /// Where the desktop consent answer is persisted
    pub consent_state_path: Option<PathBuf>,

    /// Answer given by the desktop consent prompt
    pub auto_grant_consent: bool,

    /// Quality of encoded JPEG responses (1..=100)
    pub jpeg_quality: u8,

    /// Capacity of the method channel queue
    pub channel_capacity: usize,

    pub library: Option<Arc<dyn PhotoLibrary>>,

    pub authorization: Option<Arc<dyn PhotoAuthorization>>,

    pub renderer: Option<Arc<dyn ImageRenderer>>,
}

impl fmt::Debug for BridgeConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BridgeConfig")
            .field("library_root", &self.library_root)
            .field("consent_state_path", &self.consent_state_path)
            .field("auto_grant_consent", &self.auto_grant_consent)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("channel_capacity", &self.channel_capacity)
            .field("library", &self.library.as_ref().map(|_| "PhotoLibrary"))
            .field(
                "authorization",
                &self.authorization.as_ref().map(|_| "PhotoAuthorization"),
            )
            .field("renderer", &self.renderer.as_ref().map(|_| "ImageRenderer"))
            .finish()
    }
}

impl BridgeConfig {
    /// Creates a new builder for constructing a `BridgeConfig`.
    pub fn builder() -> BridgeConfigBuilder {
        BridgeConfigBuilder::default()
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if a value is out of range or the injected
    /// bridges cannot work together, and [`Error::CapabilityMissing`] when an
    /// injected `PhotoLibrary` comes without its `ImageRenderer`.
    pub fn validate(&self) -> Result<()> {
        if self.jpeg_quality == 0 || self.jpeg_quality > 100 {
            return Err(Error::Config(format!(
                "JPEG quality must be between 1 and 100, got {}",
                self.jpeg_quality
            )));
        }

        if self.channel_capacity == 0 {
            return Err(Error::Config(
                "Channel capacity must be greater than 0".to_string(),
            ));
        }

        if let Some(root) = &self.library_root {
            if root.as_os_str().is_empty() {
                return Err(Error::Config("Library root cannot be empty".to_string()));
            }
        }

        // A renderer resolves identifiers handed out by a specific library.
        if self.renderer.is_some() && self.library.is_none() {
            return Err(Error::Config(
                "An injected ImageRenderer requires the PhotoLibrary it renders from".to_string(),
            ));
        }

        if self.library.is_some() && self.renderer.is_none() {
            return Err(renderer_missing_error());
        }

        Ok(())
    }
}

/// Reported when an injected library arrives without its renderer.
pub fn renderer_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "ImageRenderer".to_string(),
        message: "An injected PhotoLibrary needs the ImageRenderer that resolves its identifiers. \
                 Inject both, or neither to use the desktop library."
            .to_string(),
    }
}

/// Reported when no `PhotoLibrary` is injected and no default exists.
pub fn library_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PhotoLibrary".to_string(),
        message: "PhotoLibrary implementation is required for asset enumeration. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default FsPhotoLibrary. \
                 Mobile: inject the platform photo framework adapter."
            .to_string(),
    }
}

/// Reported when no `PhotoAuthorization` is injected and no default exists.
pub fn authorization_missing_error() -> Error {
    Error::CapabilityMissing {
        capability: "PhotoAuthorization".to_string(),
        message: "PhotoAuthorization implementation is required for the consent flow. \
                 Desktop: ensure the 'desktop-shims' feature is enabled to use the default DesktopAuthorization. \
                 Mobile: inject the platform permission adapter."
            .to_string(),
    }
}

/// Builder for constructing [`BridgeConfig`] instances.
pub struct BridgeConfigBuilder {
    library_root: Option<PathBuf>,
    consent_state_path: Option<PathBuf>,
    auto_grant_consent: bool,
    jpeg_quality: u8,
    channel_capacity: usize,
    library: Option<Arc<dyn PhotoLibrary>>,
    authorization: Option<Arc<dyn PhotoAuthorization>>,
    renderer: Option<Arc<dyn ImageRenderer>>,
}

impl Default for BridgeConfigBuilder {
    fn default() -> Self {
        Self {
            library_root: None,
            consent_state_path: None,
            auto_grant_consent: false,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            channel_capacity: DEFAULT_CHANNEL_CAPACITY,
            library: None,
            authorization: None,
            renderer: None,
        }
    }
}

impl BridgeConfigBuilder {
    /// Sets the root directory of the desktop library.
    ///
    /// # Examples
    ///
    /// ```
    /// use core_runtime::config::BridgeConfig;
    ///
    /// let builder = BridgeConfig::builder()
    ///     .library_root("/home/me/Pictures");
    /// ```
    pub fn library_root<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.library_root = Some(path.into());
        self
    }

    /// Sets the file the desktop consent answer is stored in.
    pub fn consent_state_path<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.consent_state_path = Some(path.into());
        self
    }

    /// Sets the answer of the desktop consent prompt.
    ///
    /// Default: `false` (deny)
    pub fn auto_grant_consent(mut self, grant: bool) -> Self {
        self.auto_grant_consent = grant;
        self
    }

    /// Sets the JPEG quality of `image_bytes` responses.
    ///
    /// Default: 70
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.jpeg_quality = quality;
        self
    }

    /// Sets the method channel queue capacity.
    ///
    /// Default: 64
    pub fn channel_capacity(mut self, capacity: usize) -> Self {
        self.channel_capacity = capacity;
        self
    }

    pub fn library(mut self, library: Arc<dyn PhotoLibrary>) -> Self {
        self.library = Some(library);
        self
    }

    pub fn authorization(mut self, authorization: Arc<dyn PhotoAuthorization>) -> Self {
        self.authorization = Some(authorization);
        self
    }

    pub fn renderer(mut self, renderer: Arc<dyn ImageRenderer>) -> Self {
        self.renderer = Some(renderer);
        self
    }

    /// Builds and validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] when validation fails.
    pub fn build(self) -> Result<BridgeConfig> {
        let config = BridgeConfig {
            library_root: self.library_root,
            consent_state_path: self.consent_state_path,
            auto_grant_consent: self.auto_grant_consent,
            jpeg_quality: self.jpeg_quality,
            channel_capacity: self.channel_capacity,
            library: self.library,
            authorization: self.authorization,
            renderer: self.renderer,
        };

        config.validate()?;
        Ok(config)
    }
}
