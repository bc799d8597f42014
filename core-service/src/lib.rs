//! Photo bridge service façade and bootstrap helpers.
//!
//! This crate wires host-provided bridge implementations (photo library,
//! authorization, image renderer) into the request layer: typed operations
//! on [`PhotoService`], named-method dispatch on [`RequestDispatcher`] and
//! the in-process [`MethodChannel`]. Desktop apps typically enable the
//! `desktop-shims` feature (which depends on `bridge-desktop`) so missing
//! bridges are filled with the directory-backed implementations.
//!
//! ```ignore
//! use core_runtime::config::BridgeConfig;
//! use serde_json::json;
//!
//! let config = BridgeConfig::builder()
//!     .library_root("/home/me/Pictures")
//!     .auto_grant_consent(true)
//!     .build()?;
//! let channel = core_service::start_channel(config).await?;
//!
//! channel.invoke_method("initialize", None).await?;
//! let latest = channel.invoke_method("latest_images", Some(json!(20))).await?;
//! ```

pub mod channel;
pub mod dispatcher;
pub mod error;
pub mod method;
pub mod render;
pub mod request;
pub mod service;
pub mod summary;

pub use channel::{MethodChannel, CHANNEL_NAME};
pub use dispatcher::{MethodCall, MethodReply, ReplyValue, RequestDispatcher};
pub use error::{ChannelError, ErrorCode, MethodError, Result, ServiceError};
pub use method::Method;
pub use request::{AlbumsRequest, ImageBytesRequest, ImagesInAlbumRequest, LatestImagesRequest};
pub use service::{PhotoService, Session};
pub use summary::{AlbumSummary, ImageSummary};

use std::sync::Arc;

use bridge_traits::{ImageRenderer, PhotoAuthorization, PhotoLibrary};
use core_runtime::config::{renderer_missing_error, BridgeConfig};
use tracing::info;

/// Aggregated handle to the bridges the service requires.
pub struct BridgeDependencies {
    pub library: Arc<dyn PhotoLibrary>,
    pub authorization: Arc<dyn PhotoAuthorization>,
    pub renderer: Arc<dyn ImageRenderer>,
}

impl BridgeDependencies {
    /// Construct a dependency bundle from explicit bridge handles.
    pub fn new(
        library: Arc<dyn PhotoLibrary>,
        authorization: Arc<dyn PhotoAuthorization>,
        renderer: Arc<dyn ImageRenderer>,
    ) -> Self {
        Self {
            library,
            authorization,
            renderer,
        }
    }
}

/// Resolve the bridges named by `config`, filling gaps with desktop
/// defaults when the `desktop-shims` feature is enabled.
///
/// # Errors
///
/// [`ServiceError::Runtime`] carrying `CapabilityMissing` when a bridge is
/// absent and no default can stand in for it.
pub async fn resolve_dependencies(config: &BridgeConfig) -> Result<BridgeDependencies> {
    config.validate()?;

    let (library, renderer) = match (config.library.clone(), config.renderer.clone()) {
        (Some(library), Some(renderer)) => (library, renderer),
        (Some(_), None) => return Err(renderer_missing_error().into()),
        (None, _) => default_library(config).await?,
    };

    let authorization = match config.authorization.clone() {
        Some(authorization) => authorization,
        None => default_authorization(config).await?,
    };

    Ok(BridgeDependencies::new(library, authorization, renderer))
}

/// Build a [`PhotoService`] from `config`.
pub async fn bootstrap(config: BridgeConfig) -> Result<PhotoService> {
    let deps = resolve_dependencies(&config).await?;
    info!(jpeg_quality = config.jpeg_quality, "Photo bridge ready");
    Ok(
        PhotoService::new(deps.library, deps.authorization, deps.renderer)
            .with_jpeg_quality(config.jpeg_quality),
    )
}

/// Bootstrap and start serving the method channel.
///
/// Must be called from within a Tokio runtime.
pub async fn start_channel(config: BridgeConfig) -> Result<MethodChannel> {
    let capacity = config.channel_capacity;
    let service = bootstrap(config).await?;
    let (channel, _server) = MethodChannel::serve(RequestDispatcher::new(service), capacity);
    Ok(channel)
}

#[cfg(feature = "desktop-shims")]
async fn default_library(
    config: &BridgeConfig,
) -> Result<(Arc<dyn PhotoLibrary>, Arc<dyn ImageRenderer>)> {
    use bridge_desktop::{default_library_root, FsPhotoLibrary};
    use core_runtime::logging::strip_path;

    let root = config
        .library_root
        .clone()
        .unwrap_or_else(default_library_root);
    let library = FsPhotoLibrary::open(&root).await.map_err(|e| {
        ServiceError::InitializationFailed(format!("Failed to open photo library: {}", e))
    })?;

    let root_display = root.to_string_lossy();
    info!(root = %strip_path(&root_display), "Using desktop photo library");

    let renderer: Arc<dyn ImageRenderer> = Arc::new(library.renderer());
    let library: Arc<dyn PhotoLibrary> = Arc::new(library);
    Ok((library, renderer))
}

#[cfg(not(feature = "desktop-shims"))]
async fn default_library(
    _config: &BridgeConfig,
) -> Result<(Arc<dyn PhotoLibrary>, Arc<dyn ImageRenderer>)> {
    Err(core_runtime::config::library_missing_error().into())
}

#[cfg(feature = "desktop-shims")]
async fn default_authorization(config: &BridgeConfig) -> Result<Arc<dyn PhotoAuthorization>> {
    use bridge_desktop::{DesktopAuthorization, FixedConsent};

    let prompt = Arc::new(FixedConsent(config.auto_grant_consent));
    let authorization = match &config.consent_state_path {
        Some(path) => DesktopAuthorization::with_state_file(prompt, path)
            .await
            .map_err(|e| {
                ServiceError::InitializationFailed(format!("Failed to load consent state: {}", e))
            })?,
        None => DesktopAuthorization::new(prompt),
    };
    Ok(Arc::new(authorization))
}

#[cfg(not(feature = "desktop-shims"))]
async fn default_authorization(_config: &BridgeConfig) -> Result<Arc<dyn PhotoAuthorization>> {
    Err(core_runtime::config::authorization_missing_error().into())
}
