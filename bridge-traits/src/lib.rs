//! # Host Bridge Traits
//!
//! Platform abstraction traits for the photo library bridge.
//!
//! ## Overview
//!
//! This crate defines the contract between the request dispatcher and the
//! host's photo framework. The framework owns the media index, the permission
//! state and the image render pipeline; each platform ships an adapter that
//! implements the traits below.
//!
//! ## Traits
//!
//! - [`PhotoLibrary`](library::PhotoLibrary) - Asset and collection enumeration
//! - [`PhotoAuthorization`](authorization::PhotoAuthorization) - Permission state and consent flow
//! - [`ImageRenderer`](render::ImageRenderer) - Callback-driven image decode and resize
//! - [`LoggerSink`](log::LoggerSink) - Forward structured logs to host logging
//!
//! ## Platform Requirements
//!
//! | Platform | Implementation Crate | Status |
//! |----------|---------------------|--------|
//! | Desktop  | `bridge-desktop`    | ✅ Available |
//! | iOS      | TBD                 | 📋 Planned |
//! | Android  | TBD                 | 📋 Planned |
//!
//! ## Error Handling
//!
//! All bridge traits use [`BridgeError`](error::BridgeError). Adapters should
//! convert platform errors into it and keep the asset identifier in the
//! message where one applies.
//!
//! ## Thread Safety
//!
//! Every trait requires `Send + Sync`. Render deliveries may arrive on any
//! thread; consumers are responsible for moving results back to the task
//! that awaits them.

pub mod authorization;
pub mod error;
pub mod library;
pub mod log;
pub mod photos;
pub mod render;

pub use error::BridgeError;

pub use authorization::PhotoAuthorization;
pub use library::PhotoLibrary;
pub use log::{ConsoleLogger, LogEntry, LogLevel, LoggerSink};
pub use photos::{
    Asset, AssetCollection, AuthorizationStatus, CollectionSubtype, CollectionType, FetchOptions,
    FetchResult, MediaType, SortOrder, ALBUM_SUBTYPES,
};
pub use render::{
    ContentMode, DeliveryHandler, DeliveryMode, ImageDelivery, ImageRenderer, ImageRequest,
    ImageRequestOptions, RequestId, ResizeMode, TargetSize,
};
