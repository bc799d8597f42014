//! Photo Library Authorization
//!
//! The host owns the permission state; the bridge only reads it or asks the
//! host to run its consent flow.

use async_trait::async_trait;

use crate::photos::AuthorizationStatus;

/// Host authorization subsystem.
///
/// # Platform Support
///
/// - **Desktop**: consent prompt with optional persisted answer
/// - **iOS**: `PHPhotoLibrary` authorization
/// - **Android**: `READ_MEDIA_IMAGES` runtime permission
#[async_trait]
pub trait PhotoAuthorization: Send + Sync {
    /// Current status. Never prompts.
    fn authorization_status(&self) -> AuthorizationStatus;

    /// Ask the user for access.
    ///
    /// When the status is [`AuthorizationStatus::NotDetermined`] this runs the
    /// host consent flow and resolves once the user answers, with no timeout.
    /// Otherwise it resolves immediately with the current status.
    async fn request_authorization(&self) -> AuthorizationStatus;
}
