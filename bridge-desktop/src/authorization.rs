//! Desktop Authorization with Persisted Consent

use async_trait::async_trait;
use bridge_traits::{
    error::{BridgeError, Result},
    AuthorizationStatus, PhotoAuthorization,
};
use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::fs;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

/// Host-side consent UI.
///
/// Resolves once the user answers; there is no timeout.
#[async_trait]
pub trait ConsentPrompt: Send + Sync {
    async fn request_consent(&self) -> bool;
}

/// Prompt that always answers the same way
#[derive(Debug, Clone, Copy)]
pub struct FixedConsent(pub bool);

#[async_trait]
impl ConsentPrompt for FixedConsent {
    async fn request_consent(&self) -> bool {
        self.0
    }
}

#[derive(Debug, Serialize, Deserialize)]
struct ConsentRecord {
    status: AuthorizationStatus,
    decided_at: DateTime<Utc>,
}

/// Desktop stand-in for the OS photo permission.
///
/// The prompt runs at most once per undetermined state: concurrent
/// `request_authorization` calls wait for the same answer. With a state file
/// the answer survives restarts.
pub struct DesktopAuthorization {
    status: RwLock<AuthorizationStatus>,
    prompt: Arc<dyn ConsentPrompt>,
    state_file: Option<PathBuf>,
    prompt_lock: Mutex<()>,
}

impl DesktopAuthorization {
    /// Start undetermined, without persistence.
    pub fn new(prompt: Arc<dyn ConsentPrompt>) -> Self {
        Self {
            status: RwLock::new(AuthorizationStatus::NotDetermined),
            prompt,
            state_file: None,
            prompt_lock: Mutex::new(()),
        }
    }

    /// Load a previously persisted answer from `path`, if any.
    pub async fn with_state_file(
        prompt: Arc<dyn ConsentPrompt>,
        path: impl Into<PathBuf>,
    ) -> Result<Self> {
        let path = path.into();
        let status = load_status(&path).await?;
        debug!(path = ?path, ?status, "Loaded photo consent state");

        Ok(Self {
            status: RwLock::new(status),
            prompt,
            state_file: Some(path),
            prompt_lock: Mutex::new(()),
        })
    }

    async fn persist(&self, status: AuthorizationStatus) {
        let Some(path) = self.state_file.as_ref() else {
            return;
        };
        if let Err(err) = store_status(path, status).await {
            warn!(path = ?path, error = %err, "Failed to persist photo consent");
        }
    }
}

#[async_trait]
impl PhotoAuthorization for DesktopAuthorization {
    fn authorization_status(&self) -> AuthorizationStatus {
        *self.status.read()
    }

    async fn request_authorization(&self) -> AuthorizationStatus {
        let current = self.authorization_status();
        if current != AuthorizationStatus::NotDetermined {
            return current;
        }

        let _guard = self.prompt_lock.lock().await;
        // Another caller may have answered while we waited.
        let current = self.authorization_status();
        if current != AuthorizationStatus::NotDetermined {
            return current;
        }

        let status = if self.prompt.request_consent().await {
            AuthorizationStatus::Authorized
        } else {
            AuthorizationStatus::Denied
        };

        *self.status.write() = status;
        self.persist(status).await;
        info!(?status, "Photo library consent resolved");
        status
    }
}

async fn load_status(path: &Path) -> Result<AuthorizationStatus> {
    let data = match fs::read(path).await {
        Ok(data) => data,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
            return Ok(AuthorizationStatus::NotDetermined);
        }
        Err(err) => return Err(BridgeError::Io(err)),
    };

    let record: ConsentRecord = serde_json::from_slice(&data).map_err(|e| {
        BridgeError::OperationFailed(format!(
            "Corrupt consent state file {}: {}",
            path.display(),
            e
        ))
    })?;
    Ok(record.status)
}

async fn store_status(path: &Path, status: AuthorizationStatus) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }
    let record = ConsentRecord {
        status,
        decided_at: Utc::now(),
    };
    let data = serde_json::to_vec_pretty(&record)
        .map_err(|e| BridgeError::OperationFailed(format!("Failed to encode consent: {}", e)))?;
    fs::write(path, data).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    struct CountingPrompt {
        answer: bool,
        calls: AtomicUsize,
    }

    #[async_trait]
    impl ConsentPrompt for CountingPrompt {
        async fn request_consent(&self) -> bool {
            self.calls.fetch_add(1, Ordering::SeqCst);
            tokio::time::sleep(Duration::from_millis(20)).await;
            self.answer
        }
    }

    #[tokio::test]
    async fn test_starts_undetermined() {
        let auth = DesktopAuthorization::new(Arc::new(FixedConsent(true)));
        assert_eq!(
            auth.authorization_status(),
            AuthorizationStatus::NotDetermined
        );
    }

    #[tokio::test]
    async fn test_grant_and_deny() {
        let granted = DesktopAuthorization::new(Arc::new(FixedConsent(true)));
        assert_eq!(
            granted.request_authorization().await,
            AuthorizationStatus::Authorized
        );
        assert!(granted.authorization_status().is_authorized());

        let denied = DesktopAuthorization::new(Arc::new(FixedConsent(false)));
        assert_eq!(
            denied.request_authorization().await,
            AuthorizationStatus::Denied
        );
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_concurrent_requests_share_one_prompt() {
        let prompt = Arc::new(CountingPrompt {
            answer: true,
            calls: AtomicUsize::new(0),
        });
        let auth = Arc::new(DesktopAuthorization::new(prompt.clone()));

        let a = tokio::spawn({
            let auth = Arc::clone(&auth);
            async move { auth.request_authorization().await }
        });
        let b = tokio::spawn({
            let auth = Arc::clone(&auth);
            async move { auth.request_authorization().await }
        });

        assert_eq!(a.await.unwrap(), AuthorizationStatus::Authorized);
        assert_eq!(b.await.unwrap(), AuthorizationStatus::Authorized);
        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_answer_is_not_asked_twice() {
        let prompt = Arc::new(CountingPrompt {
            answer: false,
            calls: AtomicUsize::new(0),
        });
        let auth = DesktopAuthorization::new(prompt.clone());

        auth.request_authorization().await;
        auth.request_authorization().await;
        assert_eq!(prompt.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_state_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state").join("consent.json");

        let first = DesktopAuthorization::with_state_file(Arc::new(FixedConsent(true)), &path)
            .await
            .unwrap();
        first.request_authorization().await;

        // A denying prompt is never consulted once an answer is stored.
        let second = DesktopAuthorization::with_state_file(Arc::new(FixedConsent(false)), &path)
            .await
            .unwrap();
        assert_eq!(
            second.authorization_status(),
            AuthorizationStatus::Authorized
        );
    }

    #[tokio::test]
    async fn test_corrupt_state_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("consent.json");
        tokio::fs::write(&path, b"not json").await.unwrap();

        let result =
            DesktopAuthorization::with_state_file(Arc::new(FixedConsent(true)), &path).await;
        assert!(matches!(result, Err(BridgeError::OperationFailed(_))));
    }
}
