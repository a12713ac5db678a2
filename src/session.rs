//! Caller identity and session context
//!
//! The identity is resolved once per session (host-supplied id, otherwise the locally
//! persisted fallback) and then passed explicitly to every component.

use std::path::{Path, PathBuf};

use tokio::sync::RwLock;

use crate::error::{ClientError, ClientResult};
use crate::models::UserProfile;

/// External identity of the caller
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub tg_id: i64,
}

impl Identity {
    pub fn new(tg_id: i64) -> Self {
        Self { tg_id }
    }

    /// Resolve the caller identity.
    ///
    /// A host-supplied id wins and is remembered in `store` for later sessions.
    /// Without one, the stored id is used.
    pub async fn resolve(host_supplied: Option<i64>, store: &IdentityStore) -> ClientResult<Self> {
        if let Some(tg_id) = host_supplied {
            if let Err(e) = store.save(tg_id).await {
                tracing::warn!("Failed to persist identity {}: {}", tg_id, e);
            }
            return Ok(Self::new(tg_id));
        }

        match store.load().await? {
            Some(tg_id) => {
                tracing::debug!("Using persisted identity {}", tg_id);
                Ok(Self::new(tg_id))
            }
            None => Err(ClientError::Identity(
                "no host identity and no persisted fallback".to_string(),
            )),
        }
    }
}

/// File-backed fallback identity
#[derive(Debug, Clone)]
pub struct IdentityStore {
    path: PathBuf,
}

impl IdentityStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the stored id; a missing file means no fallback
    pub async fn load(&self) -> ClientResult<Option<i64>> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(ClientError::Identity(e.to_string())),
        };

        match raw.trim() {
            "" => Ok(None),
            value => value
                .parse()
                .map(Some)
                .map_err(|_| ClientError::Identity(format!("corrupt identity file: {value:?}"))),
        }
    }

    pub async fn save(&self, tg_id: i64) -> ClientResult<()> {
        tokio::fs::write(&self.path, tg_id.to_string())
            .await
            .map_err(|e| ClientError::Identity(e.to_string()))
    }
}

/// Per-session caller context shared by all components
#[derive(Debug)]
pub struct SessionContext {
    identity: Identity,
    profile: RwLock<Option<UserProfile>>,
}

impl SessionContext {
    pub fn new(identity: Identity) -> Self {
        Self {
            identity,
            profile: RwLock::new(None),
        }
    }

    pub fn with_profile(identity: Identity, profile: UserProfile) -> Self {
        Self {
            identity,
            profile: RwLock::new(Some(profile)),
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn tg_id(&self) -> i64 {
        self.identity.tg_id
    }

    /// Current profile snapshot, if loaded
    pub async fn profile(&self) -> Option<UserProfile> {
        self.profile.read().await.clone()
    }

    /// Profile or a validation error telling the caller it is not loaded yet
    pub async fn require_profile(&self) -> ClientResult<UserProfile> {
        self.profile()
            .await
            .ok_or_else(|| ClientError::Validation("user profile is not loaded".to_string()))
    }

    /// Replace the profile; only elo and solved count are expected to change
    pub async fn set_profile(&self, profile: UserProfile) {
        if profile.tg_id != self.identity.tg_id {
            tracing::warn!(
                "Ignoring profile for {} in session of {}",
                profile.tg_id,
                self.identity.tg_id
            );
            return;
        }
        *self.profile.write().await = Some(profile);
    }
}
