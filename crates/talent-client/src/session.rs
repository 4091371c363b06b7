//! Access/refresh token state shared by every request.

use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::{Mutex, broadcast};

use crate::config::write_private;
use crate::error::ApiError;

const EVENT_CAPACITY: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tokens {
    pub access_token: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionEvent {
    /// Tokens were stored, replaced or removed.
    TokensChanged,
    /// Refresh failed; the UI should send the user back to login.
    Expired,
}

/// Where tokens live between runs.
pub trait TokenStore: Send + Sync {
    fn load(&self) -> Result<Option<Tokens>, ApiError>;
    fn save(&self, tokens: &Tokens) -> Result<(), ApiError>;
    fn clear(&self) -> Result<(), ApiError>;
}

/// Tokens as a JSON file, written atomically with owner-only permissions.
pub struct FileTokenStore {
    path: PathBuf,
}

impl FileTokenStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// `tokens.json` next to the client config.
    pub fn in_config_dir() -> Result<Self, ApiError> {
        Ok(Self::new(crate::config::config_dir()?.join("tokens.json")))
    }
}

impl TokenStore for FileTokenStore {
    fn load(&self) -> Result<Option<Tokens>, ApiError> {
        if !self.path.exists() {
            return Ok(None);
        }
        let contents = std::fs::read_to_string(&self.path)
            .map_err(|e| ApiError::TokenStore(format!("read {}: {e}", self.path.display())))?;
        let tokens = serde_json::from_str(&contents)
            .map_err(|e| ApiError::TokenStore(format!("parse {}: {e}", self.path.display())))?;
        Ok(Some(tokens))
    }

    fn save(&self, tokens: &Tokens) -> Result<(), ApiError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)
                .map_err(|e| ApiError::TokenStore(format!("create {}: {e}", dir.display())))?;
        }
        let json = serde_json::to_vec_pretty(tokens)?;
        write_private(&self.path, &json)
            .map_err(|e| ApiError::TokenStore(format!("write {}: {e}", self.path.display())))
    }

    fn clear(&self) -> Result<(), ApiError> {
        match std::fs::remove_file(&self.path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(ApiError::TokenStore(format!(
                "remove {}: {e}",
                self.path.display()
            ))),
        }
    }
}

#[derive(Default)]
pub struct MemoryTokenStore {
    tokens: std::sync::Mutex<Option<Tokens>>,
}

impl MemoryTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&self) -> std::sync::MutexGuard<'_, Option<Tokens>> {
        self.tokens
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl TokenStore for MemoryTokenStore {
    fn load(&self) -> Result<Option<Tokens>, ApiError> {
        Ok(self.slot().clone())
    }

    fn save(&self, tokens: &Tokens) -> Result<(), ApiError> {
        *self.slot() = Some(tokens.clone());
        Ok(())
    }

    fn clear(&self) -> Result<(), ApiError> {
        *self.slot() = None;
        Ok(())
    }
}

pub struct Session {
    tokens: Mutex<Option<Tokens>>,
    store: Arc<dyn TokenStore>,
    /// Serializes store writes so the store ends on the latest tokens.
    persist: Mutex<()>,
    events: broadcast::Sender<SessionEvent>,
}

impl Session {
    /// Start from whatever `store` already holds. An unreadable store
    /// starts logged out.
    pub fn new(store: Box<dyn TokenStore>) -> Self {
        let tokens = store.load().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "ignoring unreadable token store");
            None
        });
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            tokens: Mutex::new(tokens),
            store: Arc::from(store),
            persist: Mutex::new(()),
            events,
        }
    }

    pub fn in_memory() -> Self {
        Self::new(Box::new(MemoryTokenStore::new()))
    }

    pub fn subscribe(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    pub async fn access_token(&self) -> Option<String> {
        self.tokens.lock().await.as_ref().map(|t| t.access_token.clone())
    }

    pub async fn refresh_token(&self) -> Option<String> {
        self.tokens
            .lock()
            .await
            .as_ref()
            .and_then(|t| t.refresh_token.clone())
    }

    pub async fn is_authenticated(&self) -> bool {
        self.tokens.lock().await.is_some()
    }

    /// Store a new token pair. A refresh response without a refresh token
    /// keeps the one already held.
    ///
    /// The new tokens are visible to readers before the store is written;
    /// a failed write is reported but does not roll them back.
    pub async fn set_tokens(&self, mut tokens: Tokens) -> Result<(), ApiError> {
        {
            let mut guard = self.tokens.lock().await;
            if tokens.refresh_token.is_none() {
                tokens.refresh_token = guard.as_ref().and_then(|t| t.refresh_token.clone());
            }
            *guard = Some(tokens);
        }
        self.notify(SessionEvent::TokensChanged);
        self.persist().await
    }

    /// Log out: forget the tokens here and in the store.
    pub async fn clear(&self) -> Result<(), ApiError> {
        self.tokens.lock().await.take();
        self.notify(SessionEvent::TokensChanged);
        self.persist().await
    }

    /// Write the current tokens to the store on the blocking pool, without
    /// holding the token lock.
    async fn persist(&self) -> Result<(), ApiError> {
        let _writer = self.persist.lock().await;
        let snapshot = self.tokens.lock().await.clone();
        let store = Arc::clone(&self.store);
        tokio::task::spawn_blocking(move || match snapshot {
            Some(tokens) => store.save(&tokens),
            None => store.clear(),
        })
        .await
        .map_err(|e| ApiError::TokenStore(format!("token store task: {e}")))?
    }

    /// Clear after an unrecoverable 401 and tell listeners to re-authenticate.
    pub async fn expire(&self) {
        if let Err(e) = self.clear().await {
            tracing::warn!(error = %e, "failed to clear token store");
        }
        tracing::warn!("session expired, tokens cleared");
        self.notify(SessionEvent::Expired);
    }

    fn notify(&self, event: SessionEvent) {
        // No subscribers is fine.
        let _ = self.events.send(event);
    }
}
