//! Session token slot, client-local persistence and token inspection

use base64::Engine;
use base64::engine::general_purpose::{STANDARD_NO_PAD, URL_SAFE_NO_PAD};
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use crate::context::ExecutionContext;
use crate::error::TokenError;
use crate::types::SessionToken;

/// Key the bearer token is persisted under
pub const TOKEN_KEY: &str = "auth_token";

// ============================================================================
// Client-local storage
// ============================================================================

/// Client-local key/value storage
///
/// Only ever used from the client execution context.
pub trait LocalStore: Send + Sync + std::fmt::Debug {
    /// Read a value
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenError>;

    /// Write a value, replacing any previous one
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenError>;

    /// Remove a value; removing a missing key is not an error
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be written.
    fn remove_item(&self, key: &str) -> Result<(), TokenError>;
}

/// JSON file backed [`LocalStore`]
#[derive(Debug, Clone)]
pub struct FileLocalStore {
    storage_path: PathBuf,
}

impl Default for FileLocalStore {
    fn default() -> Self {
        Self::new()
    }
}

impl FileLocalStore {
    /// Store in the platform-specific config directory
    #[must_use]
    pub fn new() -> Self {
        let config_dir = dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("userdesk-sdk");

        Self {
            storage_path: config_dir.join("local_storage.json"),
        }
    }

    /// Store at a custom path
    #[must_use]
    pub fn with_path(path: PathBuf) -> Self {
        Self { storage_path: path }
    }

    /// Get the storage path
    #[must_use]
    pub fn path(&self) -> &PathBuf {
        &self.storage_path
    }

    fn read_items(&self) -> Result<HashMap<String, String>, TokenError> {
        if !self.storage_path.exists() {
            return Ok(HashMap::new());
        }
        let content = std::fs::read_to_string(&self.storage_path)?;
        if content.trim().is_empty() {
            return Ok(HashMap::new());
        }
        Ok(serde_json::from_str(&content)?)
    }

    fn write_items(&self, items: &HashMap<String, String>) -> Result<(), TokenError> {
        if let Some(parent) = self.storage_path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(items)?;
        std::fs::write(&self.storage_path, &content)?;

        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(&self.storage_path, perms)?;
        }

        Ok(())
    }
}

impl LocalStore for FileLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenError> {
        Ok(self.read_items()?.remove(key))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenError> {
        let mut items = self.read_items()?;
        items.insert(key.to_string(), value.to_string());
        self.write_items(&items)
    }

    fn remove_item(&self, key: &str) -> Result<(), TokenError> {
        let mut items = self.read_items()?;
        if items.remove(key).is_some() {
            self.write_items(&items)?;
        }
        Ok(())
    }
}

/// In-memory [`LocalStore`], lost when dropped
#[derive(Debug, Default)]
pub struct MemoryLocalStore {
    items: Mutex<HashMap<String, String>>,
}

impl MemoryLocalStore {
    /// Create an empty store
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

impl LocalStore for MemoryLocalStore {
    fn get_item(&self, key: &str) -> Result<Option<String>, TokenError> {
        Ok(self
            .items
            .lock()
            .ok()
            .and_then(|items| items.get(key).cloned()))
    }

    fn set_item(&self, key: &str, value: &str) -> Result<(), TokenError> {
        if let Ok(mut items) = self.items.lock() {
            items.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }

    fn remove_item(&self, key: &str) -> Result<(), TokenError> {
        if let Ok(mut items) = self.items.lock() {
            items.remove(key);
        }
        Ok(())
    }
}

// ============================================================================
// Token store
// ============================================================================

/// The session's single bearer token slot
///
/// Clones share the same slot, so a client, the session bridge and the
/// endpoint APIs built from one store all see the same token. In the server
/// context the store is inert: reads return `None` and writes are dropped.
#[derive(Debug, Clone)]
pub struct TokenStore {
    context: ExecutionContext,
    slot: Arc<Mutex<Option<SessionToken>>>,
    local: Option<Arc<dyn LocalStore>>,
}

impl TokenStore {
    /// In-memory store for the given context
    #[must_use]
    pub fn new(context: ExecutionContext) -> Self {
        Self {
            context,
            slot: Arc::new(Mutex::new(None)),
            local: None,
        }
    }

    /// In-memory client-side store
    #[must_use]
    pub fn client() -> Self {
        Self::new(ExecutionContext::Client)
    }

    /// Server-side store (always empty)
    #[must_use]
    pub fn server() -> Self {
        Self::new(ExecutionContext::Server)
    }

    /// Client-side store persisted to `local`, hydrated from it immediately
    #[must_use]
    pub fn with_local_store(local: Arc<dyn LocalStore>) -> Self {
        let initial = match local.get_item(TOKEN_KEY) {
            Ok(token) => token.filter(|t| !t.is_empty()).map(SessionToken::new),
            Err(e) => {
                tracing::warn!("Could not read persisted token: {e}");
                None
            }
        };
        if initial.is_some() {
            tracing::debug!("Hydrated session token from local storage");
        }

        Self {
            context: ExecutionContext::Client,
            slot: Arc::new(Mutex::new(initial)),
            local: Some(local),
        }
    }

    /// Context this store is bound to
    #[must_use]
    pub fn context(&self) -> ExecutionContext {
        self.context
    }

    /// Current token, if any
    #[must_use]
    pub fn get(&self) -> Option<SessionToken> {
        if self.context.is_server() {
            return None;
        }
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }

    /// Whether a token is currently held
    #[must_use]
    pub fn is_set(&self) -> bool {
        self.get().is_some()
    }

    /// Replace the token
    pub fn set(&self, token: impl Into<SessionToken>) {
        if self.context.is_server() {
            return;
        }
        let token = token.into();

        if let Some(local) = &self.local {
            if let Err(e) = local.set_item(TOKEN_KEY, token.as_str()) {
                tracing::warn!("Could not persist session token: {e}");
            }
        }
        if let Ok(mut slot) = self.slot.lock() {
            *slot = Some(token);
        }
    }

    /// Drop the token
    pub fn clear(&self) {
        if self.context.is_server() {
            return;
        }

        if let Some(local) = &self.local {
            if let Err(e) = local.remove_item(TOKEN_KEY) {
                tracing::warn!("Could not remove persisted session token: {e}");
            }
        }
        if let Ok(mut slot) = self.slot.lock() {
            *slot = None;
        }
    }
}

// ============================================================================
// Token inspection
// ============================================================================

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or(Duration::ZERO)
        .as_secs()
}

/// Decode the payload (middle segment) of a three-segment token
///
/// Accepts the URL-safe and standard base64 alphabets, with or without
/// padding. Returns `None` unless the payload is a JSON object.
#[must_use]
pub fn token_payload(token: &str) -> Option<serde_json::Value> {
    let parts: Vec<&str> = token.split('.').collect();
    let [_, payload, _] = parts.as_slice() else {
        return None;
    };

    let trimmed = payload.trim_end_matches('=');
    let bytes = URL_SAFE_NO_PAD
        .decode(trimmed)
        .or_else(|_| STANDARD_NO_PAD.decode(trimmed))
        .ok()?;

    serde_json::from_slice::<serde_json::Value>(&bytes)
        .ok()
        .filter(serde_json::Value::is_object)
}

/// Structural validity check for a bearer token
///
/// True iff the token has three dot-separated segments, the middle one
/// decodes to a JSON object, and that object has no `exp` or an `exp`
/// (seconds since the epoch) that has not passed yet. Never fails; any
/// decode problem yields `false`.
#[must_use]
pub fn is_token_valid(token: &str) -> bool {
    is_token_valid_at(token, now_secs())
}

fn is_token_valid_at(token: &str, now: u64) -> bool {
    if token.is_empty() {
        return false;
    }
    let Some(payload) = token_payload(token) else {
        return false;
    };

    match payload.get("exp") {
        None | Some(serde_json::Value::Null) => true,
        Some(exp) => match exp.as_f64() {
            Some(exp) => exp >= now as f64,
            None => false,
        },
    }
}
