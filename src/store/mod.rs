//! On-device storage layer.
//!
//! Everything persisted locally goes through an injected [`KeyValueStore`],
//! so tests can swap in [`MemoryStore`] and nothing reaches for a global.

pub mod file;
pub mod memory;
pub mod session_cache;
pub mod shadow;

pub use file::FileStore;
pub use memory::MemoryStore;
pub use session_cache::SessionCache;
pub use shadow::ShadowStore;

use crate::error::Result;
use serde::{de::DeserializeOwned, Serialize};

/// Storage key names as constants.
pub mod keys {
    pub const SESSION: &str = "session";
    pub const PENDING_REGISTRATION: &str = "pendingRegistration";
    pub const PROFILE_SHADOW_PREFIX: &str = "profileShadow:";

    /// Shadow profile key for a subject
    pub fn profile_shadow(subject_id: u64) -> String {
        format!("{}{}", PROFILE_SHADOW_PREFIX, subject_id)
    }
}

/// Durable string key/value store with browser-storage semantics.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<()>;
}

/// Read and decode a JSON value.
pub fn get_json<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Result<Option<T>> {
    match store.get(key)? {
        Some(raw) => Ok(Some(serde_json::from_str(&raw)?)),
        None => Ok(None),
    }
}

/// Encode and write a JSON value, replacing whatever was there.
pub fn set_json<T: Serialize>(store: &dyn KeyValueStore, key: &str, value: &T) -> Result<()> {
    let raw = serde_json::to_string(value)?;
    store.set(key, &raw)
}
