//! Local-only profile extension store.

use std::sync::Arc;

use super::{get_json, keys, set_json, KeyValueStore};
use crate::error::Result;
use crate::models::ProfileShadow;

#[derive(Clone)]
pub struct ShadowStore {
    store: Arc<dyn KeyValueStore>,
}

impl ShadowStore {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self { store }
    }

    pub fn load(&self, subject_id: u64) -> Result<Option<ProfileShadow>> {
        get_json(self.store.as_ref(), &keys::profile_shadow(subject_id))
    }

    /// Write the shadow for its subject, replacing any previous value.
    pub fn save(&self, shadow: &ProfileShadow) -> Result<()> {
        set_json(
            self.store.as_ref(),
            &keys::profile_shadow(shadow.subject_id),
            shadow,
        )
    }

    pub fn remove(&self, subject_id: u64) -> Result<()> {
        self.store.remove(&keys::profile_shadow(subject_id))
    }
}
