// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile maintenance after onboarding.

use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{InterestTag, ProfileEdit, ProfileView};
use crate::services::RemoteDirectory;
use crate::store::ShadowStore;

pub struct ProfileService {
    directory: Arc<dyn RemoteDirectory>,
    shadows: ShadowStore,
}

impl ProfileService {
    pub fn new(directory: Arc<dyn RemoteDirectory>, shadows: ShadowStore) -> Self {
        Self {
            directory,
            shadows,
        }
    }

    /// Apply an edit: directory first, then the shadow profile. The
    /// directory replaces the interest set itself when one is given.
    ///
    /// A directory failure leaves the shadow untouched. A shadow write
    /// failure is logged and the directory result still returned.
    pub async fn edit(&self, subject_id: u64, edit: &ProfileEdit) -> Result<ProfileView> {
        let edit = edit.normalized();
        if edit.is_empty() {
            return Err(AppError::validation("profile", "Nothing to update"));
        }
        edit.validate()?;

        let record = self.directory.update_profile(subject_id, &edit).await?;
        tracing::info!(subject_id, "Profile updated");

        let shadow = match self.shadows.load(subject_id) {
            Ok(Some(mut shadow)) => {
                edit.apply_to(&mut shadow);
                if let Err(e) = self.shadows.save(&shadow) {
                    tracing::error!(subject_id, error = %e, "Failed to save shadow profile");
                }
                Some(shadow)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(subject_id, error = %e, "Failed to read shadow profile");
                None
            }
        };

        Ok(ProfileView { record, shadow })
    }

    /// Interest names offered by the directory, for pickers.
    pub async fn interest_catalog(&self) -> Result<Vec<InterestTag>> {
        self.directory.list_interests().await
    }
}
