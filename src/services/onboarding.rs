// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Onboarding completion.
//!
//! One logical operation, written in order:
//! 1. Profile record to the directory (authoritative; failure aborts)
//! 2. Interest associations to the directory (best-effort)
//! 3. Shadow profile to the device (replace-whole-value)
//! 4. Names into the cached session identity
//!
//! Nothing is rolled back. Every step overwrites, so re-running the whole
//! operation with the same answers converges to the same state.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{OnboardingAnswers, ProfileShadow, ProfileView};
use crate::services::RemoteDirectory;
use crate::store::{SessionCache, ShadowStore};
use crate::time_utils::Clock;

/// Which part of `complete` produced a hard failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompletionStep {
    /// Input rejected before any network call
    Validation,
    /// Authoritative profile write failed; nothing was written locally
    RemoteProfile,
}

#[derive(Debug, thiserror::Error)]
#[error("onboarding failed at {step:?}: {error}")]
pub struct CompletionFailure {
    pub step: CompletionStep,
    #[source]
    pub error: AppError,
}

pub type CompletionResult = std::result::Result<ProfileView, CompletionFailure>;

pub struct OnboardingCoordinator {
    directory: Arc<dyn RemoteDirectory>,
    cache: Arc<SessionCache>,
    shadows: ShadowStore,
    clock: Arc<dyn Clock>,
    min_age: u32,
}

impl OnboardingCoordinator {
    pub fn new(
        directory: Arc<dyn RemoteDirectory>,
        cache: Arc<SessionCache>,
        shadows: ShadowStore,
        clock: Arc<dyn Clock>,
        min_age: u32,
    ) -> Self {
        Self {
            directory,
            cache,
            shadows,
            clock,
            min_age,
        }
    }

    /// Persist completed onboarding answers for `subject_id`.
    ///
    /// Only validation and the authoritative profile write can fail. The
    /// caller keeps `answers` for resubmission.
    pub async fn complete(&self, subject_id: u64, answers: &OnboardingAnswers) -> CompletionResult {
        let answers = answers.normalized();

        let age = answers
            .check(self.clock.today(), self.min_age)
            .map_err(|error| CompletionFailure {
                step: CompletionStep::Validation,
                error,
            })?;

        // Ticket first, so an overlapping completion that writes the
        // directory later also wins the cached identity.
        let seq = self.cache.begin_write();

        // 1. Authoritative write.
        let fields = answers.profile_fields(age);
        let record = self
            .directory
            .create_profile(subject_id, &fields)
            .await
            .map_err(|error| {
                tracing::warn!(subject_id, error = %error, "Profile write failed");
                CompletionFailure {
                    step: CompletionStep::RemoteProfile,
                    error,
                }
            })?;

        tracing::info!(subject_id, age, "Profile record written");

        // 2. Best-effort interests. Not part of completeness.
        let names: Vec<String> = answers.interests.iter().cloned().collect();
        if let Err(e) = self.directory.add_interests(subject_id, &names).await {
            tracing::warn!(
                subject_id,
                count = names.len(),
                error = %e,
                "Interest sync failed, continuing"
            );
        }

        // 3. Shadow profile.
        let shadow = answers.shadow_for(subject_id);
        self.save_shadow(&shadow);

        // 4. Keep the fast-path identity in step with what was just written.
        self.refresh_identity(seq, subject_id, &answers);

        Ok(ProfileView {
            record,
            shadow: Some(shadow),
        })
    }

    /// Current merged profile view for a subject.
    ///
    /// A missing or unreadable shadow yields `shadow: None`.
    pub async fn view(&self, subject_id: u64) -> Result<ProfileView> {
        let record = self.directory.get_profile(subject_id).await?;

        let shadow = self.shadows.load(subject_id).unwrap_or_else(|e| {
            tracing::warn!(subject_id, error = %e, "Failed to read shadow profile");
            None
        });

        Ok(ProfileView { record, shadow })
    }

    fn save_shadow(&self, shadow: &ProfileShadow) {
        match self.shadows.save(shadow) {
            Ok(()) => tracing::debug!(subject_id = shadow.subject_id, "Shadow profile saved"),
            Err(e) => tracing::error!(
                subject_id = shadow.subject_id,
                error = %e,
                "Failed to save shadow profile"
            ),
        }
    }

    fn refresh_identity(&self, seq: u64, subject_id: u64, answers: &OnboardingAnswers) {
        let first_name = answers.first_name.clone();
        let last_name = answers.last_name.clone();

        match self.cache.refresh_identity(seq, subject_id, move |identity| {
            identity.first_name = Some(first_name);
            identity.last_name = Some(last_name);
        }) {
            Ok(true) => {}
            Ok(false) => tracing::debug!(subject_id, seq, "Newer identity write already landed"),
            Err(e) => tracing::warn!(subject_id, error = %e, "Failed to refresh cached identity"),
        }

        if let Err(e) = self.cache.clear_pending_names() {
            tracing::debug!(error = %e, "Failed to clear pending registration names");
        }
    }
}
