// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Lifecycle stage resolution.
//!
//! Decides from the cached session plus the remote profile whether the user
//! is anonymous, signed in but not onboarded, or fully onboarded:
//! 1. No cached token → `Anonymous` (no remote call)
//! 2. Remote profile missing → `AuthenticatedIncomplete`
//! 3. Remote profile present → completeness predicate decides
//!
//! Any other remote failure is returned to the caller. It is never coerced
//! to a stage: defaulting to `Anonymous` would force a re-login, and
//! defaulting to either authenticated stage could skip or re-prompt
//! onboarding.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{LifecycleStage, ProfileRecord, Session};
use crate::services::RemoteDirectory;
use crate::store::SessionCache;

#[derive(Clone)]
pub struct SessionResolver {
    cache: Arc<SessionCache>,
    directory: Arc<dyn RemoteDirectory>,
}

impl SessionResolver {
    pub fn new(cache: Arc<SessionCache>, directory: Arc<dyn RemoteDirectory>) -> Self {
        Self { cache, directory }
    }

    /// Resolve the current lifecycle stage.
    ///
    /// Results are a snapshot. Re-resolve after any mutating action.
    pub async fn resolve(&self) -> Result<LifecycleStage> {
        let Some(session) = self.cache.load()? else {
            tracing::debug!("No cached session");
            return Ok(LifecycleStage::Anonymous);
        };

        let seq = self.cache.begin_write();
        let subject_id = session.subject_id;

        let record = match self.directory.get_profile(subject_id).await {
            Ok(record) => record,
            Err(AppError::NotFound(_)) => {
                tracing::info!(subject_id, seq, "No profile yet, onboarding required");
                return Ok(LifecycleStage::AuthenticatedIncomplete);
            }
            Err(e) => {
                tracing::warn!(subject_id, seq, error = %e, "Profile lookup failed");
                return Err(e);
            }
        };

        if !record.is_complete() {
            tracing::info!(subject_id, seq, "Profile incomplete");
            return Ok(LifecycleStage::AuthenticatedIncomplete);
        }

        if !session.display_identity.has_full_name() {
            self.refresh_identity(seq, &session, &record);
        }

        tracing::debug!(subject_id, seq, stage = ?LifecycleStage::AuthenticatedComplete, "Resolved");
        Ok(LifecycleStage::AuthenticatedComplete)
    }

    /// Incomplete → complete transition: copy names into the cached identity.
    ///
    /// Local write failures are logged; the stage is already decided.
    fn refresh_identity(&self, seq: u64, session: &Session, record: &ProfileRecord) {
        let first_name = record.first_name.clone();
        let last_name = record.last_name.clone();

        match self
            .cache
            .refresh_identity(seq, session.subject_id, move |identity| {
                identity.first_name = first_name;
                identity.last_name = last_name;
            }) {
            Ok(true) => {
                tracing::info!(subject_id = session.subject_id, seq, "Session identity refreshed")
            }
            Ok(false) => {}
            Err(e) => tracing::warn!(
                subject_id = session.subject_id,
                error = %e,
                "Failed to refresh cached identity"
            ),
        }
    }
}
