// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Typed access to the cached session.
//!
//! Identity refreshes can race: a slow resolution started before onboarding
//! finished must not clobber the names the coordinator just wrote. Every
//! writer takes a ticket from [`SessionCache::begin_write`] before its remote
//! call, and a refresh only lands if its ticket is newer than the last one
//! applied.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use super::{get_json, keys, set_json, KeyValueStore};
use crate::error::Result;
use crate::models::{DisplayIdentity, PendingNames, Session};

pub struct SessionCache {
    store: Arc<dyn KeyValueStore>,
    /// Last ticket handed out
    issued: AtomicU64,
    /// Newest ticket whose write reached the store
    applied: Mutex<u64>,
}

impl SessionCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self {
            store,
            issued: AtomicU64::new(0),
            applied: Mutex::new(0),
        }
    }

    pub fn load(&self) -> Result<Option<Session>> {
        get_json(self.store.as_ref(), keys::SESSION)
    }

    /// Issue a write ticket. Take it before starting the remote call whose
    /// result will be written.
    pub fn begin_write(&self) -> u64 {
        self.issued.fetch_add(1, Ordering::SeqCst) + 1
    }

    /// Replace the whole session (login).
    ///
    /// Supersedes every outstanding ticket.
    pub fn replace(&self, session: &Session) -> Result<()> {
        let ticket = self.begin_write();
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        set_json(self.store.as_ref(), keys::SESSION, session)?;
        *applied = (*applied).max(ticket);
        Ok(())
    }

    /// Destroy the session (logout).
    ///
    /// Supersedes every outstanding ticket.
    pub fn clear(&self) -> Result<()> {
        let ticket = self.begin_write();
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        self.store.remove(keys::SESSION)?;
        *applied = (*applied).max(ticket);
        Ok(())
    }

    /// Overwrite the cached display identity if `ticket` is still current.
    ///
    /// Returns `false` without writing when a newer write already landed, or
    /// when the cached session no longer belongs to `subject_id`.
    pub fn refresh_identity(
        &self,
        ticket: u64,
        subject_id: u64,
        update: impl FnOnce(&mut DisplayIdentity),
    ) -> Result<bool> {
        let mut applied = self.applied.lock().unwrap_or_else(PoisonError::into_inner);
        if ticket <= *applied {
            tracing::debug!(
                seq = ticket,
                applied = *applied,
                "Discarding out-of-order session write"
            );
            return Ok(false);
        }

        let Some(mut session) = self.load()? else {
            return Ok(false);
        };
        if session.subject_id != subject_id {
            return Ok(false);
        }

        update(&mut session.display_identity);
        set_json(self.store.as_ref(), keys::SESSION, &session)?;
        *applied = (*applied).max(ticket);
        Ok(true)
    }

    // ─── Pending registration names ─────────────────────────────

    pub fn stash_pending_names(&self, names: &PendingNames) -> Result<()> {
        set_json(self.store.as_ref(), keys::PENDING_REGISTRATION, names)
    }

    pub fn pending_names(&self) -> Result<Option<PendingNames>> {
        get_json(self.store.as_ref(), keys::PENDING_REGISTRATION)
    }

    pub fn clear_pending_names(&self) -> Result<()> {
        self.store.remove(keys::PENDING_REGISTRATION)
    }
}
