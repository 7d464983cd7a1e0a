// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Candidate queue controller for the discovery surface.
//!
//! The queue lock is never held across a directory call, so a slow verdict
//! does not block cursor movement or reads.

use std::collections::HashSet;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::error::{AppError, Result};
use crate::models::{Direction, MatchCandidate, MatchQueue, Verdict};
use crate::services::RemoteDirectory;

/// Result of a recorded verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecisionOutcome {
    pub candidate_id: u64,
    pub verdict: Verdict,
    /// Both sides accepted
    pub is_match: bool,
    /// Directory reported the relationship as already decided
    pub already_recorded: bool,
    /// Candidates left in the queue
    pub remaining: usize,
}

#[derive(Default)]
struct QueueState {
    subject_id: Option<u64>,
    queue: MatchQueue,
    /// Candidates decided during this session
    decided: HashSet<u64>,
}

pub struct MatchQueueController {
    directory: Arc<dyn RemoteDirectory>,
    state: Mutex<QueueState>,
}

impl MatchQueueController {
    pub fn new(directory: Arc<dyn RemoteDirectory>) -> Self {
        Self {
            directory,
            state: Mutex::new(QueueState::default()),
        }
    }

    fn state(&self) -> MutexGuard<'_, QueueState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fetch the candidate feed and reset the queue with the cursor at 0.
    ///
    /// Feed order is kept. Candidates already decided in this session are
    /// dropped even if the feed still returns them.
    pub async fn load(&self, subject_id: u64) -> Result<usize> {
        let feed = self.directory.get_candidate_feed(subject_id).await?;
        let fetched = feed.len();

        let mut state = self.state();
        if state.subject_id != Some(subject_id) {
            state.decided.clear();
        }

        let decided = &state.decided;
        let candidates: Vec<MatchCandidate> = feed
            .into_iter()
            .filter(|c| c.subject_id != subject_id && !decided.contains(&c.subject_id))
            .collect();

        let len = candidates.len();
        state.queue = MatchQueue::new(candidates);
        state.subject_id = Some(subject_id);

        tracing::info!(subject_id, fetched, queued = len, "Candidate queue loaded");
        Ok(len)
    }

    /// Move the cursor one step. Never fails; no-op at either end.
    pub fn advance(&self, direction: Direction) -> usize {
        self.state().queue.advance(direction)
    }

    /// Record a verdict, then drop the candidate from the queue.
    ///
    /// If the directory call fails the queue and cursor are left untouched
    /// and the error is returned for a retry. `Conflict` means the verdict
    /// was already recorded and counts as success. A candidate decided
    /// earlier in this session is reported as already recorded without a
    /// directory call.
    pub async fn decide(&self, candidate_id: u64, verdict: Verdict) -> Result<DecisionOutcome> {
        let subject_id = {
            let state = self.state();
            let subject_id = state
                .subject_id
                .ok_or_else(|| AppError::NotFound("no candidate queue loaded".to_string()))?;
            if state.decided.contains(&candidate_id) {
                tracing::debug!(subject_id, candidate_id, "Candidate already decided");
                return Ok(DecisionOutcome {
                    candidate_id,
                    verdict,
                    is_match: false,
                    already_recorded: true,
                    remaining: state.queue.len(),
                });
            }
            if !state.queue.contains(candidate_id) {
                return Err(AppError::NotFound(format!(
                    "Candidate {} not in queue",
                    candidate_id
                )));
            }
            subject_id
        };

        let (is_match, already_recorded) = match self
            .directory
            .record_verdict(subject_id, candidate_id, verdict)
            .await
        {
            Ok(receipt) => (receipt.is_match, false),
            Err(AppError::Conflict(msg)) => {
                tracing::info!(
                    subject_id,
                    candidate_id,
                    reason = %msg,
                    "Verdict already recorded"
                );
                (false, true)
            }
            Err(e) => {
                tracing::warn!(
                    subject_id,
                    candidate_id,
                    ?verdict,
                    error = %e,
                    "Verdict failed, candidate kept"
                );
                return Err(e);
            }
        };

        let mut state = self.state();
        state.queue.remove(candidate_id);
        state.decided.insert(candidate_id);
        let remaining = state.queue.len();

        tracing::info!(
            subject_id,
            candidate_id,
            ?verdict,
            is_match,
            remaining,
            "Candidate decided"
        );

        Ok(DecisionOutcome {
            candidate_id,
            verdict,
            is_match,
            already_recorded,
            remaining,
        })
    }

    /// Accepted connections of `subject_id`. Does not touch the queue.
    pub async fn friends(&self, subject_id: u64) -> Result<Vec<MatchCandidate>> {
        let friends = self.directory.get_friends(subject_id).await?;
        tracing::debug!(subject_id, count = friends.len(), "Friends loaded");
        Ok(friends)
    }

    pub fn current(&self) -> Option<MatchCandidate> {
        self.state().queue.current().cloned()
    }

    /// Copy of the queue for rendering.
    pub fn snapshot(&self) -> MatchQueue {
        self.state().queue.clone()
    }

    /// Discard the queue and decided set (session end).
    pub fn reset(&self) {
        *self.state() = QueueState::default();
    }
}
