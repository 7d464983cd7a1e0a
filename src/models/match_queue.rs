// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Ordered queue of pending candidates with a cursor.
//!
//! Invariant: `cursor < len()` whenever the queue is non-empty, and
//! `cursor == 0` when it is empty.

use serde::Serialize;

use crate::models::candidate::MatchCandidate;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Forward,
    Back,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MatchQueue {
    candidates: Vec<MatchCandidate>,
    cursor: usize,
}

impl MatchQueue {
    /// Build a queue in feed order with the cursor at the front.
    pub fn new(candidates: Vec<MatchCandidate>) -> Self {
        Self {
            candidates,
            cursor: 0,
        }
    }

    pub fn len(&self) -> usize {
        self.candidates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn candidates(&self) -> &[MatchCandidate] {
        &self.candidates
    }

    pub fn current(&self) -> Option<&MatchCandidate> {
        self.candidates.get(self.cursor)
    }

    pub fn contains(&self, candidate_id: u64) -> bool {
        self.position(candidate_id).is_some()
    }

    fn position(&self, candidate_id: u64) -> Option<usize> {
        self.candidates
            .iter()
            .position(|c| c.subject_id == candidate_id)
    }

    /// Move the cursor one step, clamped to the queue bounds.
    ///
    /// No-op at either end and on an empty queue. Returns the new cursor.
    pub fn advance(&mut self, direction: Direction) -> usize {
        match direction {
            Direction::Forward if self.cursor + 1 < self.candidates.len() => self.cursor += 1,
            Direction::Back if self.cursor > 0 => self.cursor -= 1,
            _ => {}
        }
        self.cursor
    }

    /// Remove a candidate by ID and repair the cursor.
    ///
    /// The cursor index is kept where it was unless it now points past the
    /// end, in which case it is clamped to the last element (or 0 when empty).
    pub fn remove(&mut self, candidate_id: u64) -> Option<MatchCandidate> {
        let index = self.position(candidate_id)?;
        let removed = self.candidates.remove(index);

        if self.candidates.is_empty() {
            self.cursor = 0;
        } else if index <= self.cursor && self.cursor >= self.candidates.len() {
            self.cursor = self.candidates.len() - 1;
        }

        Some(removed)
    }
}
