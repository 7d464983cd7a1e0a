// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Match candidates and verdicts.

use serde::{Deserialize, Serialize};

use crate::models::profile::Location;

/// A prospective match from the candidate feed. Immutable once fetched.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchCandidate {
    #[serde(rename = "userId")]
    pub subject_id: u64,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(rename = "profile", default)]
    pub profile_snapshot: CandidateProfile,
    /// Interest tags in feed order
    #[serde(rename = "interests", default)]
    pub interest_tags: Vec<InterestTag>,
    /// Human-readable reasons the feed surfaced this candidate
    #[serde(rename = "similarities", default)]
    pub similarity_reasons: Vec<String>,
}

/// Profile fields shown on a candidate card.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateProfile {
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub photo: Option<String>,
    #[serde(default)]
    pub bio: Option<String>,
}

impl CandidateProfile {
    pub fn display_name(&self) -> String {
        [self.first_name.as_deref(), self.last_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InterestTag {
    pub id: u64,
    pub name: String,
}

/// The subject's decision on a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Verdict {
    Accept,
    Reject,
}

/// Relationship state reported by the directory after a verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectionStatus {
    Pending,
    Accepted,
    Rejected,
}

/// Directory acknowledgement of a recorded verdict.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerdictReceipt {
    #[serde(default)]
    pub message: Option<String>,
    pub status: ConnectionStatus,
    /// True when both sides accepted
    #[serde(default)]
    pub is_match: bool,
}
