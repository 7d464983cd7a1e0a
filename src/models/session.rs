// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Authenticated session held on the device.

use serde::{Deserialize, Serialize};

/// Current auth token plus a denormalized view of who is signed in.
///
/// Stored whole under the `session` key. Never partially updated: readers
/// load, modify, and write the entire value back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Directory user ID
    pub subject_id: u64,
    /// Opaque bearer token from login
    pub primary_token: String,
    pub display_identity: DisplayIdentity,
}

/// Name and email shown in the app chrome.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DisplayIdentity {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
}

impl DisplayIdentity {
    /// True when both names are present and non-empty.
    pub fn has_full_name(&self) -> bool {
        is_present(&self.first_name) && is_present(&self.last_name)
    }
}

/// Where a user is in the registration/onboarding lifecycle.
///
/// Recomputed on every protected-route entry; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LifecycleStage {
    Anonymous,
    AuthenticatedIncomplete,
    AuthenticatedComplete,
}

impl LifecycleStage {
    pub fn is_authenticated(self) -> bool {
        !matches!(self, LifecycleStage::Anonymous)
    }
}

pub(crate) fn is_present(value: &Option<String>) -> bool {
    value.as_deref().is_some_and(|v| !v.is_empty())
}
