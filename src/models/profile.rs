// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Profile models: the remote record and the on-device shadow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use validator::Validate;

use super::session::is_present;

/// Authoritative profile subset held by the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileRecord {
    /// Same as the owning user's ID
    #[serde(rename = "id")]
    pub subject_id: u64,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub age: Option<u32>,
    #[serde(default, rename = "photo")]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub location: Option<Location>,
}

impl ProfileRecord {
    /// The completeness predicate: first and last name both non-empty.
    ///
    /// This is the only onboarding signal the lifecycle trusts. Shadow
    /// presence, age, or interests never count.
    pub fn is_complete(&self) -> bool {
        is_present(&self.first_name) && is_present(&self.last_name)
    }
}

/// Location attached to a profile.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub id: Option<u64>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
}

/// Body of a profile create/overwrite request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub first_name: String,
    pub last_name: String,
    pub age: u32,
    #[serde(rename = "photo")]
    pub photo_url: Option<String>,
}

/// Preferred way of travelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelStyle {
    Solo,
    Group,
    Mixed,
    Flexible,
}

/// Onboarding answers the directory schema cannot hold yet.
///
/// Stored at: `profileShadow:{subject_id}`
///
/// Supplementary only. It may be missing or stale even for a fully
/// onboarded subject, so it never gates the lifecycle.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileShadow {
    pub subject_id: u64,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub languages: BTreeSet<String>,
    #[serde(default)]
    pub interests: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<TravelStyle>,
    #[serde(default)]
    pub preferred_activity_types: BTreeSet<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bio: Option<String>,
}

/// Remote record merged with whatever shadow the device holds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub record: ProfileRecord,
    pub shadow: Option<ProfileShadow>,
}

impl ProfileView {
    pub fn is_complete(&self) -> bool {
        self.record.is_complete()
    }
}

/// Post-onboarding changes to the editable profile fields.
///
/// Names and age are fixed once onboarding completes. `None` leaves a field
/// alone; an empty bio or photo clears it.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ProfileEdit {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
    #[serde(rename = "photo", skip_serializing_if = "Option::is_none")]
    pub photo_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub travel_style: Option<TravelStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please select at least one language"))]
    pub languages: Option<BTreeSet<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[validate(length(min = 1, message = "Please select at least one interest"))]
    pub interests: Option<BTreeSet<String>>,
}

impl ProfileEdit {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Trim free text and set entries, dropping blank entries.
    pub fn normalized(&self) -> Self {
        let trim = |v: &Option<String>| v.as_deref().map(|s| s.trim().to_string());
        let clean = |v: &Option<BTreeSet<String>>| {
            v.as_ref().map(|set| {
                set.iter()
                    .map(|s| s.trim())
                    .filter(|s| !s.is_empty())
                    .map(str::to_string)
                    .collect()
            })
        };
        Self {
            bio: trim(&self.bio),
            photo_url: trim(&self.photo_url),
            travel_style: self.travel_style,
            languages: clean(&self.languages),
            interests: clean(&self.interests),
        }
    }

    /// Copy the edited shadow fields onto `shadow`.
    pub fn apply_to(&self, shadow: &mut ProfileShadow) {
        if let Some(bio) = &self.bio {
            shadow.bio = Some(bio.clone()).filter(|b| !b.is_empty());
        }
        if let Some(style) = self.travel_style {
            shadow.travel_style = Some(style);
        }
        if let Some(languages) = &self.languages {
            shadow.languages = languages.clone();
        }
        if let Some(interests) = &self.interests {
            shadow.interests = interests.clone();
        }
    }
}
