// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Answers collected by the onboarding flow.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::profile::{ProfileFields, ProfileShadow, TravelStyle};
use crate::time_utils::age_on;

/// Everything the subject entered during onboarding.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct OnboardingAnswers {
    #[validate(length(min = 1, max = 64, message = "First name must be 1-64 characters"))]
    pub first_name: String,
    #[validate(length(min = 1, max = 64, message = "Last name must be 1-64 characters"))]
    pub last_name: String,
    pub date_of_birth: NaiveDate,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[validate(length(min = 1, message = "Please select at least one language"))]
    pub languages: BTreeSet<String>,
    #[validate(length(min = 1, message = "Please select at least one interest"))]
    pub interests: BTreeSet<String>,
    #[serde(default)]
    pub travel_style: Option<TravelStyle>,
    #[validate(length(min = 1, message = "Please select at least one preferred activity type"))]
    pub preferred_activity_types: BTreeSet<String>,
    #[serde(default)]
    #[validate(length(max = 500, message = "Bio must be at most 500 characters"))]
    pub bio: Option<String>,
}

impl OnboardingAnswers {
    /// Trim free text and drop blank entries.
    pub fn normalized(&self) -> Self {
        Self {
            first_name: self.first_name.trim().to_string(),
            last_name: self.last_name.trim().to_string(),
            date_of_birth: self.date_of_birth,
            photo_url: non_blank(self.photo_url.as_deref()),
            languages: clean_set(&self.languages),
            interests: clean_set(&self.interests),
            travel_style: self.travel_style,
            preferred_activity_types: clean_set(&self.preferred_activity_types),
            bio: non_blank(self.bio.as_deref()),
        }
    }

    /// Validate every precondition and return the subject's age.
    ///
    /// Call on normalized answers. No side effects.
    pub fn check(&self, today: NaiveDate, min_age: u32) -> Result<u32> {
        self.validate()?;

        let age = age_on(self.date_of_birth, today);
        if i64::from(age) < i64::from(min_age) {
            return Err(AppError::validation(
                "dateOfBirth",
                format!(
                    "You must be at least {} years old to use this platform",
                    min_age
                ),
            ));
        }

        Ok(age as u32)
    }

    pub fn profile_fields(&self, age: u32) -> ProfileFields {
        ProfileFields {
            first_name: self.first_name.clone(),
            last_name: self.last_name.clone(),
            age,
            photo_url: self.photo_url.clone(),
        }
    }

    pub fn shadow_for(&self, subject_id: u64) -> ProfileShadow {
        ProfileShadow {
            subject_id,
            date_of_birth: self.date_of_birth,
            languages: self.languages.clone(),
            interests: self.interests.clone(),
            travel_style: self.travel_style,
            preferred_activity_types: self.preferred_activity_types.clone(),
            bio: self.bio.clone(),
        }
    }
}

fn non_blank(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn clean_set(values: &BTreeSet<String>) -> BTreeSet<String> {
    values
        .iter()
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .collect()
}
