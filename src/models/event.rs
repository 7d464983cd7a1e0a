// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Group events that subjects can discover and join.

use serde::{Deserialize, Serialize};

/// An event as listed by the directory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    pub id: u64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Maximum attendees; `None` when the organizer set no limit
    #[serde(default)]
    pub capacity: Option<u64>,
    /// Free-form date string as entered by the organizer
    #[serde(default)]
    pub date: Option<String>,
    #[serde(default)]
    pub state: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub latitude: Option<String>,
    #[serde(default)]
    pub longitude: Option<String>,
    #[serde(default)]
    pub creator: Option<EventCreator>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventCreator {
    pub id: u64,
    pub email: String,
}

/// Where to look for events. Empty fields are ignored.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventQuery {
    pub state: Option<String>,
    pub city: Option<String>,
}

impl EventQuery {
    pub fn in_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            city: None,
        }
    }

    pub fn in_city(state: impl Into<String>, city: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            city: Some(city.into()),
        }
    }

    /// Trimmed, with blank fields dropped.
    pub fn normalized(&self) -> Self {
        let clean = |v: &Option<String>| {
            v.as_deref()
                .map(str::trim)
                .filter(|v| !v.is_empty())
                .map(str::to_string)
        };
        Self {
            state: clean(&self.state),
            city: clean(&self.city),
        }
    }
}

/// RSVP body for joining an event.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct JoinEventRequest {
    pub user_id: u64,
    pub event_id: u64,
    pub rsvp_status: bool,
}

/// An event plus its current head count.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EventDetails {
    pub event: Event,
    pub attendees: u64,
}

impl EventDetails {
    /// Open places, or `None` for an unlimited event.
    pub fn spots_left(&self) -> Option<u64> {
        self.event
            .capacity
            .map(|cap| cap.saturating_sub(self.attendees))
    }

    pub fn is_full(&self) -> bool {
        self.spots_left() == Some(0)
    }
}
