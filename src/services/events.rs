// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Event discovery and RSVP.

use std::sync::Arc;

use crate::error::{AppError, Result};
use crate::models::{Event, EventDetails, EventQuery};
use crate::services::RemoteDirectory;

pub struct EventService {
    directory: Arc<dyn RemoteDirectory>,
}

impl EventService {
    pub fn new(directory: Arc<dyn RemoteDirectory>) -> Self {
        Self { directory }
    }

    /// Events in an area, or everywhere when the query is empty.
    pub async fn discover(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let query = query.normalized();
        if query.city.is_some() && query.state.is_none() {
            return Err(AppError::validation(
                "state",
                "Choose a state to search by city",
            ));
        }

        let events = self.directory.list_events(&query).await?;
        tracing::debug!(
            state = ?query.state,
            city = ?query.city,
            count = events.len(),
            "Events listed"
        );
        Ok(events)
    }

    pub async fn details(&self, event_id: u64) -> Result<EventDetails> {
        let event = self.directory.get_event(event_id).await?;
        let attendees = self.directory.attendee_count(event_id).await?;
        Ok(EventDetails { event, attendees })
    }

    /// RSVP for `subject_id` and return the updated head count.
    ///
    /// A full event is refused locally with `Conflict`, before any RSVP is
    /// sent.
    pub async fn join(&self, subject_id: u64, event_id: u64) -> Result<EventDetails> {
        let details = self.details(event_id).await?;
        if details.is_full() {
            return Err(AppError::Conflict(format!(
                "Event {} is at full capacity",
                event_id
            )));
        }

        if let Err(e) = self.directory.join_event(subject_id, event_id).await {
            tracing::warn!(subject_id, event_id, error = %e, "Join failed");
            return Err(e);
        }
        tracing::info!(subject_id, event_id, "Joined event");

        let attendees = match self.directory.attendee_count(event_id).await {
            Ok(count) => count,
            Err(e) => {
                tracing::debug!(event_id, error = %e, "Attendee recount failed");
                details.attendees + 1
            }
        };

        Ok(EventDetails {
            event: details.event,
            attendees,
        })
    }
}
