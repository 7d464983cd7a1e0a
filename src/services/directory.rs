// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Remote directory (profile/auth/matchmaking API) client.
//!
//! Handles:
//! - Profile fetch and create/overwrite
//! - Interest association
//! - Candidate feed and verdict recording
//! - Registration, email confirmation and login
//! - Profile edits, friends and the interest catalog
//! - Event listing and RSVP
//!
//! Responses are classified into [`AppError`] variants here and nowhere else.

use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::RwLock;
use std::time::Duration;

use crate::error::{AppError, Result};
use crate::models::{
    ConfirmRequest, Credentials, Event, EventQuery, InterestTag, JoinEventRequest, LoginResponse,
    MatchCandidate, ProfileEdit, ProfileFields, ProfileRecord, RegisterResponse, Verdict,
    VerdictReceipt,
};

/// Operations the client core consumes from the directory service.
#[async_trait]
pub trait RemoteDirectory: Send + Sync {
    /// Fetch a profile. `NotFound` when the subject never created one.
    async fn get_profile(&self, subject_id: u64) -> Result<ProfileRecord>;

    /// Create or overwrite a profile. Repeated calls overwrite.
    async fn create_profile(&self, subject_id: u64, fields: &ProfileFields)
        -> Result<ProfileRecord>;

    /// Replace the subject's interest associations with `names`.
    async fn add_interests(&self, subject_id: u64, names: &[String]) -> Result<()>;

    async fn get_candidate_feed(&self, subject_id: u64) -> Result<Vec<MatchCandidate>>;

    /// `Conflict` when the relationship was already decided.
    async fn record_verdict(
        &self,
        subject_id: u64,
        candidate_id: u64,
        verdict: Verdict,
    ) -> Result<VerdictReceipt>;

    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse>;

    async fn confirm(&self, request: &ConfirmRequest) -> Result<()>;

    async fn resend_code(&self, email: &str) -> Result<()>;

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse>;

    /// Update the editable fields of an existing profile.
    async fn update_profile(&self, subject_id: u64, edit: &ProfileEdit) -> Result<ProfileRecord>;

    /// Accepted connections, in the candidate card shape.
    async fn get_friends(&self, subject_id: u64) -> Result<Vec<MatchCandidate>>;

    /// Every interest name known to the directory.
    async fn list_interests(&self) -> Result<Vec<InterestTag>>;

    /// Events matching `query`. An area with no events is an empty list.
    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>>;

    async fn get_event(&self, event_id: u64) -> Result<Event>;

    /// RSVP yes. `Conflict` when the event is full or already joined.
    async fn join_event(&self, subject_id: u64, event_id: u64) -> Result<()>;

    async fn attendee_count(&self, event_id: u64) -> Result<u64>;

    /// Bearer token attached to subsequent requests.
    fn set_bearer_token(&self, _token: Option<String>) {}
}

/// Directory client over JSON/HTTP.
pub struct HttpDirectoryClient {
    http: reqwest::Client,
    base_url: String,
    token: RwLock<Option<String>>,
}

impl HttpDirectoryClient {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::Internal(anyhow::anyhow!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token: RwLock::new(None),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        let token = self
            .token
            .read()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .clone();
        match token {
            Some(t) => request.bearer_auth(t),
            None => request,
        }
    }

    /// Generic GET request with JSON response.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T> {
        let response = self
            .authorize(self.http.get(self.url(path)))
            .send()
            .await
            .map_err(transport_error)?;

        self.check_response_json(response).await
    }

    /// Generic POST request with JSON body and JSON response.
    async fn post_json<B: Serialize + ?Sized, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T> {
        let response = self.post(path, body).await?;
        self.check_response_json(response).await
    }

    async fn post<B: Serialize + ?Sized>(&self, path: &str, body: &B) -> Result<reqwest::Response> {
        self.authorize(self.http.post(self.url(path)))
            .json(body)
            .send()
            .await
            .map_err(transport_error)
    }

    /// Check response status and return error if not successful.
    async fn check_response(&self, response: reqwest::Response) -> Result<reqwest::Response> {
        if response.status().is_success() {
            return Ok(response);
        }

        let status = response.status();
        let body = response.text().await.unwrap_or_default();
        Err(classify_status(status, &body))
    }

    /// Check response and parse JSON body.
    async fn check_response_json<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        let response = self.check_response(response).await?;
        response
            .json()
            .await
            .map_err(|e| AppError::Transient(format!("JSON parse error: {}", e)))
    }
}

#[async_trait]
impl RemoteDirectory for HttpDirectoryClient {
    async fn get_profile(&self, subject_id: u64) -> Result<ProfileRecord> {
        self.get_json(&format!("/fetchProfile/{}", subject_id)).await
    }

    async fn create_profile(
        &self,
        subject_id: u64,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord> {
        self.post_json(&format!("/saveProfile/{}", subject_id), fields)
            .await
    }

    async fn add_interests(&self, subject_id: u64, names: &[String]) -> Result<()> {
        let response = self
            .post(&format!("/addInterestsToUser/{}", subject_id), names)
            .await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn get_candidate_feed(&self, subject_id: u64) -> Result<Vec<MatchCandidate>> {
        self.get_json(&format!("/matchmaking/potential-matches/{}", subject_id))
            .await
    }

    async fn record_verdict(
        &self,
        subject_id: u64,
        candidate_id: u64,
        verdict: Verdict,
    ) -> Result<VerdictReceipt> {
        let path = match verdict {
            Verdict::Accept => "/matchmaking/send-friend-request",
            Verdict::Reject => "/matchmaking/reject-friend-request",
        };
        let body = serde_json::json!({
            "requesterId": subject_id,
            "receiverId": candidate_id,
        });

        let response = self.post(path, &body).await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // A rejected relationship is reported as 400 with status REJECTED.
            let text = response.text().await.unwrap_or_default();
            return Err(classify_verdict_rejection(&text)
                .unwrap_or_else(|| classify_status(status, &text)));
        }

        self.check_response_json(response).await
    }

    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse> {
        self.post_json("/auth/register", credentials).await
    }

    async fn confirm(&self, request: &ConfirmRequest) -> Result<()> {
        let response = self.post("/auth/confirm", request).await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn resend_code(&self, email: &str) -> Result<()> {
        let body = serde_json::json!({ "email": email });
        let response = self.post("/auth/resend-code", &body).await?;
        self.check_response(response).await?;
        Ok(())
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.post_json("/auth/login", credentials).await
    }

    async fn update_profile(&self, subject_id: u64, edit: &ProfileEdit) -> Result<ProfileRecord> {
        #[derive(serde::Deserialize)]
        struct Updated {
            profile: ProfileRecord,
        }

        let response = self
            .authorize(
                self.http
                    .put(self.url(&format!("/updateProfileEditable/{}", subject_id))),
            )
            .json(edit)
            .send()
            .await
            .map_err(transport_error)?;
        let updated: Updated = self.check_response_json(response).await?;
        Ok(updated.profile)
    }

    async fn get_friends(&self, subject_id: u64) -> Result<Vec<MatchCandidate>> {
        self.get_json(&format!("/matchmaking/friends/{}", subject_id))
            .await
    }

    async fn list_interests(&self) -> Result<Vec<InterestTag>> {
        self.get_json("/getAllInterests").await
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        let path = match (&query.state, &query.city) {
            (Some(state), Some(city)) => format!(
                "/getEventByStateCity/{}/{}",
                urlencoding::encode(state),
                urlencoding::encode(city)
            ),
            (Some(state), None) => format!("/getEventByState/{}", urlencoding::encode(state)),
            (None, _) => "/getAllEvents".to_string(),
        };

        // The area lookups answer 404 when nothing is scheduled there.
        match self.get_json::<Vec<Event>>(&path).await {
            Err(AppError::NotFound(_)) if query.state.is_some() => Ok(Vec::new()),
            other => other,
        }
    }

    async fn get_event(&self, event_id: u64) -> Result<Event> {
        self.get_json(&format!("/getEventById/{}", event_id)).await
    }

    async fn join_event(&self, subject_id: u64, event_id: u64) -> Result<()> {
        let body = JoinEventRequest {
            user_id: subject_id,
            event_id,
            rsvp_status: true,
        };

        let response = self.post("/JoinUserEvent", &body).await?;
        let status = response.status();
        if status == StatusCode::BAD_REQUEST {
            // Full and already-joined are both reported as a bare 400.
            let text = response.text().await.unwrap_or_default();
            let message = error_message(&text)
                .unwrap_or_else(|| "Event is at full capacity or already joined".to_string());
            return Err(AppError::Conflict(message));
        }

        self.check_response(response).await?;
        Ok(())
    }

    async fn attendee_count(&self, event_id: u64) -> Result<u64> {
        self.get_json(&format!("/getAttendees/{}", event_id)).await
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self
            .token
            .write()
            .unwrap_or_else(std::sync::PoisonError::into_inner) = token;
    }
}

fn transport_error(err: reqwest::Error) -> AppError {
    if err.is_timeout() {
        AppError::Transient(format!("request timed out: {}", err))
    } else {
        AppError::Transient(err.to_string())
    }
}

/// Map a non-success status to the error taxonomy.
pub(crate) fn classify_status(status: StatusCode, body: &str) -> AppError {
    let message = error_message(body).unwrap_or_else(|| format!("HTTP {}", status));

    match status.as_u16() {
        404 => AppError::NotFound(message),
        400 | 422 => AppError::validation("request", message),
        409 => AppError::Conflict(message),
        401 | 403 => AppError::Unauthorized(message),
        429 => {
            tracing::warn!("Directory rate limit hit (429)");
            AppError::Transient(message)
        }
        _ => AppError::Transient(format!("HTTP {}: {}", status, message)),
    }
}

fn classify_verdict_rejection(body: &str) -> Option<AppError> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    if value.get("status")?.as_str()? == "REJECTED" {
        let message = error_message(body).unwrap_or_else(|| "already rejected".to_string());
        return Some(AppError::Conflict(message));
    }
    None
}

/// Pull a human-readable message out of an error body.
fn error_message(body: &str) -> Option<String> {
    let value: serde_json::Value = serde_json::from_str(body).ok()?;
    ["error", "message"]
        .iter()
        .find_map(|k| value.get(*k).and_then(|v| v.as_str()))
        .map(str::to_string)
}
