// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::NaiveDate;
use std::collections::{HashMap, HashSet, VecDeque};
use std::sync::{Arc, Mutex};
use tokio::sync::Notify;

use urbane_client::config::Config;
use urbane_client::error::{AppError, Result};
use urbane_client::models::{
    CandidateProfile, ConfirmRequest, ConnectionStatus, Credentials, DisplayIdentity, Event,
    EventQuery, InterestTag, LoginResponse, LoginUser, MatchCandidate, OnboardingAnswers,
    ProfileEdit, ProfileFields, ProfileRecord, RegisterResponse, Session, TravelStyle, Verdict,
    VerdictReceipt,
};
use urbane_client::services::RemoteDirectory;
use urbane_client::store::{KeyValueStore, MemoryStore};
use urbane_client::time_utils::FixedClock;
use urbane_client::ClientState;

/// Verification code the fake accepts.
#[allow(dead_code)]
pub const VALID_CODE: &str = "123456";

/// Scripted failure for the next call of an operation.
#[allow(dead_code)]
#[derive(Debug, Clone, Copy)]
pub enum Failure {
    Transient,
    NotFound,
    Conflict,
    Unauthorized,
}

impl Failure {
    fn into_error(self, op: &str) -> AppError {
        match self {
            Failure::Transient => AppError::Transient(format!("{} unavailable", op)),
            Failure::NotFound => AppError::NotFound(op.to_string()),
            Failure::Conflict => AppError::Conflict(format!("{} already recorded", op)),
            Failure::Unauthorized => AppError::Unauthorized(op.to_string()),
        }
    }
}

/// Pauses one call of an operation until released.
#[derive(Default)]
#[allow(dead_code)]
pub struct CallGate {
    pub entered: Notify,
    pub release: Notify,
}

struct Account {
    password: String,
    subject_id: u64,
    confirmed: bool,
}

/// In-memory directory with scripted failures and a call log.
#[derive(Default)]
#[allow(dead_code)]
pub struct FakeDirectory {
    profiles: Mutex<HashMap<u64, ProfileRecord>>,
    interests: Mutex<HashMap<u64, Vec<String>>>,
    feed: Mutex<Vec<MatchCandidate>>,
    /// Candidates who already accepted the subject
    admirers: Mutex<HashSet<u64>>,
    verdicts: Mutex<Vec<(u64, u64, Verdict)>>,
    accounts: Mutex<HashMap<String, Account>>,
    failures: Mutex<HashMap<&'static str, VecDeque<Failure>>>,
    calls: Mutex<Vec<&'static str>>,
    token: Mutex<Option<String>>,
    gates: Mutex<HashMap<&'static str, Arc<CallGate>>>,
    events: Mutex<Vec<Event>>,
    attendees: Mutex<HashMap<u64, HashSet<u64>>>,
    friends: Mutex<Vec<MatchCandidate>>,
    catalog: Mutex<Vec<InterestTag>>,
}

#[allow(dead_code)]
impl FakeDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn put_profile(&self, record: ProfileRecord) {
        self.profiles.lock().unwrap().insert(record.subject_id, record);
    }

    pub fn profile(&self, subject_id: u64) -> Option<ProfileRecord> {
        self.profiles.lock().unwrap().get(&subject_id).cloned()
    }

    pub fn profile_count(&self) -> usize {
        self.profiles.lock().unwrap().len()
    }

    pub fn interests_of(&self, subject_id: u64) -> Vec<String> {
        self.interests
            .lock()
            .unwrap()
            .get(&subject_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_feed(&self, candidates: Vec<MatchCandidate>) {
        *self.feed.lock().unwrap() = candidates;
    }

    /// Make `candidate_id` have accepted already, so an accept is a match.
    pub fn add_admirer(&self, candidate_id: u64) {
        self.admirers.lock().unwrap().insert(candidate_id);
    }

    pub fn verdicts(&self) -> Vec<(u64, u64, Verdict)> {
        self.verdicts.lock().unwrap().clone()
    }

    pub fn add_account(&self, email: &str, password: &str, subject_id: u64) {
        self.accounts.lock().unwrap().insert(
            email.to_string(),
            Account {
                password: password.to_string(),
                subject_id,
                confirmed: true,
            },
        );
    }

    pub fn put_event(&self, event: Event) {
        self.events.lock().unwrap().push(event);
    }

    pub fn attendees_of(&self, event_id: u64) -> HashSet<u64> {
        self.attendees
            .lock()
            .unwrap()
            .get(&event_id)
            .cloned()
            .unwrap_or_default()
    }

    pub fn set_friends(&self, friends: Vec<MatchCandidate>) {
        *self.friends.lock().unwrap() = friends;
    }

    pub fn set_catalog(&self, names: &[&str]) {
        *self.catalog.lock().unwrap() = names
            .iter()
            .enumerate()
            .map(|(i, name)| InterestTag {
                id: i as u64 + 1,
                name: name.to_string(),
            })
            .collect();
    }

    /// Fail the next call of `op` with `failure`. Calls queue up.
    pub fn fail_next(&self, op: &'static str, failure: Failure) {
        self.failures
            .lock()
            .unwrap()
            .entry(op)
            .or_default()
            .push_back(failure);
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.calls.lock().unwrap().clone()
    }

    pub fn call_count(&self, op: &str) -> usize {
        self.calls.lock().unwrap().iter().filter(|c| **c == op).count()
    }

    pub fn bearer_token(&self) -> Option<String> {
        self.token.lock().unwrap().clone()
    }

    /// Hold the next call of `op` until the gate is released. `get_profile`
    /// pauses after reading the record, so it returns what it saw on entry.
    pub fn hold_next(&self, op: &'static str) -> Arc<CallGate> {
        let gate = Arc::new(CallGate::default());
        self.gates.lock().unwrap().insert(op, gate.clone());
        gate
    }

    async fn pause(&self, op: &'static str) {
        let gate = self.gates.lock().unwrap().remove(op);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }
    }

    fn enter(&self, op: &'static str) -> Result<()> {
        self.calls.lock().unwrap().push(op);
        let next = self
            .failures
            .lock()
            .unwrap()
            .get_mut(op)
            .and_then(VecDeque::pop_front);
        match next {
            Some(failure) => Err(failure.into_error(op)),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RemoteDirectory for FakeDirectory {
    async fn get_profile(&self, subject_id: u64) -> Result<ProfileRecord> {
        self.enter("get_profile")?;
        let record = self
            .profile(subject_id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {}", subject_id)));

        self.pause("get_profile").await;
        record
    }

    async fn create_profile(
        &self,
        subject_id: u64,
        fields: &ProfileFields,
    ) -> Result<ProfileRecord> {
        self.enter("create_profile")?;
        let mut profiles = self.profiles.lock().unwrap();
        let location = profiles.get(&subject_id).and_then(|p| p.location.clone());
        let record = ProfileRecord {
            subject_id,
            first_name: Some(fields.first_name.clone()),
            last_name: Some(fields.last_name.clone()),
            age: Some(fields.age),
            photo_url: fields.photo_url.clone(),
            location,
        };
        profiles.insert(subject_id, record.clone());
        Ok(record)
    }

    async fn add_interests(&self, subject_id: u64, names: &[String]) -> Result<()> {
        self.enter("add_interests")?;
        self.pause("add_interests").await;
        self.interests
            .lock()
            .unwrap()
            .insert(subject_id, names.to_vec());
        Ok(())
    }

    async fn get_candidate_feed(&self, _subject_id: u64) -> Result<Vec<MatchCandidate>> {
        self.enter("get_candidate_feed")?;
        Ok(self.feed.lock().unwrap().clone())
    }

    async fn record_verdict(
        &self,
        subject_id: u64,
        candidate_id: u64,
        verdict: Verdict,
    ) -> Result<VerdictReceipt> {
        self.enter("record_verdict")?;
        self.verdicts
            .lock()
            .unwrap()
            .push((subject_id, candidate_id, verdict));

        let admired = self.admirers.lock().unwrap().contains(&candidate_id);
        Ok(match verdict {
            Verdict::Accept if admired => VerdictReceipt {
                message: Some("It's a match!".to_string()),
                status: ConnectionStatus::Accepted,
                is_match: true,
            },
            Verdict::Accept => VerdictReceipt {
                message: Some("Friend request sent".to_string()),
                status: ConnectionStatus::Pending,
                is_match: false,
            },
            Verdict::Reject => VerdictReceipt {
                message: Some("Friend request rejected".to_string()),
                status: ConnectionStatus::Rejected,
                is_match: false,
            },
        })
    }

    async fn register(&self, credentials: &Credentials) -> Result<RegisterResponse> {
        self.enter("register")?;
        let mut accounts = self.accounts.lock().unwrap();
        if accounts.contains_key(&credentials.email) {
            return Err(AppError::validation("request", "Email already registered"));
        }
        let subject_id = 100 + accounts.len() as u64;
        accounts.insert(
            credentials.email.clone(),
            Account {
                password: credentials.password.clone(),
                subject_id,
                confirmed: false,
            },
        );
        Ok(RegisterResponse {
            message: Some("Verification code sent".to_string()),
            user_sub: Some(format!("sub-{}", subject_id)),
            email: credentials.email.clone(),
        })
    }

    async fn confirm(&self, request: &ConfirmRequest) -> Result<()> {
        self.enter("confirm")?;
        let mut accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get_mut(&request.email)
            .ok_or_else(|| AppError::NotFound(request.email.clone()))?;
        if request.confirmation_code != VALID_CODE {
            return Err(AppError::validation("request", "Invalid verification code"));
        }
        account.confirmed = true;
        Ok(())
    }

    async fn resend_code(&self, _email: &str) -> Result<()> {
        self.enter("resend_code")
    }

    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse> {
        self.enter("login")?;
        let accounts = self.accounts.lock().unwrap();
        let account = accounts
            .get(&credentials.email)
            .filter(|a| a.password == credentials.password)
            .ok_or_else(|| AppError::Unauthorized("Incorrect email or password".to_string()))?;
        if !account.confirmed {
            return Err(AppError::Unauthorized("User is not confirmed".to_string()));
        }
        Ok(LoginResponse {
            access_token: format!("access-{}", account.subject_id),
            id_token: Some("id".to_string()),
            refresh_token: Some("refresh".to_string()),
            user: LoginUser {
                id: account.subject_id,
                email: credentials.email.clone(),
            },
        })
    }

    async fn update_profile(&self, subject_id: u64, edit: &ProfileEdit) -> Result<ProfileRecord> {
        self.enter("update_profile")?;
        let mut profiles = self.profiles.lock().unwrap();
        let record = profiles
            .get_mut(&subject_id)
            .ok_or_else(|| AppError::NotFound(format!("Profile {}", subject_id)))?;
        if let Some(photo) = &edit.photo_url {
            record.photo_url = Some(photo.clone()).filter(|p| !p.is_empty());
        }
        if let Some(interests) = &edit.interests {
            self.interests
                .lock()
                .unwrap()
                .insert(subject_id, interests.iter().cloned().collect());
        }
        Ok(record.clone())
    }

    async fn get_friends(&self, _subject_id: u64) -> Result<Vec<MatchCandidate>> {
        self.enter("get_friends")?;
        Ok(self.friends.lock().unwrap().clone())
    }

    async fn list_interests(&self) -> Result<Vec<InterestTag>> {
        self.enter("list_interests")?;
        Ok(self.catalog.lock().unwrap().clone())
    }

    async fn list_events(&self, query: &EventQuery) -> Result<Vec<Event>> {
        self.enter("list_events")?;
        let matches = |field: &Option<String>, wanted: &Option<String>| match wanted {
            Some(wanted) => field
                .as_deref()
                .is_some_and(|f| f.eq_ignore_ascii_case(wanted)),
            None => true,
        };
        Ok(self
            .events
            .lock()
            .unwrap()
            .iter()
            .filter(|e| matches(&e.state, &query.state) && matches(&e.city, &query.city))
            .cloned()
            .collect())
    }

    async fn get_event(&self, event_id: u64) -> Result<Event> {
        self.enter("get_event")?;
        self.events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
            .cloned()
            .ok_or_else(|| AppError::NotFound(format!("Event {}", event_id)))
    }

    async fn join_event(&self, subject_id: u64, event_id: u64) -> Result<()> {
        self.enter("join_event")?;
        let capacity = self
            .events
            .lock()
            .unwrap()
            .iter()
            .find(|e| e.id == event_id)
            .ok_or_else(|| AppError::NotFound(format!("Event {}", event_id)))?
            .capacity;

        let mut attendees = self.attendees.lock().unwrap();
        let going = attendees.entry(event_id).or_default();
        let full = capacity.is_some_and(|cap| going.len() as u64 >= cap);
        if full || going.contains(&subject_id) {
            return Err(AppError::Conflict(
                "Event is at full capacity or already joined".to_string(),
            ));
        }
        going.insert(subject_id);
        Ok(())
    }

    async fn attendee_count(&self, event_id: u64) -> Result<u64> {
        self.enter("attendee_count")?;
        Ok(self.attendees_of(event_id).len() as u64)
    }

    fn set_bearer_token(&self, token: Option<String>) {
        *self.token.lock().unwrap() = token;
    }
}

/// Store whose writes fail for keys starting with `prefix`.
#[allow(dead_code)]
pub struct FailingWrites {
    pub inner: MemoryStore,
    pub prefix: &'static str,
}

impl KeyValueStore for FailingWrites {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        if key.starts_with(self.prefix) {
            return Err(AppError::Storage(format!("quota exceeded writing {}", key)));
        }
        self.inner.set(key, value)
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.inner.remove(key)
    }
}

// ─── Builders ───────────────────────────────────────────────

/// Fixed "today" for age checks.
#[allow(dead_code)]
pub fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
}

#[allow(dead_code)]
pub fn session(subject_id: u64) -> Session {
    Session {
        subject_id,
        primary_token: format!("token-{}", subject_id),
        display_identity: DisplayIdentity {
            email: format!("user{}@example.com", subject_id),
            first_name: None,
            last_name: None,
        },
    }
}

#[allow(dead_code)]
pub fn profile(subject_id: u64, first: Option<&str>, last: Option<&str>) -> ProfileRecord {
    ProfileRecord {
        subject_id,
        first_name: first.map(str::to_string),
        last_name: last.map(str::to_string),
        ..Default::default()
    }
}

#[allow(dead_code)]
pub fn candidate(subject_id: u64, first_name: &str) -> MatchCandidate {
    MatchCandidate {
        subject_id,
        email: Some(format!("{}@example.com", first_name.to_lowercase())),
        profile_snapshot: CandidateProfile {
            first_name: Some(first_name.to_string()),
            age: Some(30),
            ..Default::default()
        },
        interest_tags: vec![InterestTag {
            id: 1,
            name: "Hiking".to_string(),
        }],
        similarity_reasons: vec!["Both enjoy Hiking".to_string()],
    }
}

#[allow(dead_code)]
pub fn event(id: u64, title: &str, capacity: Option<u64>, state: &str, city: &str) -> Event {
    Event {
        id,
        title: title.to_string(),
        capacity,
        state: Some(state.to_string()),
        city: Some(city.to_string()),
        country: Some("USA".to_string()),
        ..Default::default()
    }
}

/// Onboarding answers for Ana Diaz, born 2000-01-01.
#[allow(dead_code)]
pub fn answers() -> OnboardingAnswers {
    OnboardingAnswers {
        first_name: "Ana".to_string(),
        last_name: "Diaz".to_string(),
        date_of_birth: NaiveDate::from_ymd_opt(2000, 1, 1).unwrap(),
        photo_url: None,
        languages: ["English".to_string()].into(),
        interests: ["Hiking".to_string()].into(),
        travel_style: Some(TravelStyle::Solo),
        preferred_activity_types: ["Outdoor Activities".to_string()].into(),
        bio: None,
    }
}

/// Client state wired to a fake directory and in-memory store.
#[allow(dead_code)]
pub struct TestClient {
    pub state: ClientState,
    pub directory: Arc<FakeDirectory>,
    pub store: Arc<dyn KeyValueStore>,
}

#[allow(dead_code)]
impl TestClient {
    pub fn new() -> Self {
        Self::with_store(Arc::new(MemoryStore::new()))
    }

    pub fn with_store(store: Arc<dyn KeyValueStore>) -> Self {
        let directory = Arc::new(FakeDirectory::new());
        let state = ClientState::new(
            Config::test_default(),
            store.clone(),
            directory.clone(),
            Arc::new(FixedClock(today())),
        );
        Self {
            state,
            directory,
            store,
        }
    }

    /// Cache a session for `subject_id` as if the user had logged in.
    pub fn sign_in(&self, subject_id: u64) {
        self.state.cache.replace(&session(subject_id)).unwrap();
    }

    pub fn cached_identity(&self) -> DisplayIdentity {
        self.state
            .cache
            .load()
            .unwrap()
            .expect("session cached")
            .display_identity
    }
}
