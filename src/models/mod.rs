// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod auth;
pub mod candidate;
pub mod event;
pub mod match_queue;
pub mod onboarding;
pub mod profile;
pub mod session;

pub use auth::{
    ConfirmRequest, Credentials, LoginResponse, LoginUser, PendingNames, RegisterResponse,
    RegistrationForm,
};
pub use candidate::{
    CandidateProfile, ConnectionStatus, InterestTag, MatchCandidate, Verdict, VerdictReceipt,
};
pub use event::{Event, EventCreator, EventDetails, EventQuery, JoinEventRequest};
pub use match_queue::{Direction, MatchQueue};
pub use onboarding::OnboardingAnswers;
pub use profile::{
    Location, ProfileEdit, ProfileFields, ProfileRecord, ProfileShadow, ProfileView, TravelStyle,
};
pub use session::{DisplayIdentity, LifecycleStage, Session};
