// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - client business logic layer.

pub mod auth;
pub mod directory;
pub mod events;
pub mod matches;
pub mod navigation;
pub mod onboarding;
pub mod profile;
pub mod resolver;

pub use auth::AuthService;
pub use directory::{HttpDirectoryClient, RemoteDirectory};
pub use events::EventService;
pub use matches::{DecisionOutcome, MatchQueueController};
pub use navigation::{Route, RouteDecision, RouteGuard};
pub use onboarding::{CompletionFailure, CompletionResult, CompletionStep, OnboardingCoordinator};
pub use profile::ProfileService;
pub use resolver::SessionResolver;
