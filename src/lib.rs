// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Urbane client core: session and profile-completion consistency.
//!
//! This crate keeps the on-device session, the remote profile directory and
//! the local shadow profile in agreement, and drives the candidate queue on
//! the discovery surface.

pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
pub mod time_utils;

use std::sync::Arc;

use config::Config;
use error::Result;
use services::{
    AuthService, EventService, HttpDirectoryClient, MatchQueueController, OnboardingCoordinator,
    ProfileService, RemoteDirectory, RouteGuard, SessionResolver,
};
use store::{FileStore, KeyValueStore, SessionCache, ShadowStore};
use time_utils::{Clock, SystemClock};

/// Shared client state. Every component gets its collaborators injected.
pub struct ClientState {
    pub config: Config,
    pub cache: Arc<SessionCache>,
    pub directory: Arc<dyn RemoteDirectory>,
    pub resolver: SessionResolver,
    pub onboarding: OnboardingCoordinator,
    pub matches: MatchQueueController,
    pub profiles: ProfileService,
    pub events: EventService,
    pub auth: AuthService,
    pub guard: RouteGuard,
}

impl ClientState {
    pub fn new(
        config: Config,
        store: Arc<dyn KeyValueStore>,
        directory: Arc<dyn RemoteDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let cache = Arc::new(SessionCache::new(store.clone()));
        let resolver = SessionResolver::new(cache.clone(), directory.clone());
        let shadows = ShadowStore::new(store);

        Self {
            onboarding: OnboardingCoordinator::new(
                directory.clone(),
                cache.clone(),
                shadows.clone(),
                clock,
                config.min_age,
            ),
            matches: MatchQueueController::new(directory.clone()),
            profiles: ProfileService::new(directory.clone(), shadows),
            events: EventService::new(directory.clone()),
            auth: AuthService::new(directory.clone(), cache.clone()),
            guard: RouteGuard::new(resolver.clone()),
            resolver,
            directory,
            cache,
            config,
        }
    }

    /// File-backed store and HTTP directory, with any cached token reattached.
    pub fn from_config(config: Config) -> Result<Self> {
        let store: Arc<dyn KeyValueStore> = Arc::new(FileStore::open(&config.store_path)?);
        let directory = Arc::new(HttpDirectoryClient::new(
            config.api_base_url.clone(),
            config.request_timeout,
        )?);

        let state = Self::new(config, store, directory, Arc::new(SystemClock));
        if let Some(session) = state.cache.load()? {
            state
                .directory
                .set_bearer_token(Some(session.primary_token));
        }
        Ok(state)
    }

    /// Log out and drop the in-memory candidate queue.
    pub async fn logout(&self) -> Result<()> {
        self.auth.logout().await?;
        self.matches.reset();
        Ok(())
    }
}
