// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Screen-level access control driven by the lifecycle stage.

use crate::error::Result;
use crate::models::LifecycleStage;
use crate::services::SessionResolver;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Login,
    Signup,
    Verify,
    Onboarding,
    Discover,
    Profile,
}

impl Route {
    /// Reachable without a session.
    pub fn is_public(self) -> bool {
        matches!(self, Route::Login | Route::Signup | Route::Verify)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RouteDecision {
    Allow,
    Redirect(Route),
}

/// Where `stage` may go when it asks for `route`.
pub fn decide(route: Route, stage: LifecycleStage) -> RouteDecision {
    use LifecycleStage::*;

    match (route, stage) {
        (r, Anonymous) if r.is_public() => RouteDecision::Allow,
        (_, Anonymous) => RouteDecision::Redirect(Route::Login),

        (Route::Onboarding, AuthenticatedIncomplete) => RouteDecision::Allow,
        (_, AuthenticatedIncomplete) => RouteDecision::Redirect(Route::Onboarding),

        (r, AuthenticatedComplete) if r.is_public() || r == Route::Onboarding => {
            RouteDecision::Redirect(Route::Discover)
        }
        (_, AuthenticatedComplete) => RouteDecision::Allow,
    }
}

#[derive(Clone)]
pub struct RouteGuard {
    resolver: SessionResolver,
}

impl RouteGuard {
    pub fn new(resolver: SessionResolver) -> Self {
        Self { resolver }
    }

    /// Resolve the stage and decide. A transient failure is retried once;
    /// a second one goes back to the caller.
    pub async fn enter(&self, route: Route) -> Result<RouteDecision> {
        let stage = match self.resolver.resolve().await {
            Ok(stage) => stage,
            Err(e) if e.is_transient() => {
                tracing::debug!(?route, error = %e, "Resolve failed, retrying once");
                self.resolver.resolve().await?
            }
            Err(e) => return Err(e),
        };

        let decision = decide(route, stage);
        tracing::debug!(?route, ?stage, ?decision, "Route decision");
        Ok(decision)
    }
}
