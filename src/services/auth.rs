// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Registration, email verification, login and logout.

use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::models::{
    ConfirmRequest, Credentials, DisplayIdentity, PendingNames, RegistrationForm, Session,
};
use crate::services::RemoteDirectory;
use crate::store::SessionCache;

pub struct AuthService {
    directory: Arc<dyn RemoteDirectory>,
    cache: Arc<SessionCache>,
}

impl AuthService {
    pub fn new(directory: Arc<dyn RemoteDirectory>, cache: Arc<SessionCache>) -> Self {
        Self { directory, cache }
    }

    /// Create an account. Returns the email awaiting verification.
    ///
    /// First and last name are kept on the device to pre-fill onboarding.
    pub async fn register(&self, form: &RegistrationForm) -> Result<String> {
        let form = RegistrationForm {
            email: form.email.trim().to_lowercase(),
            password: form.password.clone(),
            first_name: form.first_name.trim().to_string(),
            last_name: form.last_name.trim().to_string(),
        };
        form.validate()?;

        let response = self
            .directory
            .register(&Credentials {
                email: form.email.clone(),
                password: form.password.clone(),
            })
            .await?;

        let pending = PendingNames {
            email: form.email.clone(),
            first_name: form.first_name,
            last_name: form.last_name,
        };
        if let Err(e) = self.cache.stash_pending_names(&pending) {
            tracing::warn!(error = %e, "Failed to stash registration names");
        }

        tracing::info!(email = %response.email, "Registered, verification pending");
        Ok(response.email)
    }

    /// Confirm the emailed verification code.
    pub async fn confirm(&self, email: &str, code: &str) -> Result<()> {
        let code = code.trim();
        if code.is_empty() {
            return Err(AppError::validation(
                "confirmationCode",
                "Please enter the verification code",
            ));
        }

        self.directory
            .confirm(&ConfirmRequest {
                email: email.trim().to_lowercase(),
                confirmation_code: code.to_string(),
            })
            .await?;

        tracing::info!(email, "Email verified");
        Ok(())
    }

    pub async fn resend_code(&self, email: &str) -> Result<()> {
        self.directory.resend_code(email.trim()).await
    }

    /// Sign in and replace the cached session.
    pub async fn login(&self, email: &str, password: &str) -> Result<Session> {
        let email = email.trim().to_lowercase();
        if email.is_empty() || password.is_empty() {
            return Err(AppError::validation(
                "email",
                "Email and password are required",
            ));
        }

        let response = self
            .directory
            .login(&Credentials {
                email: email.clone(),
                password: password.to_string(),
            })
            .await?;

        // Names arrive with the profile; the next resolve fills them in.
        let session = Session {
            subject_id: response.user.id,
            primary_token: response.access_token,
            display_identity: DisplayIdentity {
                email: response.user.email,
                first_name: None,
                last_name: None,
            },
        };

        self.cache.replace(&session)?;
        self.directory
            .set_bearer_token(Some(session.primary_token.clone()));

        tracing::info!(subject_id = session.subject_id, "Logged in");
        Ok(session)
    }

    /// Names entered at sign-up for `email`, for pre-filling onboarding.
    pub fn pending_names_for(&self, email: &str) -> Result<Option<PendingNames>> {
        Ok(self
            .cache
            .pending_names()?
            .filter(|p| p.email.eq_ignore_ascii_case(email.trim())))
    }

    /// Destroy the session. Shadow profiles stay on the device.
    pub async fn logout(&self) -> Result<()> {
        let subject_id = self.cache.load().ok().flatten().map(|s| s.subject_id);

        self.cache.clear()?;
        self.cache.clear_pending_names()?;
        self.directory.set_bearer_token(None);

        tracing::info!(?subject_id, "Logged out");
        Ok(())
    }
}
