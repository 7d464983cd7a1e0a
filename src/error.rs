// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error taxonomy shared by the stores, the directory client and
//! the coordinators.

/// Application error type.
///
/// Remote failures are classified once, at the directory client boundary.
/// Nothing past that boundary looks at HTTP status codes again.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// Expected absence. Drives lifecycle branching, not shown to the user.
    #[error("Resource not found: {0}")]
    NotFound(String),

    /// User-correctable input problem, scoped to a single field.
    #[error("Invalid {field}: {message}")]
    Validation { field: String, message: String },

    /// The remote side already holds the requested state.
    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not authorized: {0}")]
    Unauthorized(String),

    /// Network or server fault. Retryable, never mapped to a default stage.
    #[error("Transient directory error: {0}")]
    Transient(String),

    #[error("Local storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    /// Build a field-scoped validation error.
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        AppError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn is_transient(&self) -> bool {
        matches!(self, AppError::Transient(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, AppError::NotFound(_))
    }

    pub fn is_conflict(&self) -> bool {
        matches!(self, AppError::Conflict(_))
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, AppError::Validation { .. })
    }
}

impl From<validator::ValidationErrors> for AppError {
    /// Collapse derive-validator output to the first failing field.
    ///
    /// Fields are ordered by name so the reported field is stable, and
    /// reported in camelCase.
    fn from(errors: validator::ValidationErrors) -> Self {
        let mut fields: Vec<_> = errors.field_errors().into_iter().collect();
        fields.sort_by(|a, b| a.0.cmp(&b.0));

        let Some((field, errs)) = fields.into_iter().next() else {
            return AppError::validation("request", "invalid input");
        };

        let message = errs
            .first()
            .map(|e| {
                e.message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string())
            })
            .unwrap_or_else(|| "invalid value".to_string());

        AppError::validation(camel_case(&field), message)
    }
}

/// `preferred_activity_types` → `preferredActivityTypes`, matching the
/// JSON field names the rest of the API reports.
fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Storage(format!("serialization failed: {}", err))
    }
}

/// Result type alias used throughout the crate
pub type Result<T> = std::result::Result<T, AppError>;
