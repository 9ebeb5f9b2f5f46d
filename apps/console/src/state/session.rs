//! # Session State
//!
//! The signed-in operator, held explicitly by the shell.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Session Lifecycle                                    │
//! │                                                                         │
//! │   SessionState(None) ── login ok ──► SessionState(Some(Session))       │
//! │          ▲                                   │                          │
//! │          └──────────── logout ───────────────┘                          │
//! │                                                                         │
//! │  Commands that touch inventory or sales take `&Session`, so they       │
//! │  cannot be called without one.                                         │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::error::ApiError;

/// Proof of a successful sign-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    pub id: Uuid,
    pub username: String,
    pub signed_in_at: DateTime<Utc>,
}

impl Session {
    /// Starts a session for a verified user.
    pub fn new(username: impl Into<String>) -> Self {
        Session {
            id: Uuid::new_v4(),
            username: username.into(),
            signed_in_at: Utc::now(),
        }
    }
}

/// Holds at most one active session.
#[derive(Debug, Default)]
pub struct SessionState {
    current: Option<Session>,
}

impl SessionState {
    /// Creates a signed-out state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces any active session.
    pub fn sign_in(&mut self, session: Session) {
        self.current = Some(session);
    }

    /// Ends the active session, returning it if there was one.
    pub fn sign_out(&mut self) -> Option<Session> {
        self.current.take()
    }

    pub fn current(&self) -> Option<&Session> {
        self.current.as_ref()
    }

    /// Returns the active session or an `Unauthenticated` error.
    pub fn require(&self) -> Result<&Session, ApiError> {
        self.current
            .as_ref()
            .ok_or_else(|| ApiError::unauthenticated("Sign in first: login <username> <password>"))
    }
}
