//! Shared-password gate in front of the workflow.

use log::{info, warn};

/// Tracks whether the current user has unlocked the session.
///
/// A gate built without a secret is open: any login succeeds.
#[derive(Debug, Default)]
pub struct AuthGate {
    secret: Option<String>,
    authenticated: bool,
}

impl AuthGate {
    pub fn new(secret: Option<String>) -> Self {
        Self {
            secret: secret.filter(|s| !s.is_empty()),
            authenticated: false,
        }
    }

    pub fn is_open(&self) -> bool {
        self.secret.is_none()
    }

    /// Check `attempt` against the secret. A failed attempt also ends any
    /// session already unlocked.
    pub fn login(&mut self, attempt: &str) -> bool {
        self.authenticated = match &self.secret {
            None => true,
            Some(secret) => secret == attempt,
        };
        if self.authenticated {
            info!("Login accepted");
        } else {
            warn!("Login rejected");
        }
        self.authenticated
    }

    pub fn logout(&mut self) {
        self.authenticated = false;
    }

    pub fn is_authenticated(&self) -> bool {
        self.authenticated
    }
}
