use chrono::Utc;
use serde::{Deserialize, Serialize};

use super::user::User;

/// Seconds before `expires_at` at which a session is already treated as expired,
/// so a token is never sent while it is about to lapse.
pub const EXPIRY_MARGIN_SECS: i64 = 10;

fn default_token_type() -> String {
    "bearer".to_string()
}

/// Proof of authentication issued by the auth service.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Session {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<i64>,
    /// Unix timestamp (seconds). `None` means the session never expires locally.
    #[serde(default)]
    pub expires_at: Option<i64>,
    pub user: User,
}

impl Session {
    /// Fill in `expires_at` from `expires_in` when the service only sent the latter.
    pub fn with_computed_expiry(mut self) -> Self {
        if self.expires_at.is_none() {
            if let Some(expires_in) = self.expires_in {
                self.expires_at = Some(Utc::now().timestamp() + expires_in);
            }
        }
        self
    }

    pub fn is_expired_at(&self, now: i64) -> bool {
        self.expires_at
            .is_some_and(|expires_at| expires_at <= now + EXPIRY_MARGIN_SECS)
    }

    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now().timestamp())
    }
}
