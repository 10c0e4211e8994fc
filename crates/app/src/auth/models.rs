//! Auth data models.

use jiff::Timestamp;
use uuid::Uuid;

use crate::{auth::ApiTokenVersion, domain::users::UserUuid};

/// Verifier row for a token that may still authenticate.
#[derive(Debug, Clone)]
pub(crate) struct ActiveApiToken {
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    /// Hex SHA-256 over token uuid, version, owner and secret.
    pub token_hash: String,
}

/// Stored token row, without the verifier.
#[derive(Debug, Clone)]
pub struct ApiTokenMetadata {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub created_at: Timestamp,
    pub last_used_at: Option<Timestamp>,
    pub expires_at: Option<Timestamp>,
    pub revoked_at: Option<Timestamp>,
}

/// Row written when a token is issued.
#[derive(Debug, Clone)]
pub struct NewApiToken {
    pub uuid: Uuid,
    pub user_uuid: UserUuid,
    pub version: ApiTokenVersion,
    pub token_hash: String,
    pub expires_at: Option<Timestamp>,
}

impl ApiTokenMetadata {
    /// Whether the token would still authenticate at `now`.
    #[must_use]
    pub fn is_active_at(&self, now: Timestamp) -> bool {
        self.revoked_at.is_none() && self.expires_at.is_none_or(|expires_at| expires_at > now)
    }
}

/// A freshly issued token. `token` is shown once and never stored.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    pub token: String,
    pub metadata: ApiTokenMetadata,
}
