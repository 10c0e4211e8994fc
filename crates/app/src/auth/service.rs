//! Auth service.

use async_trait::async_trait;
use jiff::Timestamp;
use mockall::automock;
use sqlx::PgPool;
use tracing::warn;
use uuid::Uuid;

use crate::{
    auth::{
        ApiTokenMetadata, ApiTokenVersion, AuthServiceError, IssuedApiToken, NewApiToken,
        format_api_token, generate_api_token_secret, hash_api_token, parse_api_token,
        repository::PgAuthRepository,
    },
    domain::users::UserUuid,
};

#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self {
            repository: PgAuthRepository::new(pool),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if database insertion fails.
    pub async fn issue_api_token(
        &self,
        user: UserUuid,
        expires_at: Option<Timestamp>,
    ) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let version = ApiTokenVersion::V1;
        let secret = generate_api_token_secret();
        let token = format_api_token(token_uuid, version, &secret);
        let token_hash = hash_api_token(&token_uuid, version, &user, &secret);

        let metadata = self
            .repository
            .create_api_token(&NewApiToken {
                uuid: token_uuid,
                user_uuid: user,
                version,
                token_hash,
                expires_at,
            })
            .await?;

        Ok(IssuedApiToken { token, metadata })
    }

    /// List all tokens for the given user, newest first.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn list_api_tokens(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, AuthServiceError> {
        Ok(self.repository.list_api_tokens_by_user(user).await?)
    }

    /// Revoke a token by UUID. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the database query fails.
    pub async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<bool, AuthServiceError> {
        Ok(self
            .repository
            .revoke_api_token(token_uuid)
            .await?
            .is_some())
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_error| AuthServiceError::NotFound)?;

        let token = self
            .repository
            .find_active_api_token(parsed.token_uuid, parsed.version)
            .await?
            .ok_or(AuthServiceError::NotFound)?;

        let presented = hash_api_token(
            &parsed.token_uuid,
            parsed.version,
            &token.user_uuid,
            &parsed.secret,
        );

        if presented != token.token_hash {
            return Err(AuthServiceError::NotFound);
        }

        // Best-effort; authentication does not depend on this write.
        if let Err(error) = self
            .repository
            .touch_api_token_last_used(parsed.token_uuid)
            .await
        {
            warn!(token_uuid = %parsed.token_uuid, "failed to record token use: {error}");
        }

        Ok(token.user_uuid)
    }
}

#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve the user a bearer token belongs to.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}
