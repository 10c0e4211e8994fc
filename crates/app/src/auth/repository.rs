//! Auth repository.

use jiff_sqlx::Timestamp as SqlxTimestamp;
use sqlx::{FromRow, PgPool, Postgres, Row, postgres::PgRow, query, query_as, query_scalar};
use uuid::Uuid;

use crate::{
    auth::{ActiveApiToken, ApiTokenMetadata, ApiTokenVersion, NewApiToken},
    domain::users::UserUuid,
};

const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const FIND_ACTIVE_API_TOKEN_SQL: &str = include_str!("sql/find_active_api_token.sql");
const TOUCH_API_TOKEN_LAST_USED_SQL: &str = include_str!("sql/touch_api_token_last_used.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");
const LIST_API_TOKENS_BY_USER_SQL: &str = include_str!("sql/list_api_tokens_by_user.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn create_api_token(
        &self,
        token: &NewApiToken,
    ) -> Result<ApiTokenMetadata, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(CREATE_API_TOKEN_SQL)
            .bind(token.uuid)
            .bind(token.user_uuid.into_uuid())
            .bind(token.version.as_i16())
            .bind(&token.token_hash)
            .bind(token.expires_at.map(SqlxTimestamp::from))
            .fetch_one(&self.pool)
            .await
    }

    /// Non-revoked, non-expired token with the given identifier and version.
    pub(crate) async fn find_active_api_token(
        &self,
        token_uuid: Uuid,
        version: ApiTokenVersion,
    ) -> Result<Option<ActiveApiToken>, sqlx::Error> {
        query_as::<Postgres, ActiveApiToken>(FIND_ACTIVE_API_TOKEN_SQL)
            .bind(token_uuid)
            .bind(version.as_i16())
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn touch_api_token_last_used(&self, token_uuid: Uuid) -> Result<(), sqlx::Error> {
        query(TOUCH_API_TOKEN_LAST_USED_SQL)
            .bind(token_uuid)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    /// Returns the token uuid when it was still active.
    pub(crate) async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<Option<Uuid>, sqlx::Error> {
        query_scalar::<Postgres, Uuid>(REVOKE_API_TOKEN_SQL)
            .bind(token_uuid)
            .fetch_optional(&self.pool)
            .await
    }

    pub(crate) async fn list_api_tokens_by_user(
        &self,
        user: UserUuid,
    ) -> Result<Vec<ApiTokenMetadata>, sqlx::Error> {
        query_as::<Postgres, ApiTokenMetadata>(LIST_API_TOKENS_BY_USER_SQL)
            .bind(user.into_uuid())
            .fetch_all(&self.pool)
            .await
    }
}

fn try_get_version(row: &PgRow) -> Result<ApiTokenVersion, sqlx::Error> {
    let version: i16 = row.try_get("version")?;

    ApiTokenVersion::try_from(version).map_err(|error| sqlx::Error::ColumnDecode {
        index: "version".to_string(),
        source: Box::new(error),
    })
}

impl<'r> FromRow<'r, PgRow> for ActiveApiToken {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            version: try_get_version(row)?,
            token_hash: row.try_get("token_hash")?,
        })
    }
}

impl<'r> FromRow<'r, PgRow> for ApiTokenMetadata {
    fn from_row(row: &'r PgRow) -> sqlx::Result<Self> {
        Ok(Self {
            uuid: row.try_get("uuid")?,
            user_uuid: UserUuid::from_uuid(row.try_get("user_uuid")?),
            version: try_get_version(row)?,
            created_at: row.try_get::<SqlxTimestamp, _>("created_at")?.to_jiff(),
            last_used_at: row
                .try_get::<Option<SqlxTimestamp>, _>("last_used_at")?
                .map(SqlxTimestamp::to_jiff),
            expires_at: row
                .try_get::<Option<SqlxTimestamp>, _>("expires_at")?
                .map(SqlxTimestamp::to_jiff),
            revoked_at: row
                .try_get::<Option<SqlxTimestamp>, _>("revoked_at")?
                .map(SqlxTimestamp::to_jiff),
        })
    }
}
