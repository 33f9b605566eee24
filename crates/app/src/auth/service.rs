//! Auth service.

use async_trait::async_trait;
use mockall::automock;
use uuid::Uuid;

use crate::{
    auth::{
        AuthServiceError, format_api_token, generate_api_token_secret, hash_token,
        parse_api_token, repository::PgAuthRepository,
    },
    database::Db,
    users::UserUuid,
};

/// A freshly issued token. The raw value is only available here.
#[derive(Debug, Clone)]
pub struct IssuedApiToken {
    /// Identifier of the stored token row.
    pub uuid: Uuid,
    /// User the token authenticates as.
    pub user_uuid: UserUuid,
    /// Bearer value to hand to the client.
    pub token: String,
}

/// Postgres-backed [`AuthService`].
#[derive(Debug, Clone)]
pub struct PgAuthService {
    repository: PgAuthRepository,
}

impl PgAuthService {
    /// Create a service over the shared pool.
    #[must_use]
    pub fn new(db: Db) -> Self {
        Self {
            repository: PgAuthRepository::new(db.pool().clone()),
        }
    }

    /// Issue a new API token for the given user.
    ///
    /// # Errors
    ///
    /// Returns an error if the database insert fails.
    pub async fn issue_api_token(&self, user: UserUuid) -> Result<IssuedApiToken, AuthServiceError> {
        let token_uuid = Uuid::now_v7();
        let secret = generate_api_token_secret();

        self.repository
            .create_api_token(token_uuid, user, &hash_token(&token_uuid, &secret))
            .await?;

        Ok(IssuedApiToken {
            uuid: token_uuid,
            user_uuid: user,
            token: format_api_token(token_uuid, &secret),
        })
    }

    /// Revoke a token. Returns `true` if the token was active.
    ///
    /// # Errors
    ///
    /// Returns an error if the token is malformed or the update fails.
    pub async fn revoke_api_token(&self, token: &str) -> Result<bool, AuthServiceError> {
        let parsed = parse_api_token(token)?;

        let revoked = self.repository.revoke_api_token(parsed.token_uuid).await?;

        Ok(revoked > 0)
    }
}

#[async_trait]
impl AuthService for PgAuthService {
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError> {
        let parsed = parse_api_token(bearer_token).map_err(|_ignored| AuthServiceError::NotFound)?;

        self.repository
            .find_user_by_token(parsed.token_uuid, &parsed.hash())
            .await?
            .ok_or(AuthServiceError::NotFound)
    }
}

/// Bearer token authentication.
#[automock]
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Resolve a bearer token to the user it was issued for.
    async fn authenticate_bearer(&self, bearer_token: &str) -> Result<UserUuid, AuthServiceError>;
}
