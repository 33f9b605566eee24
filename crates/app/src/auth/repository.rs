//! Auth repository.

use sqlx::{PgPool, query, query_scalar};
use uuid::Uuid;

use crate::users::UserUuid;

const FIND_USER_BY_TOKEN_SQL: &str = include_str!("sql/find_user_by_token.sql");
const CREATE_API_TOKEN_SQL: &str = include_str!("sql/create_api_token.sql");
const REVOKE_API_TOKEN_SQL: &str = include_str!("sql/revoke_api_token.sql");

#[derive(Debug, Clone)]
pub(crate) struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    #[must_use]
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub(crate) async fn find_user_by_token(
        &self,
        token_uuid: Uuid,
        token_hash: &str,
    ) -> Result<Option<UserUuid>, sqlx::Error> {
        query_scalar::<_, Uuid>(FIND_USER_BY_TOKEN_SQL)
            .bind(token_uuid)
            .bind(token_hash)
            .fetch_optional(&self.pool)
            .await
            .map(|user| user.map(UserUuid::from_uuid))
    }

    pub(crate) async fn create_api_token(
        &self,
        token_uuid: Uuid,
        user: UserUuid,
        token_hash: &str,
    ) -> Result<(), sqlx::Error> {
        query(CREATE_API_TOKEN_SQL)
            .bind(token_uuid)
            .bind(user.into_uuid())
            .bind(token_hash)
            .execute(&self.pool)
            .await?;

        Ok(())
    }

    pub(crate) async fn revoke_api_token(&self, token_uuid: Uuid) -> Result<u64, sqlx::Error> {
        let rows_affected = query(REVOKE_API_TOKEN_SQL)
            .bind(token_uuid)
            .execute(&self.pool)
            .await?
            .rows_affected();

        Ok(rows_affected)
    }
}
