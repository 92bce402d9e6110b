//! `PostgreSQL` implementation of [`UserDirectory`].

use crate::tab_store::database_error;
use sqlx::PgPool;
use tabs_core::store::{StoreFuture, UserDirectory};
use tabs_core::tab::{User, UserId};
use uuid::Uuid;

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
}

impl From<UserRow> for User {
    fn from(row: UserRow) -> Self {
        Self {
            id: UserId::from_uuid(row.id),
            username: row.username,
        }
    }
}

/// Read-only view over the `users` table.
#[derive(Clone, Debug)]
pub struct PostgresUserDirectory {
    pool: PgPool,
}

impl PostgresUserDirectory {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

impl UserDirectory for PostgresUserDirectory {
    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        Box::pin(async move {
            let row: Option<UserRow> = sqlx::query_as("SELECT id, username FROM users WHERE id = $1")
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;

            Ok(row.map(User::from))
        })
    }

    fn find_many<'a>(&'a self, ids: &'a [UserId]) -> StoreFuture<'a, Vec<User>> {
        Box::pin(async move {
            if ids.is_empty() {
                return Ok(Vec::new());
            }

            let ids: Vec<Uuid> = ids.iter().map(|id| *id.as_uuid()).collect();
            let rows: Vec<UserRow> =
                sqlx::query_as("SELECT id, username FROM users WHERE id = ANY($1)")
                    .bind(&ids[..])
                    .fetch_all(&self.pool)
                    .await
                    .map_err(database_error)?;

            Ok(rows.into_iter().map(User::from).collect())
        })
    }
}
