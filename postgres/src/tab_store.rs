//! `PostgreSQL` implementation of [`TabStore`].

use chrono::{DateTime, Utc};
use sqlx::PgPool;
use tabs_core::store::{StoreError, StoreFuture, StoreHealth, TabStore};
use tabs_core::tab::{Tab, TabDraft, TabId, Ticket, UserId};
use tracing::Instrument;
use uuid::Uuid;

/// Name of the unique constraint guarding tab titles.
pub const TITLE_CONSTRAINT: &str = "tabs_title_key";

const TAB_COLUMNS: &str = "id, ticket, user_id, title, text, completed, created_at, updated_at";

#[derive(sqlx::FromRow)]
struct TabRow {
    id: Uuid,
    ticket: i64,
    user_id: Uuid,
    title: String,
    text: String,
    completed: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<TabRow> for Tab {
    fn from(row: TabRow) -> Self {
        Self {
            id: TabId::from_uuid(row.id),
            ticket: Ticket::new(row.ticket),
            user: UserId::from_uuid(row.user_id),
            title: row.title,
            text: row.text,
            completed: row.completed,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Tab store backed by the `tabs` table.
///
/// Tickets come from the `tab_ticket_seq` sequence (`START WITH 500`), so
/// allocation is atomic across connections and server instances, and a
/// ticket is never handed out again after its tab is deleted. Titles are
/// guarded by the [`TITLE_CONSTRAINT`] unique constraint; a clash surfaces as
/// [`StoreError::DuplicateTitle`].
///
/// # Example
///
/// ```no_run
/// use tabs_postgres::PostgresTabStore;
///
/// # async fn example(pool: sqlx::PgPool) -> Result<(), Box<dyn std::error::Error>> {
/// let store = PostgresTabStore::from_pool(pool);
/// store.migrate().await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct PostgresTabStore {
    pool: PgPool,
}

impl PostgresTabStore {
    /// Wrap an existing connection pool.
    #[must_use]
    pub const fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Apply the bundled schema migrations.
    ///
    /// # Errors
    ///
    /// Returns `StoreError::Database` if a migration fails.
    pub async fn migrate(&self) -> Result<(), StoreError> {
        sqlx::migrate!("./migrations")
            .run(&self.pool)
            .await
            .map_err(|e| StoreError::Database(format!("Migration failed: {e}")))
    }
}

pub(crate) fn database_error(err: sqlx::Error) -> StoreError {
    StoreError::Database(err.to_string())
}

fn write_error(err: sqlx::Error, title: &str) -> StoreError {
    if let sqlx::Error::Database(db) = &err {
        if db.is_unique_violation() && db.constraint() == Some(TITLE_CONSTRAINT) {
            return StoreError::DuplicateTitle(title.to_string());
        }
    }
    database_error(err)
}

impl TabStore for PostgresTabStore {
    fn find_all(&self) -> StoreFuture<'_, Vec<Tab>> {
        Box::pin(
            async move {
                let rows: Vec<TabRow> = sqlx::query_as(&format!(
                    "SELECT {TAB_COLUMNS} FROM tabs ORDER BY ticket ASC"
                ))
                .fetch_all(&self.pool)
                .await
                .map_err(database_error)?;

                Ok(rows.into_iter().map(Tab::from).collect())
            }
            .instrument(tracing::debug_span!("tabs.find_all")),
        )
    }

    fn find_by_id(&self, id: TabId) -> StoreFuture<'_, Option<Tab>> {
        Box::pin(async move {
            let row: Option<TabRow> =
                sqlx::query_as(&format!("SELECT {TAB_COLUMNS} FROM tabs WHERE id = $1"))
                    .bind(id.as_uuid())
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(database_error)?;

            Ok(row.map(Tab::from))
        })
    }

    fn find_by_title<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Option<Tab>> {
        Box::pin(async move {
            let row: Option<TabRow> =
                sqlx::query_as(&format!("SELECT {TAB_COLUMNS} FROM tabs WHERE title = $1"))
                    .bind(title)
                    .fetch_optional(&self.pool)
                    .await
                    .map_err(database_error)?;

            Ok(row.map(Tab::from))
        })
    }

    fn create(&self, draft: TabDraft) -> StoreFuture<'_, Tab> {
        let span = tracing::debug_span!("tabs.create", title = %draft.title);
        Box::pin(
            async move {
                let row: TabRow = sqlx::query_as(&format!(
                    "INSERT INTO tabs (id, user_id, title, text, completed, created_at, updated_at)
                     VALUES ($1, $2, $3, $4, false, $5, $5)
                     RETURNING {TAB_COLUMNS}"
                ))
                .bind(TabId::new().as_uuid())
                .bind(draft.user.as_uuid())
                .bind(&draft.title)
                .bind(&draft.text)
                .bind(draft.created_at)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| write_error(e, &draft.title))?;

                Ok(Tab::from(row))
            }
            .instrument(span),
        )
    }

    fn save<'a>(&'a self, tab: &'a Tab) -> StoreFuture<'a, Tab> {
        let span = tracing::debug_span!("tabs.save", tab_id = %tab.id);
        Box::pin(
            async move {
                let row: Option<TabRow> = sqlx::query_as(&format!(
                    "UPDATE tabs
                     SET user_id = $2, title = $3, text = $4, completed = $5, updated_at = $6
                     WHERE id = $1
                     RETURNING {TAB_COLUMNS}"
                ))
                .bind(tab.id.as_uuid())
                .bind(tab.user.as_uuid())
                .bind(&tab.title)
                .bind(&tab.text)
                .bind(tab.completed)
                .bind(tab.updated_at)
                .fetch_optional(&self.pool)
                .await
                .map_err(|e| write_error(e, &tab.title))?;

                row.map(Tab::from).ok_or(StoreError::NotFound(tab.id))
            }
            .instrument(span),
        )
    }

    fn delete_one(&self, id: TabId) -> StoreFuture<'_, Option<Tab>> {
        Box::pin(
            async move {
                let row: Option<TabRow> = sqlx::query_as(&format!(
                    "DELETE FROM tabs WHERE id = $1 RETURNING {TAB_COLUMNS}"
                ))
                .bind(id.as_uuid())
                .fetch_optional(&self.pool)
                .await
                .map_err(database_error)?;

                Ok(row.map(Tab::from))
            }
            .instrument(tracing::debug_span!("tabs.delete_one", tab_id = %id)),
        )
    }
}

impl StoreHealth for PostgresTabStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(async move {
            sqlx::query("SELECT 1")
                .execute(&self.pool)
                .await
                .map(|_| ())
                .map_err(database_error)
        })
    }
}
