//! Store traits for tabs and users.
//!
//! This module defines the persistence abstractions the service talks to:
//!
//! - [`TabStore`]: the tab collection plus its ticket counter
//! - [`UserDirectory`]: read-only access to users, for username enrichment
//!
//! # Implementations
//!
//! - `PostgresTabStore` / `PostgresUserDirectory` (in `tabs-postgres`): production
//! - `InMemoryTabStore` / `InMemoryUserDirectory` (in `tabs-testing`): fast, deterministic tests
//!
//! # Example
//!
//! ```no_run
//! use tabs_core::store::{StoreError, TabStore};
//! use tabs_core::tab::TabDraft;
//!
//! async fn example<S: TabStore>(store: &S, draft: TabDraft) -> Result<(), StoreError> {
//!     if store.find_by_title(&draft.title).await?.is_none() {
//!         let tab = store.create(draft).await?;
//!         println!("created ticket {}", tab.ticket);
//!     }
//!     Ok(())
//! }
//! ```

use crate::tab::{Tab, TabDraft, TabId, User, UserId};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Boxed future returned by store methods.
pub type StoreFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, StoreError>> + Send + 'a>>;

/// Errors that can occur during store operations.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Another tab already holds this title.
    ///
    /// Raised by stores that enforce title uniqueness themselves, which
    /// catches concurrent writers that both passed the service's check.
    #[error("Duplicate tab title: {0}")]
    DuplicateTitle(String),

    /// The tab to write no longer exists.
    #[error("Tab not found: {0}")]
    NotFound(TabId),

    /// Database connection or query error.
    #[error("Database error: {0}")]
    Database(String),
}

/// Persistent collection of tabs.
///
/// # Ticket allocation
///
/// `create` must hand out tickets atomically: concurrent creates never share a
/// ticket, tickets increase in creation order starting at
/// [`Ticket::FIRST`](crate::tab::Ticket::FIRST), and a ticket is never reused
/// after its tab is deleted. The counter lives in the store, not in process
/// memory, so every server instance sharing the store shares the sequence.
///
/// # Dyn Compatibility
///
/// Methods return boxed futures so the service can hold an
/// `Arc<dyn TabStore>`.
pub trait TabStore: Send + Sync {
    /// Load every tab, ordered by ticket.
    ///
    /// # Errors
    ///
    /// - `Database`: query failed
    fn find_all(&self) -> StoreFuture<'_, Vec<Tab>>;

    /// Load one tab by id.
    ///
    /// # Errors
    ///
    /// - `Database`: query failed
    fn find_by_id(&self, id: TabId) -> StoreFuture<'_, Option<Tab>>;

    /// Load the tab holding `title`, if any.
    ///
    /// # Errors
    ///
    /// - `Database`: query failed
    fn find_by_title<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Option<Tab>>;

    /// Insert a new tab, assigning its id and next ticket.
    ///
    /// The new tab starts with `completed = false` and
    /// `updated_at = created_at`.
    ///
    /// # Errors
    ///
    /// - `DuplicateTitle`: the store rejected the title as taken
    /// - `Database`: insert failed
    fn create(&self, draft: TabDraft) -> StoreFuture<'_, Tab>;

    /// Persist the mutable fields of `tab` onto the stored tab with the same id.
    ///
    /// Writes `user`, `title`, `text`, `completed` and `updated_at`; the
    /// stored `ticket` and `created_at` are never changed. Returns the tab as
    /// stored after the write.
    ///
    /// # Errors
    ///
    /// - `NotFound`: no tab with this id exists (deleted concurrently)
    /// - `DuplicateTitle`: the store rejected the title as taken
    /// - `Database`: update failed
    fn save<'a>(&'a self, tab: &'a Tab) -> StoreFuture<'a, Tab>;

    /// Delete one tab by id, returning it if it existed.
    ///
    /// # Errors
    ///
    /// - `Database`: delete failed
    fn delete_one(&self, id: TabId) -> StoreFuture<'_, Option<Tab>>;
}

/// Read-only view over the users that own tabs.
pub trait UserDirectory: Send + Sync {
    /// Load one user by id.
    ///
    /// # Errors
    ///
    /// - `Database`: query failed
    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>>;

    /// Load every user whose id is in `ids`, in one round-trip.
    ///
    /// Unknown ids are skipped; the result order is unspecified.
    ///
    /// # Errors
    ///
    /// - `Database`: query failed
    fn find_many<'a>(&'a self, ids: &'a [UserId]) -> StoreFuture<'a, Vec<User>>;
}

/// Readiness probe for a backing store.
pub trait StoreHealth: Send + Sync {
    /// Check that the store can serve requests.
    ///
    /// # Errors
    ///
    /// - `Database`: the store is unreachable
    fn ping(&self) -> StoreFuture<'_, ()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn duplicate_title_error_display() {
        let error = StoreError::DuplicateTitle("Buy milk".to_string());
        assert_eq!(error.to_string(), "Duplicate tab title: Buy milk");
    }

    #[test]
    fn not_found_error_display() {
        let id = TabId::new();
        let display = StoreError::NotFound(id).to_string();
        assert!(display.contains(&id.to_string()));
    }
}
