//! In-memory store testing utilities
//!
//! Provides fast, deterministic stand-ins for the database:
//! - [`InMemoryTabStore`]: tab collection with a shared ticket counter
//! - [`InMemoryUserDirectory`]: seeded users with call counting

#![allow(clippy::unwrap_used)] // Test infrastructure uses unwrap for simplicity
#![allow(clippy::missing_panics_doc)] // Panics only on poisoned locks

use std::collections::HashMap;
use std::future;
use std::sync::atomic::{AtomicI64, AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};
use tabs_core::store::{StoreError, StoreFuture, StoreHealth, TabStore, UserDirectory};
use tabs_core::tab::{Tab, TabDraft, TabId, Ticket, User, UserId};

/// In-memory tab store for fast, deterministic testing.
///
/// Behaves like the `PostgreSQL` store: tickets come from a counter that
/// starts at [`Ticket::FIRST`] and is never rewound, and titles are unique
/// (a clashing write fails with [`StoreError::DuplicateTitle`]).
///
/// # Example
///
/// ```
/// use tabs_testing::InMemoryTabStore;
/// use tabs_core::store::TabStore;
/// use tabs_core::tab::{TabDraft, Ticket, UserId};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let store = InMemoryTabStore::new();
/// let tab = store
///     .create(TabDraft {
///         user: UserId::new(),
///         title: "Buy milk".to_string(),
///         text: "2%".to_string(),
///         created_at: chrono::Utc::now(),
///     })
///     .await?;
/// assert_eq!(tab.ticket, Ticket::FIRST);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct InMemoryTabStore {
    tabs: Arc<RwLock<Vec<Tab>>>,
    next_ticket: Arc<AtomicI64>,
    write_failure: Arc<RwLock<Option<String>>>,
}

impl InMemoryTabStore {
    /// Create a new empty store
    #[must_use]
    pub fn new() -> Self {
        Self {
            tabs: Arc::new(RwLock::new(Vec::new())),
            next_ticket: Arc::new(AtomicI64::new(Ticket::FIRST.value())),
            write_failure: Arc::new(RwLock::new(None)),
        }
    }

    /// Remove every tab.
    ///
    /// The ticket counter keeps counting, as a database sequence would.
    pub fn clear(&self) {
        self.tabs.write().unwrap().clear();
    }

    /// Number of stored tabs
    #[must_use]
    pub fn len(&self) -> usize {
        self.tabs.read().unwrap().len()
    }

    /// Check if the store is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tabs.read().unwrap().is_empty()
    }

    /// Snapshot of every stored tab, in ticket order
    #[must_use]
    pub fn tabs(&self) -> Vec<Tab> {
        self.tabs.read().unwrap().clone()
    }

    /// Make every subsequent write fail with a database error.
    ///
    /// Pass `None` to restore normal behaviour.
    pub fn fail_writes(&self, message: Option<&str>) {
        *self.write_failure.write().unwrap() = message.map(ToString::to_string);
    }

    fn check_writable(&self) -> Result<(), StoreError> {
        match self.write_failure.read().unwrap().as_ref() {
            Some(message) => Err(StoreError::Database(message.clone())),
            None => Ok(()),
        }
    }

    fn insert(&self, draft: TabDraft) -> Result<Tab, StoreError> {
        self.check_writable()?;

        let mut tabs = self.tabs.write().unwrap();
        if tabs.iter().any(|tab| tab.title == draft.title) {
            return Err(StoreError::DuplicateTitle(draft.title));
        }

        let tab = Tab {
            id: TabId::new(),
            ticket: Ticket::new(self.next_ticket.fetch_add(1, Ordering::SeqCst)),
            user: draft.user,
            title: draft.title,
            text: draft.text,
            completed: false,
            created_at: draft.created_at,
            updated_at: draft.created_at,
        };
        tabs.push(tab.clone());
        Ok(tab)
    }

    fn replace(&self, tab: &Tab) -> Result<Tab, StoreError> {
        self.check_writable()?;

        let mut tabs = self.tabs.write().unwrap();
        if tabs
            .iter()
            .any(|other| other.id != tab.id && other.title == tab.title)
        {
            return Err(StoreError::DuplicateTitle(tab.title.clone()));
        }

        let stored = tabs
            .iter_mut()
            .find(|stored| stored.id == tab.id)
            .ok_or(StoreError::NotFound(tab.id))?;

        stored.user = tab.user;
        stored.title.clone_from(&tab.title);
        stored.text.clone_from(&tab.text);
        stored.completed = tab.completed;
        stored.updated_at = tab.updated_at;
        Ok(stored.clone())
    }

    fn remove(&self, id: TabId) -> Result<Option<Tab>, StoreError> {
        self.check_writable()?;

        let mut tabs = self.tabs.write().unwrap();
        Ok(tabs
            .iter()
            .position(|tab| tab.id == id)
            .map(|index| tabs.remove(index)))
    }
}

impl Default for InMemoryTabStore {
    fn default() -> Self {
        Self::new()
    }
}

impl TabStore for InMemoryTabStore {
    fn find_all(&self) -> StoreFuture<'_, Vec<Tab>> {
        Box::pin(future::ready(Ok(self.tabs())))
    }

    fn find_by_id(&self, id: TabId) -> StoreFuture<'_, Option<Tab>> {
        let found = self
            .tabs
            .read()
            .unwrap()
            .iter()
            .find(|tab| tab.id == id)
            .cloned();
        Box::pin(future::ready(Ok(found)))
    }

    fn find_by_title<'a>(&'a self, title: &'a str) -> StoreFuture<'a, Option<Tab>> {
        let found = self
            .tabs
            .read()
            .unwrap()
            .iter()
            .find(|tab| tab.title == title)
            .cloned();
        Box::pin(future::ready(Ok(found)))
    }

    fn create(&self, draft: TabDraft) -> StoreFuture<'_, Tab> {
        Box::pin(future::ready(self.insert(draft)))
    }

    fn save<'a>(&'a self, tab: &'a Tab) -> StoreFuture<'a, Tab> {
        Box::pin(future::ready(self.replace(tab)))
    }

    fn delete_one(&self, id: TabId) -> StoreFuture<'_, Option<Tab>> {
        Box::pin(future::ready(self.remove(id)))
    }
}

impl StoreHealth for InMemoryTabStore {
    fn ping(&self) -> StoreFuture<'_, ()> {
        Box::pin(future::ready(Ok(())))
    }
}

/// In-memory user directory for testing username enrichment.
///
/// Counts lookups so tests can assert that listing batches them.
///
/// # Example
///
/// ```
/// use tabs_testing::InMemoryUserDirectory;
///
/// let users = InMemoryUserDirectory::new();
/// let alice = users.insert("alice");
/// assert_eq!(users.len(), 1);
/// assert_eq!(users.username(alice).as_deref(), Some("alice"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct InMemoryUserDirectory {
    users: Arc<RwLock<HashMap<UserId, User>>>,
    find_by_id_calls: Arc<AtomicUsize>,
    find_many_calls: Arc<AtomicUsize>,
}

impl InMemoryUserDirectory {
    /// Create an empty directory
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a user with a fresh id
    pub fn insert(&self, username: &str) -> UserId {
        let id = UserId::new();
        self.users.write().unwrap().insert(
            id,
            User {
                id,
                username: username.to_string(),
            },
        );
        id
    }

    /// Remove a user, leaving any tabs that reference it dangling
    pub fn remove(&self, id: UserId) {
        self.users.write().unwrap().remove(&id);
    }

    /// Username for an id, if present
    #[must_use]
    pub fn username(&self, id: UserId) -> Option<String> {
        self.users
            .read()
            .unwrap()
            .get(&id)
            .map(|user| user.username.clone())
    }

    /// Number of users
    #[must_use]
    pub fn len(&self) -> usize {
        self.users.read().unwrap().len()
    }

    /// Check if the directory is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.users.read().unwrap().is_empty()
    }

    /// How many single-user lookups were made
    #[must_use]
    pub fn find_by_id_calls(&self) -> usize {
        self.find_by_id_calls.load(Ordering::SeqCst)
    }

    /// How many batched lookups were made
    #[must_use]
    pub fn find_many_calls(&self) -> usize {
        self.find_many_calls.load(Ordering::SeqCst)
    }
}

impl UserDirectory for InMemoryUserDirectory {
    fn find_by_id(&self, id: UserId) -> StoreFuture<'_, Option<User>> {
        self.find_by_id_calls.fetch_add(1, Ordering::SeqCst);
        let found = self.users.read().unwrap().get(&id).cloned();
        Box::pin(future::ready(Ok(found)))
    }

    fn find_many<'a>(&'a self, ids: &'a [UserId]) -> StoreFuture<'a, Vec<User>> {
        self.find_many_calls.fetch_add(1, Ordering::SeqCst);
        let users = self.users.read().unwrap();
        let found = ids.iter().filter_map(|id| users.get(id).cloned()).collect();
        Box::pin(future::ready(Ok(found)))
    }
}
