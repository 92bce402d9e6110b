//! # Tabs Core
//!
//! Domain types, store contracts and request handling for the tabs service.
//!
//! ## Layers
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  Routes (tabs-web)                      │  ← method + path → handler
//! ├─────────────────────────────────────────┤
//! │  TabService (this crate)                │  ← validation, title uniqueness,
//! │                                         │    username enrichment
//! ├─────────────────────────────────────────┤
//! │  TabStore / UserDirectory (traits)      │  ← Postgres or in-memory
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Example
//!
//! ```ignore
//! use tabs_core::service::{CreateTab, TabService};
//!
//! let service = TabService::new(tabs, users, Arc::new(SystemClock));
//! let command = CreateTab::parse(Some(user), Some("Buy milk".into()), Some("2%".into()))?;
//! let tab = service.create(command).await?;
//! assert_eq!(tab.ticket, Ticket::FIRST);
//! ```

pub mod error;
pub mod service;
pub mod store;
pub mod tab;

pub use error::TabError;
pub use service::{CreateTab, TabService, UpdateTab};
pub use store::{StoreError, StoreFuture, StoreHealth, TabStore, UserDirectory};
pub use tab::{Tab, TabChanges, TabDraft, TabId, TabWithUsername, Ticket, User, UserId};

/// Environment module - injected dependencies
///
/// Services never read the wall clock directly; they ask a [`Clock`] so tests
/// can pin time.
pub mod environment {
    use chrono::{DateTime, Utc};

    /// Clock trait - abstracts time operations for testability
    ///
    /// # Examples
    ///
    /// ```
    /// use tabs_core::environment::{Clock, SystemClock};
    ///
    /// let clock = SystemClock;
    /// let first = clock.now();
    /// assert!(clock.now() >= first);
    /// ```
    pub trait Clock: Send + Sync {
        /// Get the current time
        fn now(&self) -> DateTime<Utc>;
    }

    /// Production clock backed by the system time.
    #[derive(Debug, Clone, Copy, Default)]
    pub struct SystemClock;

    impl Clock for SystemClock {
        fn now(&self) -> DateTime<Utc> {
            Utc::now()
        }
    }
}
