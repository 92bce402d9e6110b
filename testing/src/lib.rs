//! # Tabs Testing
//!
//! Testing utilities and helpers for the tabs service.
//!
//! This crate provides:
//! - In-memory implementations of the store traits
//! - Deterministic clocks
//! - Fixture builders for common scenarios
//! - Property-based testing strategies
//!
//! ## Example
//!
//! ```ignore
//! use tabs_testing::{test_service, InMemoryTabStore, InMemoryUserDirectory};
//!
//! #[tokio::test]
//! async fn creates_first_ticket() {
//!     let (service, tabs, users) = test_service();
//!     let alice = users.insert("alice");
//!     let tab = service.create(create_command(alice, "Buy milk", "2%")).await.unwrap();
//!     assert_eq!(tab.ticket, Ticket::FIRST);
//! }
//! ```

pub mod store_mocks;

use chrono::{DateTime, Utc};
use tabs_core::environment::Clock;

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::Mutex;

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use tabs_testing::mocks::FixedClock;
    /// use tabs_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let time1 = clock.now();
    /// let time2 = clock.now();
    /// assert_eq!(time1, time2); // Always the same!
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Clock that moves forward by a fixed step on every read.
    ///
    /// Lets tests tell a creation timestamp from an update timestamp.
    #[derive(Debug)]
    pub struct SteppingClock {
        next: Mutex<DateTime<Utc>>,
        step: chrono::Duration,
    }

    impl SteppingClock {
        /// Start at `start`, advancing by `step` after each call
        #[must_use]
        pub const fn new(start: DateTime<Utc>, step: chrono::Duration) -> Self {
            Self {
                next: Mutex::new(start),
                step,
            }
        }
    }

    impl Clock for SteppingClock {
        #[allow(clippy::unwrap_used)] // Poisoned only if a test already panicked
        fn now(&self) -> DateTime<Utc> {
            let mut next = self.next.lock().unwrap();
            let now = *next;
            *next = now + self.step;
            now
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    ///
    /// # Panics
    ///
    /// This function will panic if the hardcoded timestamp fails to parse,
    /// which should never happen in practice.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2025-01-01T00:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }

    /// Stepping clock starting at the [`test_clock`] instant, one minute per read.
    #[must_use]
    pub fn stepping_clock() -> SteppingClock {
        SteppingClock::new(test_clock().now(), chrono::Duration::minutes(1))
    }
}

/// Test helpers and utilities
pub mod helpers {
    use crate::store_mocks::{InMemoryTabStore, InMemoryUserDirectory};
    use std::sync::Arc;
    use tabs_core::environment::Clock;
    use tabs_core::service::{CreateTab, TabService};
    use tabs_core::tab::UserId;

    /// Service wired to fresh in-memory stores and the given clock.
    ///
    /// Returns the store handles too, for seeding and inspection.
    #[must_use]
    pub fn service_with_clock(
        clock: Arc<dyn Clock>,
    ) -> (TabService, InMemoryTabStore, InMemoryUserDirectory) {
        let tabs = InMemoryTabStore::new();
        let users = InMemoryUserDirectory::new();
        let service = TabService::new(Arc::new(tabs.clone()), Arc::new(users.clone()), clock);
        (service, tabs, users)
    }

    /// Service wired to fresh in-memory stores and a stepping clock.
    #[must_use]
    pub fn test_service() -> (TabService, InMemoryTabStore, InMemoryUserDirectory) {
        service_with_clock(Arc::new(crate::mocks::stepping_clock()))
    }

    /// Build a create command without going through request parsing.
    #[must_use]
    pub fn create_command(user: UserId, title: &str, text: &str) -> CreateTab {
        CreateTab {
            user,
            title: title.to_string(),
            text: text.to_string(),
        }
    }

    /// Install a test-friendly tracing subscriber once per process.
    ///
    /// Honours `RUST_LOG`; later calls are no-ops.
    pub fn init_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;

    /// Non-empty titles drawn from a small alphabet so collisions are common.
    pub fn colliding_title() -> impl Strategy<Value = String> {
        "[ab]{1,3}"
    }

    /// Sequences of titles to create, with plenty of repeats.
    pub fn title_batch() -> impl Strategy<Value = Vec<String>> {
        prop::collection::vec(colliding_title(), 1..40)
    }
}

// Re-export commonly used items
pub use helpers::{create_command, init_tracing, service_with_clock, test_service};
pub use mocks::{FixedClock, SteppingClock, stepping_clock, test_clock};
pub use store_mocks::{InMemoryTabStore, InMemoryUserDirectory};
