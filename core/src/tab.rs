//! Domain types for tabs and the users that own them.
//!
//! A [`Tab`] is a titled note owned by a [`User`]. Every tab carries two
//! identities: the system-generated [`TabId`] and a human-friendly [`Ticket`]
//! number handed out by the store in creation order.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

/// Unique identifier for a tab.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TabId(Uuid);

impl TabId {
    /// Creates a new random `TabId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `TabId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for TabId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Unique identifier for a user.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(Uuid);

impl UserId {
    /// Creates a new random `UserId`
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Creates a `UserId` from a UUID
    #[must_use]
    pub const fn from_uuid(id: Uuid) -> Self {
        Self(id)
    }

    /// Returns the inner UUID
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for UserId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for UserId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim()).map(Self)
    }
}

/// Creation-ordered ticket number.
///
/// Tickets are allocated by the store, start at [`Ticket::FIRST`] and are
/// never handed out twice, even after the tab holding one is deleted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Ticket(i64);

impl Ticket {
    /// Ticket assigned to the first tab ever created.
    pub const FIRST: Self = Self(500);

    /// Wraps a raw ticket value
    #[must_use]
    pub const fn new(value: i64) -> Self {
        Self(value)
    }

    /// Returns the raw ticket value
    #[must_use]
    pub const fn value(self) -> i64 {
        self.0
    }
}

impl fmt::Display for Ticket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A persisted tab.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Tab {
    /// Unique identifier, immutable
    pub id: TabId,
    /// Creation-ordered ticket number, immutable
    pub ticket: Ticket,
    /// Owning user
    pub user: UserId,
    /// Title, unique among all tabs
    pub title: String,
    /// Body text
    pub text: String,
    /// Whether the tab is done
    pub completed: bool,
    /// When the tab was created
    pub created_at: DateTime<Utc>,
    /// When the tab was last written
    pub updated_at: DateTime<Utc>,
}

impl Tab {
    /// Replaces every mutable field wholesale.
    ///
    /// `id`, `ticket` and `created_at` are left untouched.
    pub fn apply(&mut self, update: TabChanges, updated_at: DateTime<Utc>) {
        self.user = update.user;
        self.title = update.title;
        self.text = update.text;
        self.completed = update.completed;
        self.updated_at = updated_at;
    }
}

/// The mutable part of a tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabChanges {
    /// New owner
    pub user: UserId,
    /// New title
    pub title: String,
    /// New text
    pub text: String,
    /// New completion flag
    pub completed: bool,
}

/// Everything a store needs to insert a tab.
///
/// The store assigns `id` and `ticket`; new tabs always start uncompleted.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TabDraft {
    /// Owning user
    pub user: UserId,
    /// Title
    pub title: String,
    /// Body text
    pub text: String,
    /// Creation timestamp, also used as the initial `updated_at`
    pub created_at: DateTime<Utc>,
}

/// A user as seen from the tabs service (read-only).
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// Unique identifier
    pub id: UserId,
    /// Display name
    pub username: String,
}

/// A tab enriched with its owner's username for listing.
///
/// `username` is `None` when the referenced user no longer exists.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TabWithUsername {
    /// The tab itself
    #[serde(flatten)]
    pub tab: Tab,
    /// Owner's username, resolved at read time
    pub username: Option<String>,
}
