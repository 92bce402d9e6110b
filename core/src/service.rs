//! Request handling for the tabs resource.
//!
//! [`TabService`] is the controller: each operation is a straight
//! validate → look up → write/query sequence against the injected stores.
//! Input arrives as raw optional fields (whatever the HTTP body held) and is
//! turned into a typed command first, so the operations themselves never see
//! a missing field.
//!
//! # Title uniqueness
//!
//! `create` and `update` look for an existing tab with the target title
//! before writing. The check and the write are separate store calls, so two
//! concurrent writers can both pass it; stores that enforce uniqueness
//! themselves report the loser as [`StoreError::DuplicateTitle`], which
//! surfaces here as the same conflict.
//!
//! [`StoreError::DuplicateTitle`]: crate::store::StoreError::DuplicateTitle

use crate::environment::Clock;
use crate::error::{NO_TABS_FOUND, TAB_ID_REQUIRED, TabError};
use crate::store::{StoreError, TabStore, UserDirectory};
use crate::tab::{Tab, TabChanges, TabDraft, TabId, TabWithUsername, UserId};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, warn};

/// Validated input for creating a tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CreateTab {
    /// Owner
    pub user: UserId,
    /// Title
    pub title: String,
    /// Body text
    pub text: String,
}

impl CreateTab {
    /// Build a command from raw request fields.
    ///
    /// # Errors
    ///
    /// - `Validation("All fields are required")` if any field is missing or empty
    /// - `Validation("Invalid user ID")` if `user` is not an id
    pub fn parse(
        user: Option<String>,
        title: Option<String>,
        text: Option<String>,
    ) -> Result<Self, TabError> {
        let (Some(user), Some(title), Some(text)) = (present(user), present(title), present(text))
        else {
            return Err(TabError::missing_fields());
        };

        Ok(Self {
            user: parse_user_id(&user)?,
            title,
            text,
        })
    }
}

/// Validated input for updating a tab.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct UpdateTab {
    /// Tab to update
    pub id: TabId,
    /// Replacement values
    pub changes: TabChanges,
}

impl UpdateTab {
    /// Build a command from raw request fields.
    ///
    /// `completed` must be an actual boolean; callers pass `None` when the
    /// body had no such field.
    ///
    /// # Errors
    ///
    /// - `Validation("All fields are required")` if any field is missing or empty
    /// - `Validation("Invalid tab ID")` / `Validation("Invalid user ID")` for malformed ids
    pub fn parse(
        id: Option<String>,
        user: Option<String>,
        title: Option<String>,
        text: Option<String>,
        completed: Option<bool>,
    ) -> Result<Self, TabError> {
        let (Some(id), Some(user), Some(title), Some(text), Some(completed)) =
            (present(id), present(user), present(title), present(text), completed)
        else {
            return Err(TabError::missing_fields());
        };

        Ok(Self {
            id: parse_id(&id)?,
            changes: TabChanges {
                user: parse_user_id(&user)?,
                title,
                text,
                completed,
            },
        })
    }
}

/// Parse the id carried by a delete request.
///
/// # Errors
///
/// - `Validation("tab ID required")` if the id is missing or empty
/// - `Validation("Invalid tab ID")` if it is not an id
pub fn parse_tab_id(id: Option<String>) -> Result<TabId, TabError> {
    let id = present(id).ok_or_else(|| TabError::Validation(TAB_ID_REQUIRED.to_string()))?;
    parse_id(&id)
}

fn present(field: Option<String>) -> Option<String> {
    field.filter(|value| !value.is_empty())
}

fn parse_id(raw: &str) -> Result<TabId, TabError> {
    raw.parse()
        .map_err(|_| TabError::Validation("Invalid tab ID".to_string()))
}

fn parse_user_id(raw: &str) -> Result<UserId, TabError> {
    raw.parse()
        .map_err(|_| TabError::Validation("Invalid user ID".to_string()))
}

/// The tabs controller.
///
/// Cheap to share: every dependency sits behind an `Arc`.
#[derive(Clone)]
pub struct TabService {
    tabs: Arc<dyn TabStore>,
    users: Arc<dyn UserDirectory>,
    clock: Arc<dyn Clock>,
}

impl TabService {
    /// Create a service over the given stores and clock.
    #[must_use]
    pub fn new(
        tabs: Arc<dyn TabStore>,
        users: Arc<dyn UserDirectory>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self { tabs, users, clock }
    }

    /// List every tab with its owner's username.
    ///
    /// Usernames are resolved with a single batched lookup over the distinct
    /// owners. A tab whose owner cannot be found is still returned, with no
    /// username.
    ///
    /// # Errors
    ///
    /// - `NotFound("No tabs found")` if the store is empty
    /// - `Read` if either store fails
    #[tracing::instrument(skip(self))]
    pub async fn list(&self) -> Result<Vec<TabWithUsername>, TabError> {
        let tabs = self.tabs.find_all().await?;
        if tabs.is_empty() {
            return Err(TabError::NotFound(NO_TABS_FOUND.to_string()));
        }

        let mut owners: Vec<UserId> = tabs.iter().map(|tab| tab.user).collect();
        owners.sort_unstable();
        owners.dedup();

        let usernames: HashMap<UserId, String> = self
            .users
            .find_many(&owners)
            .await?
            .into_iter()
            .map(|user| (user.id, user.username))
            .collect();

        let listed = tabs
            .into_iter()
            .map(|tab| {
                let username = usernames.get(&tab.user).cloned();
                if username.is_none() {
                    warn!(tab_id = %tab.id, user_id = %tab.user, "Tab owner not found");
                }
                TabWithUsername { tab, username }
            })
            .collect::<Vec<_>>();

        info!(count = listed.len(), owners = owners.len(), "Listed tabs");
        Ok(listed)
    }

    /// Create a tab, assigning the next ticket.
    ///
    /// # Errors
    ///
    /// - `Conflict("Duplicate tab title")` if the title is taken
    /// - `Write` if the store rejects the insert
    /// - `Read` if the duplicate lookup fails
    #[tracing::instrument(skip(self), fields(title = %command.title))]
    pub async fn create(&self, command: CreateTab) -> Result<Tab, TabError> {
        if let Some(existing) = self.tabs.find_by_title(&command.title).await? {
            warn!(existing = %existing.id, "Duplicate tab title on create");
            return Err(conflict());
        }

        let draft = TabDraft {
            user: command.user,
            title: command.title,
            text: command.text,
            created_at: self.clock.now(),
        };

        let tab = self.tabs.create(draft).await.map_err(classify_write)?;

        metrics::counter!("tabs.created").increment(1);
        info!(tab_id = %tab.id, ticket = %tab.ticket, "Tab created");
        Ok(tab)
    }

    /// Replace the mutable fields of an existing tab.
    ///
    /// Keeping a tab's own title is never a conflict.
    ///
    /// # Errors
    ///
    /// - `NotFound("tab not found")` if no tab has this id
    /// - `Conflict("Duplicate tab title")` if a different tab holds the title
    /// - `Write` if the store rejects the update
    #[tracing::instrument(skip(self), fields(tab_id = %command.id))]
    pub async fn update(&self, command: UpdateTab) -> Result<Tab, TabError> {
        let mut tab = self
            .tabs
            .find_by_id(command.id)
            .await?
            .ok_or_else(TabError::tab_not_found)?;

        if let Some(holder) = self.tabs.find_by_title(&command.changes.title).await? {
            if holder.id != tab.id {
                warn!(holder = %holder.id, "Duplicate tab title on update");
                return Err(conflict());
            }
        }

        tab.apply(command.changes, self.clock.now());
        let saved = self.tabs.save(&tab).await.map_err(classify_write)?;

        metrics::counter!("tabs.updated").increment(1);
        info!(ticket = %saved.ticket, "Tab updated");
        Ok(saved)
    }

    /// Delete the tab with this id, returning what was removed.
    ///
    /// # Errors
    ///
    /// - `NotFound("tab not found")` if no tab has this id
    /// - `Write` if the store rejects the delete
    #[tracing::instrument(skip(self))]
    pub async fn delete(&self, id: TabId) -> Result<Tab, TabError> {
        let tab = self
            .tabs
            .find_by_id(id)
            .await?
            .ok_or_else(TabError::tab_not_found)?;

        let removed = self
            .tabs
            .delete_one(tab.id)
            .await
            .map_err(TabError::from_write)?
            .ok_or_else(TabError::tab_not_found)?;

        metrics::counter!("tabs.deleted").increment(1);
        info!(ticket = %removed.ticket, "Tab deleted");
        Ok(removed)
    }
}

fn conflict() -> TabError {
    metrics::counter!("tabs.conflicts").increment(1);
    TabError::duplicate_title()
}

fn classify_write(err: StoreError) -> TabError {
    let err = TabError::from_write(err);
    if matches!(err, TabError::Conflict(_)) {
        metrics::counter!("tabs.conflicts").increment(1);
    }
    err
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::error::ALL_FIELDS_REQUIRED;

    fn some(value: &str) -> Option<String> {
        Some(value.to_string())
    }

    #[test]
    fn create_requires_every_field() {
        let user = UserId::new().to_string();

        for (u, t, x) in [
            (None, some("t"), some("x")),
            (Some(user.clone()), None, some("x")),
            (Some(user.clone()), some("t"), None),
            (Some(user.clone()), some(""), some("x")),
        ] {
            let err = CreateTab::parse(u, t, x).unwrap_err();
            assert_eq!(err.to_string(), ALL_FIELDS_REQUIRED);
        }
    }

    #[test]
    fn create_rejects_malformed_user() {
        let err = CreateTab::parse(some("u1"), some("t"), some("x")).unwrap_err();
        assert!(matches!(err, TabError::Validation(ref m) if m == "Invalid user ID"));
    }

    #[test]
    fn update_requires_boolean_completed() {
        let err = UpdateTab::parse(
            Some(TabId::new().to_string()),
            Some(UserId::new().to_string()),
            some("t"),
            some("x"),
            None,
        )
        .unwrap_err();
        assert_eq!(err.to_string(), ALL_FIELDS_REQUIRED);
    }

    #[test]
    fn update_accepts_false_completed() {
        let command = UpdateTab::parse(
            Some(TabId::new().to_string()),
            Some(UserId::new().to_string()),
            some("t"),
            some("x"),
            Some(false),
        )
        .unwrap();
        assert!(!command.changes.completed);
    }

    #[test]
    fn delete_id_required() {
        let err = parse_tab_id(None).unwrap_err();
        assert_eq!(err.to_string(), TAB_ID_REQUIRED);

        let err = parse_tab_id(some("")).unwrap_err();
        assert_eq!(err.to_string(), TAB_ID_REQUIRED);

        let err = parse_tab_id(some("nope")).unwrap_err();
        assert_eq!(err.to_string(), "Invalid tab ID");
    }
}
