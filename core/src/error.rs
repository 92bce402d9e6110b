//! Errors returned by the tab service.
//!
//! [`TabError`] is the request-level taxonomy: every variant is terminal for
//! the request that produced it. The web layer turns each variant into a
//! status code and a JSON `message`.

use crate::store::StoreError;
use thiserror::Error;

/// Message used when a required field is missing or empty.
pub const ALL_FIELDS_REQUIRED: &str = "All fields are required";

/// Message used when a delete request carries no id.
pub const TAB_ID_REQUIRED: &str = "tab ID required";

/// Message used when the referenced tab does not exist.
pub const TAB_NOT_FOUND: &str = "tab not found";

/// Message used when listing finds nothing.
pub const NO_TABS_FOUND: &str = "No tabs found";

/// Message used when a title is already taken.
pub const DUPLICATE_TITLE: &str = "Duplicate tab title";

/// Errors that can occur while handling a tab request.
#[derive(Error, Debug)]
pub enum TabError {
    /// Required input is missing or malformed.
    #[error("{0}")]
    Validation(String),

    /// The referenced tab does not exist, or there is nothing to list.
    #[error("{0}")]
    NotFound(String),

    /// The title is already held by a different tab.
    #[error("{0}")]
    Conflict(String),

    /// The store rejected a write for a reason not classified above.
    #[error("Store rejected write: {0}")]
    Write(#[source] StoreError),

    /// The store failed while reading.
    #[error("Store read failed: {0}")]
    Read(#[source] StoreError),
}

impl TabError {
    /// Missing or empty required field.
    #[must_use]
    pub fn missing_fields() -> Self {
        Self::Validation(ALL_FIELDS_REQUIRED.to_string())
    }

    /// No tab exists for the given id.
    #[must_use]
    pub fn tab_not_found() -> Self {
        Self::NotFound(TAB_NOT_FOUND.to_string())
    }

    /// Title already taken.
    #[must_use]
    pub fn duplicate_title() -> Self {
        Self::Conflict(DUPLICATE_TITLE.to_string())
    }

    /// Classify a store error raised on the write path.
    ///
    /// Known failures keep their meaning; anything else becomes
    /// [`TabError::Write`].
    #[must_use]
    pub fn from_write(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTitle(_) => Self::duplicate_title(),
            StoreError::NotFound(_) => Self::tab_not_found(),
            other => Self::Write(other),
        }
    }
}

impl From<StoreError> for TabError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::DuplicateTitle(_) => Self::duplicate_title(),
            StoreError::NotFound(_) => Self::tab_not_found(),
            other => Self::Read(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tab::TabId;

    #[test]
    fn store_duplicate_becomes_conflict() {
        let err = TabError::from(StoreError::DuplicateTitle("x".to_string()));
        assert!(matches!(err, TabError::Conflict(ref m) if m == DUPLICATE_TITLE));
    }

    #[test]
    fn write_path_keeps_unclassified_failures_apart() {
        let err = TabError::from_write(StoreError::Database("boom".to_string()));
        assert!(matches!(err, TabError::Write(_)));

        let err = TabError::from(StoreError::Database("boom".to_string()));
        assert!(matches!(err, TabError::Read(_)));
    }

    #[test]
    fn write_path_not_found() {
        let err = TabError::from_write(StoreError::NotFound(TabId::new()));
        assert_eq!(err.to_string(), TAB_NOT_FOUND);
    }
}
