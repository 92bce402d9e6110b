//! HTTP request handlers.

pub mod health;
pub mod tabs;

pub use health::{health_check, readiness_check};
pub use tabs::{create_tab, delete_tab, list_tabs, update_tab};
