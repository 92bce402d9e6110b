//! Axum HTTP surface for the tabs service.
//!
//! Handlers stay thin: extract the JSON body, call [`TabService`], map the
//! result onto a status code and body.
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │  build_router                           │  ← correlation ids, tracing
//! │    /health, /health/ready               │
//! │    /tabs  (GET, POST, PATCH, DELETE)    │
//! ├─────────────────────────────────────────┤
//! │  handlers  →  TabService                │  ← TabError → AppError
//! └─────────────────────────────────────────┘
//! ```
//!
//! # Example
//!
//! ```ignore
//! use tabs_web::{AppState, build_router};
//!
//! let app = build_router(AppState::new(service, Arc::new(tab_store)));
//! axum::serve(listener, app).await?;
//! ```
//!
//! [`TabService`]: tabs_core::TabService

#![forbid(unsafe_code)]
#![warn(missing_docs, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::AppError;
pub use extractors::JsonBody;
pub use middleware::{CORRELATION_ID_HEADER, with_request_tracking};
pub use routes::{build_router, tabs_router};
pub use state::AppState;
