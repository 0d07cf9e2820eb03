//! # shopkit-api
//!
//! HTTP API layer for shopkit built on Axum.
//!
//! Provides the REST endpoints, the session and authorization middleware,
//! extractors, DTOs, the documentation bundle and error mapping.

pub mod app;
pub mod docs;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod router;
pub mod routes;
pub mod state;
pub mod telemetry;

pub use app::{build_app, build_state, run_server};
pub use state::AppState;
