//! Reelvault API Library
//!
//! HTTP front end for the ingestion service: request validation, response
//! shaping, application setup, and server lifecycle.

pub mod error;
pub mod handlers;
pub mod setup;
pub mod state;
pub mod telemetry;

pub use error::ErrorResponse;
pub use state::AppState;
