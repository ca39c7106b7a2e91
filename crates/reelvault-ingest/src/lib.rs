//! Reelvault Ingest Library
//!
//! The ingestion orchestrator: resolves a URL to a content identity, checks
//! the object store for existing artifacts, runs the extraction capability
//! on a miss, uploads the resulting artifacts, and guarantees cleanup of
//! all transient local state.

pub mod error;
pub mod receipt;
pub mod service;

pub use error::IngestError;
pub use receipt::{ArtifactUrls, FormatMetadata, FormatReport, IngestReceipt};
pub use service::IngestService;
