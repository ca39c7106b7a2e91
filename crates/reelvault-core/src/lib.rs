//! Reelvault Core Library
//!
//! Shared foundation for the reelvault workspace: configuration, content
//! identity resolution, quality tiers, and the metadata models that travel
//! between crates.

pub mod config;
pub mod identity;
pub mod models;
pub mod quality;

// Re-export commonly used types
pub use config::{Config, StorageBackend};
pub use identity::{resolve, ContentIdentity, GENERIC_PROVIDER};
pub use models::{FormatInfo, MediaInfo, ProbeInfo};
pub use quality::Quality;
