//! Reelvault Storage Library
//!
//! Object-storage abstraction and implementations: the `ObjectStore` trait,
//! an S3 backend (single-shot and multipart uploads), and a local
//! filesystem backend for development and tests.
//!
//! # Key layout
//!
//! All artifact keys derive from a content identity via the `keys` module:
//!
//! - media: `{provider}/{id}-{quality}.mp4`
//! - info: `{provider}/{id}.json`
//! - subtitle: `{provider}/{id}.vtt`
//!
//! Two requests with the same identity, kind, and quality always produce
//! the identical key; that determinism is what makes the existence check a
//! valid idempotency gate.

pub mod factory;
pub mod keys;
pub mod local;
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_store;
pub use keys::{object_key, ArtifactKind};
pub use local::LocalStore;
pub use s3::S3Store;
pub use traits::{ObjectStore, Presence, StorageError, StorageResult};
