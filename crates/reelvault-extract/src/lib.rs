//! Reelvault Extract Library
//!
//! The extraction-capability seam: the `Extractor` trait the orchestrator
//! consumes, the explicit `ExtractRequest` options struct, and the yt-dlp
//! subprocess adapter.

pub mod extractor;
pub mod ytdlp;

pub use extractor::{ExtractError, ExtractRequest, Extraction, Extractor};
pub use ytdlp::YtDlpExtractor;
