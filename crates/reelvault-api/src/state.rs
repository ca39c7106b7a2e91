//! Application state shared across handlers.

use reelvault_core::Config;
use reelvault_ingest::IngestService;
use std::sync::Arc;

pub struct AppState {
    pub config: Config,
    pub ingest: Arc<IngestService>,
}
