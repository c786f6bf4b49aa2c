//! CLI command handlers.

pub mod browse;
pub mod serve;

use std::sync::Arc;

use quire_core::{Config, FsContentStore};
use quire_tui::{PulldownConverter, SessionOptions};
use tracing::warn;

/// Store, converter and session options for the configured site.
fn site_parts(config: &Config) -> (Arc<FsContentStore>, Arc<PulldownConverter>, SessionOptions) {
    if !config.content_root.is_dir() {
        warn!(
            content_root = %config.content_root.display(),
            "content directory does not exist"
        );
    }
    let options = SessionOptions {
        site_name: config.site_name.clone(),
        high_performance: config.high_performance,
    };
    (
        Arc::new(FsContentStore::new(config.content_root.clone())),
        Arc::new(PulldownConverter),
        options,
    )
}
