//! `quire browse`: the local terminal session.

use std::io::{IsTerminal, stdout};

use anyhow::Result;
use quire_core::Config;
use quire_core::config::paths;
use quire_core::logging::{self, LogTarget};

use super::site_parts;

pub fn run(config: &Config) -> Result<()> {
    if !stdout().is_terminal() {
        anyhow::bail!("Browse mode requires a terminal.\nUse `quire serve` to serve remote clients.");
    }

    let log_dir = paths::log_dir();
    let _guard = logging::init(LogTarget::File(&log_dir))?;

    let (store, converter, options) = site_parts(config);
    quire_tui::run_local(store, converter, options)
}
