//! File logging. The terminal belongs to the UI, so log lines go to
//! `teaser.log` in the data directory.

use std::fs::{self, File, OpenOptions};
use std::path::Path;
use std::sync::Mutex;

use teaser_config::Config;
use tracing_subscriber::EnvFilter;

const LOG_FILE: &str = "teaser.log";
const DEFAULT_FILTER: &str = "info";

/// Install the global subscriber. Logging stays off if the file cannot be opened.
pub fn init() {
    let Some(dir) = Config::data_dir() else {
        return;
    };
    let Some(file) = open_log(&dir) else {
        return;
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    // Fails only when a subscriber is already installed; keep that one
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_ansi(false)
        .with_writer(Mutex::new(file))
        .try_init()
        .ok();
}

fn open_log(dir: &Path) -> Option<File> {
    fs::create_dir_all(dir).ok()?;
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(dir.join(LOG_FILE))
        .ok()
}
