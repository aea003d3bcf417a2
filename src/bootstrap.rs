//! Startup wiring that runs before the terminal is taken over: the file
//! logger and the task store chosen by the resolved config.

use std::fs::{self, File};
use std::io;
use std::sync::Arc;

use log::info;
use simplelog::{ConfigBuilder, WriteLogger};

use crate::core::config::{ResolvedConfig, StoreKind};
use crate::store::{HttpStore, MemoryStore, StoreError, TaskStore};

/// Starts logging to the configured file. The dashboard owns the terminal, so
/// nothing is ever logged to stdout or stderr.
pub fn init_logging(config: &ResolvedConfig) -> io::Result<()> {
    if let Some(parent) = config.log_file.parent() {
        fs::create_dir_all(parent)?;
    }
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let log_file = File::create(&config.log_file)?;
    // A logger may already be installed (tests, repeated init); keep the first
    let _ = WriteLogger::init(config.log_level, log_config, log_file);
    Ok(())
}

pub fn build_store(config: &ResolvedConfig) -> Result<Arc<dyn TaskStore>, StoreError> {
    match config.store {
        StoreKind::Http => {
            let token = config.access_token.clone().unwrap_or_default();
            let store = HttpStore::new(Some(config.base_url.clone()), token)?;
            Ok(Arc::new(store))
        }
        StoreKind::Offline => {
            info!("Offline task store at {}", config.data_file.display());
            Ok(Arc::new(MemoryStore::open(&config.data_file)?))
        }
    }
}
