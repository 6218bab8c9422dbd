use dirs::home_dir;
use std::{
    env, fs,
    path::{Path, PathBuf},
    sync::Once,
};

use crate::errors::LedgerError;

const DEFAULT_DIR_NAME: &str = ".khata_core";

static TRACING_INIT: Once = Once::new();

/// Initializes the global tracing subscriber with sensible defaults.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, EnvFilter};

        let filter =
            EnvFilter::from_default_env().add_directive("khata_core=info".parse().unwrap());

        fmt().with_env_filter(filter).init();
    });
}

/// Returns the application data directory, defaulting to `~/.khata_core`.
pub fn app_data_dir() -> PathBuf {
    if let Some(custom) = env::var_os("KHATA_CORE_HOME") {
        return PathBuf::from(custom);
    }
    home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DEFAULT_DIR_NAME)
}

/// Creates the directory if it does not exist yet.
pub fn ensure_dir(path: &Path) -> Result<(), LedgerError> {
    if !path.exists() {
        fs::create_dir_all(path)?;
    }
    Ok(())
}
