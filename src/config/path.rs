//! Descriptor directory resolution.
//!
//! Resolution order:
//! 1. An explicit directory (`--data-dir` / `STEELKEYS_DATA_DIR`)
//! 2. `<config dir>/steelkeys` when it contains `models.yaml`
//! 3. The descriptors built into the binary

use std::path::{Path, PathBuf};

use tracing::{debug, trace};

use crate::error::{Result, SkError};
use crate::layout::Registry;

/// Name of the per-user descriptor directory.
const APP_DIR: &str = "steelkeys";

/// The per-user descriptor directory, if the platform has a config dir.
pub fn user_data_dir() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join(APP_DIR))
}

/// Open the descriptor registry following the resolution order.
pub fn open_registry(explicit: Option<&Path>) -> Result<Registry> {
    if let Some(dir) = explicit {
        if !dir.join("models.yaml").is_file() {
            return Err(SkError::DescriptorInvalid(format!(
                "{} does not contain models.yaml",
                dir.display()
            )));
        }
        debug!(dir = %dir.display(), "Using explicit descriptor directory");
        return Registry::from_dir(dir);
    }

    if let Some(dir) = user_data_dir() {
        trace!(dir = %dir.display(), "Checking user descriptor directory");
        if dir.join("models.yaml").is_file() {
            debug!(dir = %dir.display(), "Using user descriptor directory");
            return Registry::from_dir(&dir);
        }
    }

    debug!("Using built-in descriptors");
    Registry::builtin()
}
