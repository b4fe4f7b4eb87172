use crate::config::Config;
use crate::errors::GroupSyncError;
use anyhow::Context;
use fs2::FileExt;
use std::fs;
use std::path::Path;

#[allow(unused_imports)]
use tracing::{info, warn};

/// Config file looked up in the working directory when no path is given.
pub const DEFAULT_CONFIG_FILE: &str = "groups_config.json";

/// Load and validate the mirror configuration.
///
/// Unlike most settings files a missing config is an error: without a trigger
/// group and targets there is nothing to mirror, so callers treat any failure
/// here as fatal.
pub fn load_config(path: &Path) -> Result<Config, GroupSyncError> {
    let config = read_config(path).map_err(|e| GroupSyncError::Config(format!("{e:#}")))?;

    check_file_permissions(path);

    config.validate()?;

    info!(
        "configuration loaded: trigger={}, targets={}",
        config.trigger_group_id,
        config.target_group_ids.len()
    );
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<Config> {
    // Acquire shared (read) lock: allows concurrent readers, blocks during writes
    let file = fs::File::open(path)
        .with_context(|| format!("Failed to open config at {}", path.display()))?;
    file.lock_shared()
        .with_context(|| "Failed to acquire shared lock on config file")?;

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config from {}", path.display()))?;
    // Lock released when `file` drops at end of scope

    let config: Config = serde_json::from_str(&content)
        .with_context(|| format!("Failed to parse config JSON from {}", path.display()))?;
    Ok(config)
}

/// Warn if the config file is readable by group/other. Bridge tokens and the
/// ingress secret live in this file.
#[cfg(unix)]
fn check_file_permissions(path: &Path) {
    use std::os::unix::fs::PermissionsExt;
    use std::sync::Once;

    static WARNED: Once = Once::new();
    WARNED.call_once(|| {
        if let Ok(meta) = std::fs::metadata(path) {
            let mode = meta.permissions().mode();
            if mode & 0o077 != 0 {
                warn!(
                    "config file {} has permissions {:o}, recommend 0600",
                    path.display(),
                    mode & 0o777
                );
            }
        }
    });
}

#[cfg(not(unix))]
fn check_file_permissions(_path: &Path) {
    // Permission checks only apply on unix systems
}
