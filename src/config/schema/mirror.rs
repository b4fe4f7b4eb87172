use serde::{Deserialize, Serialize};
use std::path::PathBuf;

// ---------------------------------------------------------------------------
// Dispatch pacing
// ---------------------------------------------------------------------------

fn default_min_delay_ms() -> u64 {
    5_000
}

fn default_max_delay_ms() -> u64 {
    15_000
}

/// Randomized pause taken before every per-group send.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DispatchConfig {
    #[serde(default = "default_min_delay_ms", rename = "minDelayMs")]
    pub min_delay_ms: u64,
    #[serde(default = "default_max_delay_ms", rename = "maxDelayMs")]
    pub max_delay_ms: u64,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            min_delay_ms: default_min_delay_ms(),
            max_delay_ms: default_max_delay_ms(),
        }
    }
}

// ---------------------------------------------------------------------------
// Media staging
// ---------------------------------------------------------------------------

fn default_temp_dir() -> PathBuf {
    PathBuf::from("./temp_media")
}

fn default_max_download_bytes() -> usize {
    64 * 1024 * 1024
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MediaConfig {
    #[serde(default = "default_temp_dir", rename = "tempDir")]
    pub temp_dir: PathBuf,
    #[serde(default = "default_max_download_bytes", rename = "maxDownloadBytes")]
    pub max_download_bytes: usize,
}

impl Default for MediaConfig {
    fn default() -> Self {
        Self {
            temp_dir: default_temp_dir(),
            max_download_bytes: default_max_download_bytes(),
        }
    }
}

// ---------------------------------------------------------------------------
// Retention of dedup ids and mirror mappings
// ---------------------------------------------------------------------------

fn default_dedup_capacity() -> usize {
    10_000
}

fn default_mapping_capacity() -> usize {
    5_000
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetentionConfig {
    #[serde(default = "default_dedup_capacity", rename = "dedupCapacity")]
    pub dedup_capacity: usize,
    #[serde(default = "default_mapping_capacity", rename = "mappingCapacity")]
    pub mapping_capacity: usize,
}

impl Default for RetentionConfig {
    fn default() -> Self {
        Self {
            dedup_capacity: default_dedup_capacity(),
            mapping_capacity: default_mapping_capacity(),
        }
    }
}
