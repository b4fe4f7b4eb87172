use serde::{Deserialize, Serialize};
use tracing::warn;

/// Generates a `Debug` impl that redacts secret fields.
///
/// Field specifiers:
/// - `field_name`            : printed normally via `&self.field_name`
/// - `redact_option(field_name)`: `Option<String>` field: shows `None` or `Some("[REDACTED]")`
macro_rules! redact_debug {
    // Internal: emit a single .field() call
    (@field $builder:ident, $self:ident, redact_option($field:ident)) => {
        $builder.field(
            stringify!($field),
            &$self.$field.as_ref().map(|_| "[REDACTED]"),
        );
    };
    (@field $builder:ident, $self:ident, $field:ident) => {
        $builder.field(stringify!($field), &$self.$field);
    };

    // Internal: recursive TT muncher
    (@fields $builder:ident, $self:ident,) => {};
    (@fields $builder:ident, $self:ident, redact_option($field:ident), $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, redact_option($field));
        redact_debug!(@fields $builder, $self, $($rest)*);
    };
    (@fields $builder:ident, $self:ident, $field:ident, $($rest:tt)*) => {
        redact_debug!(@field $builder, $self, $field);
        redact_debug!(@fields $builder, $self, $($rest)*);
    };

    // Entry point
    ($struct_name:ident, $($fields:tt)*) => {
        impl std::fmt::Debug for $struct_name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                let mut builder = f.debug_struct(stringify!($struct_name));
                redact_debug!(@fields builder, self, $($fields)*);
                builder.finish()
            }
        }
    };
}

// Submodules are declared after the macro so they can use `redact_debug!`
mod bridge;
mod mirror;

pub use bridge::*;
pub use mirror::*;

fn default_queue_capacity() -> usize {
    1000
}

// ---------------------------------------------------------------------------
// Top-level Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Source group whose messages are mirrored.
    #[serde(rename = "triggerGroupId")]
    pub trigger_group_id: String,
    /// Groups that receive the mirrored copies, in delivery order.
    #[serde(rename = "targetGroupIds")]
    pub target_group_ids: Vec<String>,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub media: MediaConfig,
    #[serde(default)]
    pub retention: RetentionConfig,
    #[serde(default)]
    pub bridge: BridgeConfig,
    #[serde(default)]
    pub gateway: GatewayConfig,
    #[serde(default = "default_queue_capacity", rename = "queueCapacity")]
    pub queue_capacity: usize,
}

impl Config {
    /// Build a config with default sections for the given trigger and targets.
    pub fn new(trigger_group_id: impl Into<String>, target_group_ids: Vec<String>) -> Self {
        Self {
            trigger_group_id: trigger_group_id.into(),
            target_group_ids,
            dispatch: DispatchConfig::default(),
            media: MediaConfig::default(),
            retention: RetentionConfig::default(),
            bridge: BridgeConfig::default(),
            gateway: GatewayConfig::default(),
            queue_capacity: default_queue_capacity(),
        }
    }

    pub fn validate(&self) -> Result<(), crate::errors::GroupSyncError> {
        self.validate_groups()?;
        self.validate_dispatch()?;
        self.validate_media()?;
        self.validate_retention()?;
        self.validate_endpoints()?;
        Ok(())
    }

    fn validate_groups(&self) -> Result<(), crate::errors::GroupSyncError> {
        use crate::errors::GroupSyncError;

        if self.trigger_group_id.trim().is_empty() {
            return Err(GroupSyncError::Config(
                "triggerGroupId must not be empty".into(),
            ));
        }
        if self.target_group_ids.is_empty() {
            return Err(GroupSyncError::Config(
                "targetGroupIds must list at least one group".into(),
            ));
        }
        let mut seen = std::collections::HashSet::new();
        for (i, target) in self.target_group_ids.iter().enumerate() {
            if target.trim().is_empty() {
                return Err(GroupSyncError::Config(format!(
                    "targetGroupIds[{i}] must not be empty"
                )));
            }
            if *target == self.trigger_group_id {
                return Err(GroupSyncError::Config(format!(
                    "targetGroupIds[{i}] is the trigger group itself"
                )));
            }
            if !seen.insert(target.as_str()) {
                return Err(GroupSyncError::Config(format!(
                    "targetGroupIds contains duplicate group {target}"
                )));
            }
        }
        Ok(())
    }

    fn validate_dispatch(&self) -> Result<(), crate::errors::GroupSyncError> {
        use crate::errors::GroupSyncError;
        let d = &self.dispatch;

        if d.min_delay_ms > d.max_delay_ms {
            return Err(GroupSyncError::Config(
                "dispatch.minDelayMs must be <= dispatch.maxDelayMs".into(),
            ));
        }
        if d.max_delay_ms > 600_000 {
            return Err(GroupSyncError::Config(
                "dispatch.maxDelayMs is unreasonably large (> 10 minutes)".into(),
            ));
        }
        if d.max_delay_ms == 0 {
            warn!("dispatch delay disabled, rapid multi-group sends may trip anti-flood limits");
        }
        Ok(())
    }

    fn validate_media(&self) -> Result<(), crate::errors::GroupSyncError> {
        use crate::errors::GroupSyncError;

        if self.media.temp_dir.as_os_str().is_empty() {
            return Err(GroupSyncError::Config(
                "media.tempDir must not be empty".into(),
            ));
        }
        if self.media.max_download_bytes == 0 {
            return Err(GroupSyncError::Config(
                "media.maxDownloadBytes must be > 0".into(),
            ));
        }
        Ok(())
    }

    fn validate_retention(&self) -> Result<(), crate::errors::GroupSyncError> {
        use crate::errors::GroupSyncError;

        if self.retention.dedup_capacity == 0 {
            return Err(GroupSyncError::Config(
                "retention.dedupCapacity must be > 0".into(),
            ));
        }
        if self.retention.mapping_capacity == 0 {
            return Err(GroupSyncError::Config(
                "retention.mappingCapacity must be > 0".into(),
            ));
        }
        if self.queue_capacity == 0 {
            return Err(GroupSyncError::Config("queueCapacity must be > 0".into()));
        }
        Ok(())
    }

    fn validate_endpoints(&self) -> Result<(), crate::errors::GroupSyncError> {
        use crate::errors::GroupSyncError;

        if self.gateway.port == 0 {
            return Err(GroupSyncError::Config("gateway.port must be > 0".into()));
        }
        let base = self.bridge.base_url.trim();
        if !(base.starts_with("http://") || base.starts_with("https://")) {
            return Err(GroupSyncError::Config(format!(
                "bridge.baseUrl must be an http(s) URL, got '{base}'"
            )));
        }
        if self.bridge.timeout_secs == 0 {
            return Err(GroupSyncError::Config(
                "bridge.timeoutSecs must be > 0".into(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests;
