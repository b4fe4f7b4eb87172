pub mod loader;
pub mod schema;

pub use loader::{DEFAULT_CONFIG_FILE, load_config};
pub use schema::{BridgeConfig, Config, DispatchConfig, GatewayConfig, MediaConfig, RetentionConfig};
