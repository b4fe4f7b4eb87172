use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// WhatsApp bridge sidecar (outbound)
// ---------------------------------------------------------------------------

fn default_bridge_url() -> String {
    "http://127.0.0.1:8085".to_string()
}

fn default_bridge_timeout() -> u64 {
    60
}

#[derive(Clone, Serialize, Deserialize)]
pub struct BridgeConfig {
    #[serde(default = "default_bridge_url", rename = "baseUrl")]
    pub base_url: String,
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default = "default_bridge_timeout", rename = "timeoutSecs")]
    pub timeout_secs: u64,
}

redact_debug!(BridgeConfig, base_url, redact_option(token), timeout_secs,);

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            base_url: default_bridge_url(),
            token: None,
            timeout_secs: default_bridge_timeout(),
        }
    }
}

// ---------------------------------------------------------------------------
// Event ingress (inbound)
// ---------------------------------------------------------------------------

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    18791
}

#[derive(Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// HMAC-SHA256 secret the bridge signs event bodies with.
    #[serde(default)]
    pub secret: Option<String>,
}

redact_debug!(GatewayConfig, host, port, redact_option(secret),);

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            secret: None,
        }
    }
}
