use super::*;

fn valid() -> Config {
    Config::new(
        "trigger@g.us",
        vec!["a@g.us".to_string(), "b@g.us".to_string()],
    )
}

#[test]
fn test_default_sections_validate() {
    assert!(valid().validate().is_ok());
}

#[test]
fn test_defaults_match_documented_values() {
    let config = valid();
    assert_eq!(config.dispatch.min_delay_ms, 5_000);
    assert_eq!(config.dispatch.max_delay_ms, 15_000);
    assert_eq!(config.media.temp_dir, std::path::PathBuf::from("./temp_media"));
    assert_eq!(config.retention.dedup_capacity, 10_000);
    assert_eq!(config.retention.mapping_capacity, 5_000);
    assert_eq!(config.queue_capacity, 1000);
}

#[test]
fn test_invalid_empty_trigger() {
    let mut config = valid();
    config.trigger_group_id = "  ".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_no_targets() {
    let mut config = valid();
    config.target_group_ids.clear();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("targetGroupIds"));
}

#[test]
fn test_invalid_empty_target_entry() {
    let mut config = valid();
    config.target_group_ids.push(String::new());
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_target_is_trigger() {
    let mut config = valid();
    config.target_group_ids.push("trigger@g.us".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("trigger group itself"));
}

#[test]
fn test_invalid_duplicate_target() {
    let mut config = valid();
    config.target_group_ids.push("a@g.us".to_string());
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("duplicate"));
}

#[test]
fn test_invalid_delay_range_inverted() {
    let mut config = valid();
    config.dispatch.min_delay_ms = 20_000;
    config.dispatch.max_delay_ms = 10_000;
    assert!(config.validate().is_err());
}

#[test]
fn test_zero_delay_is_allowed() {
    let mut config = valid();
    config.dispatch.min_delay_ms = 0;
    config.dispatch.max_delay_ms = 0;
    assert!(config.validate().is_ok());
}

#[test]
fn test_invalid_zero_capacities() {
    let mut config = valid();
    config.retention.dedup_capacity = 0;
    assert!(config.validate().is_err());

    let mut config = valid();
    config.retention.mapping_capacity = 0;
    assert!(config.validate().is_err());

    let mut config = valid();
    config.queue_capacity = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_zero_port() {
    let mut config = valid();
    config.gateway.port = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_invalid_bridge_url_scheme() {
    let mut config = valid();
    config.bridge.base_url = "ftp://bridge".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_deserialize_minimal_json() {
    let config: Config = serde_json::from_value(serde_json::json!({
        "triggerGroupId": "123@g.us",
        "targetGroupIds": ["1@g.us", "2@g.us"]
    }))
    .unwrap();
    assert_eq!(config.trigger_group_id, "123@g.us");
    assert_eq!(config.target_group_ids, vec!["1@g.us", "2@g.us"]);
    assert_eq!(config.gateway.port, 18791);
    assert!(config.bridge.token.is_none());
}

#[test]
fn test_deserialize_overrides() {
    let config: Config = serde_json::from_value(serde_json::json!({
        "triggerGroupId": "123@g.us",
        "targetGroupIds": ["1@g.us"],
        "dispatch": {"minDelayMs": 100, "maxDelayMs": 200},
        "media": {"tempDir": "/tmp/gs"},
        "retention": {"dedupCapacity": 5},
        "queueCapacity": 7
    }))
    .unwrap();
    assert_eq!(config.dispatch.min_delay_ms, 100);
    assert_eq!(config.dispatch.max_delay_ms, 200);
    assert_eq!(config.media.temp_dir, std::path::PathBuf::from("/tmp/gs"));
    assert_eq!(config.retention.dedup_capacity, 5);
    assert_eq!(config.retention.mapping_capacity, 5_000);
    assert_eq!(config.queue_capacity, 7);
}

#[test]
fn test_missing_required_keys_fail() {
    let result: Result<Config, _> =
        serde_json::from_value(serde_json::json!({"targetGroupIds": ["1@g.us"]}));
    assert!(result.is_err());
}

#[test]
fn test_debug_redacts_secrets() {
    let mut config = valid();
    config.bridge.token = Some("bridge-secret-token".to_string());
    config.gateway.secret = Some("hmac-secret".to_string());
    let debug = format!("{:?}", config);
    assert!(!debug.contains("bridge-secret-token"));
    assert!(!debug.contains("hmac-secret"));
    assert!(debug.contains("[REDACTED]"));
}
