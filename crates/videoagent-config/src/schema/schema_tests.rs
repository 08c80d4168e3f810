use super::*;

#[test]
fn test_config_default() {
    let config = Config::default();
    assert_eq!(config.server.host, "127.0.0.1");
    assert_eq!(config.server.port, 8000);
    assert_eq!(config.flow.max_concurrent, 5);
    assert!(config.veo.api_key.is_none());
}

#[test]
fn test_flow_config_default() {
    let flow = FlowConfig::default();
    assert_eq!(flow.max_retries, 2);
    assert_eq!(flow.poll_interval_secs, 5);
    assert_eq!(flow.cleanup_interval_secs, 3600);
    assert_eq!(flow.max_age_hours, 24);
    assert_eq!(flow.history_capacity, 100);
    assert_eq!(flow.summary_history, 10);
}

#[test]
fn test_browser_config_default() {
    let browser = BrowserConfig::default();
    assert!(browser.preferred_port.is_none());
    assert_eq!(browser.scan_port_start, 9222);
    assert_eq!(browser.scan_port_end, 9232);
    assert_eq!(browser.tab_keywords.len(), 4);
    assert!(browser.tab_keywords.contains(&"labs.google".to_string()));
    assert_eq!(browser.app_ready_timeout_secs, 60);
}

#[test]
fn test_veo_api_key_from_config() {
    let veo = VeoConfig {
        api_key: Some("veo-key".to_string()),
        ..Default::default()
    };
    assert_eq!(veo.resolve_api_key().as_deref(), Some("veo-key"));
}

#[test]
fn test_veo_blank_api_key_ignored() {
    let veo = VeoConfig {
        api_key: Some("   ".to_string()),
        ..Default::default()
    };
    assert!(veo.resolve_api_key().is_none());
}

#[test]
fn test_config_serialize_roundtrip_keeps_sections() {
    let config = Config::default();
    let text = toml::to_string(&config).unwrap();
    assert!(text.contains("[flow]"));
    assert!(text.contains("[browser]"));
}

#[test]
fn test_port_files_tilde_expanded() {
    let config = BrowserConfig {
        devtools_port_files: vec![
            std::path::PathBuf::from("~/profile/DevToolsActivePort"),
            std::path::PathBuf::from("/abs/DevToolsActivePort"),
        ],
        ..Default::default()
    };
    let expanded = config.expanded_port_files();
    assert!(!expanded[0].to_string_lossy().starts_with('~'));
    assert!(expanded[0].ends_with("profile/DevToolsActivePort"));
    assert_eq!(expanded[1], std::path::PathBuf::from("/abs/DevToolsActivePort"));
}
