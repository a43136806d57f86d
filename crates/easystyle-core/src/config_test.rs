use std::collections::HashMap;
use std::env::VarError;

use super::*;

fn lookup_from_map<'a>(
    map: &'a HashMap<&'a str, &'a str>,
) -> impl Fn(&str) -> Result<String, VarError> + 'a {
    move |key| {
        map.get(key)
            .map(|v| (*v).to_string())
            .ok_or(VarError::NotPresent)
    }
}

#[test]
fn parse_environment_development() {
    assert_eq!(
        parse_environment("development").unwrap(),
        Environment::Development
    );
}

#[test]
fn parse_environment_test() {
    assert_eq!(parse_environment("test").unwrap(), Environment::Test);
}

#[test]
fn parse_environment_production() {
    assert_eq!(
        parse_environment("production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_fails() {
    let err = parse_environment("staging").unwrap_err();
    assert!(matches!(err, ConfigError::InvalidEnvVar { ref var, .. } if var == "EASYSTYLE_ENV"));
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).expect("defaults should be valid");
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.api_base_url, "http://localhost:8000/api");
    assert_eq!(cfg.storage_dir.to_string_lossy(), "./.easystyle");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert!(cfg.gemini_api_key.is_none());
    assert_eq!(
        cfg.gemini_base_url,
        "https://generativelanguage.googleapis.com"
    );
    assert_eq!(cfg.text_model, "gemini-2.5-flash");
    assert_eq!(cfg.image_model, "gemini-2.5-flash-image-preview");
    assert_eq!(cfg.ai_timeout_secs, 60);
    assert_eq!(cfg.max_products, 5);
    assert_eq!(cfg.image_max_dimension, 1024);
    assert_eq!(cfg.image_quality, 85);
}

#[test]
fn build_app_config_reads_api_key() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.gemini_api_key.as_deref(), Some("secret-key"));
}

#[test]
fn build_app_config_treats_empty_api_key_as_missing() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.gemini_api_key.is_none());
}

#[test]
fn debug_output_redacts_api_key() {
    let mut map = HashMap::new();
    map.insert("GEMINI_API_KEY", "secret-key");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("secret-key"), "key leaked: {rendered}");
    assert!(rendered.contains("[redacted]"));
}

#[test]
fn request_timeout_override() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_REQUEST_TIMEOUT_SECS", "5");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.request_timeout_secs, 5);
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_REQUEST_TIMEOUT_SECS", "soon");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EASYSTYLE_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(EASYSTYLE_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn max_products_override() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_MAX_PRODUCTS", "3");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_products, 3);
}

#[test]
fn max_products_invalid() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_MAX_PRODUCTS", "-1");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EASYSTYLE_MAX_PRODUCTS"),
        "expected InvalidEnvVar(EASYSTYLE_MAX_PRODUCTS), got: {result:?}"
    );
}

#[test]
fn image_max_dimension_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_IMAGE_MAX_DIMENSION", "0");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EASYSTYLE_IMAGE_MAX_DIMENSION"),
        "expected InvalidEnvVar(EASYSTYLE_IMAGE_MAX_DIMENSION), got: {result:?}"
    );
}

#[test]
fn image_quality_out_of_range_is_rejected() {
    for raw in ["0", "101", "abc"] {
        let mut map = HashMap::new();
        map.insert("EASYSTYLE_IMAGE_QUALITY", raw);
        let result = build_app_config(lookup_from_map(&map));
        assert!(
            matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "EASYSTYLE_IMAGE_QUALITY"),
            "expected InvalidEnvVar(EASYSTYLE_IMAGE_QUALITY) for {raw}, got: {result:?}"
        );
    }
}

#[test]
fn ai_timeout_override() {
    let mut map = HashMap::new();
    map.insert("EASYSTYLE_AI_TIMEOUT_SECS", "15");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.ai_timeout_secs, 15);
}
