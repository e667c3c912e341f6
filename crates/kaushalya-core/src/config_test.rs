use std::collections::HashMap;
use std::env::VarError;
use std::path::PathBuf;

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
fn parse_environment_production_is_case_insensitive() {
    assert_eq!(
        parse_environment("Production").unwrap(),
        Environment::Production
    );
}

#[test]
fn parse_environment_unknown_is_rejected() {
    let result = parse_environment("staging");
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KAUSHALYA_ENV"),
        "expected InvalidEnvVar(KAUSHALYA_ENV), got: {result:?}"
    );
}

#[test]
fn build_app_config_uses_defaults_for_empty_env() {
    let map: HashMap<&str, &str> = HashMap::new();
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.env, Environment::Development);
    assert_eq!(cfg.api_base_url, "http://localhost:3085/api");
    assert_eq!(cfg.log_level, "info");
    assert_eq!(cfg.request_timeout_secs, 30);
    assert_eq!(cfg.user_agent, "kaushalya-admin/0.1");
    assert_eq!(cfg.max_retries, 0);
    assert_eq!(cfg.retry_backoff_base_ms, 500);
    assert_eq!(cfg.session_path, PathBuf::from("./.kaushalya/session"));
    assert_eq!(cfg.export_dir, PathBuf::from("."));
    assert!(cfg.admin_credentials().is_none());
}

#[test]
fn base_url_trailing_slash_is_stripped() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_API_BASE_URL", "https://shop.example.com/api/");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.api_base_url, "https://shop.example.com/api");
}

#[test]
fn base_url_without_scheme_is_rejected() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_API_BASE_URL", "localhost:3085/api");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KAUSHALYA_API_BASE_URL"),
        "expected InvalidEnvVar(KAUSHALYA_API_BASE_URL), got: {result:?}"
    );
}

#[test]
fn request_timeout_invalid() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_REQUEST_TIMEOUT_SECS", "not-a-number");
    let result = build_app_config(lookup_from_map(&map));
    assert!(
        matches!(result, Err(ConfigError::InvalidEnvVar { ref var, .. }) if var == "KAUSHALYA_REQUEST_TIMEOUT_SECS"),
        "expected InvalidEnvVar(KAUSHALYA_REQUEST_TIMEOUT_SECS), got: {result:?}"
    );
}

#[test]
fn request_timeout_zero_is_rejected() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_REQUEST_TIMEOUT_SECS", "0");
    assert!(build_app_config(lookup_from_map(&map)).is_err());
}

#[test]
fn max_retries_override() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_MAX_RETRIES", "3");
    map.insert("KAUSHALYA_RETRY_BACKOFF_BASE_MS", "50");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert_eq!(cfg.max_retries, 3);
    assert_eq!(cfg.retry_backoff_base_ms, 50);
}

#[test]
fn admin_credentials_require_both_halves() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_ADMIN_EMAIL", "admin@kaushalyaart.com");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.admin_credentials().is_none());

    map.insert("KAUSHALYA_ADMIN_PASSWORD", "s3cret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let creds = cfg.admin_credentials().unwrap();
    assert_eq!(creds.email, "admin@kaushalyaart.com");
    assert_eq!(creds.password, "s3cret");
}

#[test]
fn blank_admin_password_counts_as_unset() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_ADMIN_EMAIL", "admin@kaushalyaart.com");
    map.insert("KAUSHALYA_ADMIN_PASSWORD", "   ");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    assert!(cfg.admin_password.is_none());
}

#[test]
fn debug_redacts_password() {
    let mut map = HashMap::new();
    map.insert("KAUSHALYA_ADMIN_EMAIL", "admin@kaushalyaart.com");
    map.insert("KAUSHALYA_ADMIN_PASSWORD", "s3cret");
    let cfg = build_app_config(lookup_from_map(&map)).unwrap();
    let rendered = format!("{cfg:?}");
    assert!(!rendered.contains("s3cret"));
    assert!(rendered.contains("[redacted]"));
    let creds = format!("{:?}", cfg.admin_credentials().unwrap());
    assert!(!creds.contains("s3cret"));
}
