use ec2dash::config::{self, ControllerConfig};
use once_cell::sync::Lazy;
use std::env;
use std::sync::Mutex;
use std::time::Duration;

// Tests in this file mutate process environment variables.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

const CONTROLLER_VARS: [&str; 5] = [
    "POLL_INTERVAL_SECS",
    "POLL_MAX_ATTEMPTS",
    "TERMINATE_GRACE_SECS",
    "NOTIFICATION_TTL_SECS",
    "DEFAULT_INSTANCE_TYPE",
];

fn clear_controller_vars() {
    for key in CONTROLLER_VARS {
        env::remove_var(key);
    }
}

#[test]
fn test_sanitize_base_url_removes_trailing_slash() {
    assert_eq!(
        config::sanitize_base_url("http://backend.internal:8000/"),
        "http://backend.internal:8000"
    );
}

#[test]
fn test_sanitize_base_url_multiple_trailing_slashes() {
    assert_eq!(
        config::sanitize_base_url("http://backend.internal:8000///"),
        "http://backend.internal:8000"
    );
}

#[test]
fn test_sanitize_base_url_with_whitespace() {
    assert_eq!(
        config::sanitize_base_url("  http://backend.internal:8000/  "),
        "http://backend.internal:8000"
    );
}

#[test]
fn test_sanitize_base_url_empty_falls_back_to_default() {
    assert_eq!(config::sanitize_base_url(""), config::DEFAULT_API_BASE_URL);
    assert_eq!(config::sanitize_base_url("   "), config::DEFAULT_API_BASE_URL);
}

#[test]
fn test_get_api_base_url_from_env() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("API_BASE_URL", "http://10.0.0.5:8000/");

    assert_eq!(config::get_api_base_url(), "http://10.0.0.5:8000");

    env::remove_var("API_BASE_URL");
}

#[test]
fn test_get_api_base_url_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::remove_var("API_BASE_URL");

    assert_eq!(config::get_api_base_url(), "http://localhost:8000");
}

#[test]
fn test_request_timeout_ignores_garbage() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("REQUEST_TIMEOUT_SECS", "soon");
    assert_eq!(config::get_request_timeout(), Duration::from_secs(30));

    env::set_var("REQUEST_TIMEOUT_SECS", "7");
    assert_eq!(config::get_request_timeout(), Duration::from_secs(7));

    env::remove_var("REQUEST_TIMEOUT_SECS");
}

#[test]
fn test_controller_config_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    clear_controller_vars();

    let cfg = ControllerConfig::from_env();
    assert_eq!(cfg, ControllerConfig::default());
    assert_eq!(cfg.poll_interval, Duration::from_secs(2));
    assert_eq!(cfg.max_poll_attempts, 150);
    assert_eq!(cfg.terminate_grace, Duration::from_secs(5));
    assert_eq!(cfg.notification_ttl, Duration::from_secs(3));
    assert_eq!(cfg.default_instance_type, "t2.micro");
    assert_eq!(cfg.max_poll_duration(), Duration::from_secs(300));
}

#[test]
fn test_controller_config_overrides() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("POLL_INTERVAL_SECS", "1");
    env::set_var("POLL_MAX_ATTEMPTS", "10");
    env::set_var("TERMINATE_GRACE_SECS", "0");
    env::set_var("NOTIFICATION_TTL_SECS", "8");
    env::set_var("DEFAULT_INSTANCE_TYPE", " t3.small ");

    let cfg = ControllerConfig::from_env();
    clear_controller_vars();

    assert_eq!(cfg.poll_interval, Duration::from_secs(1));
    assert_eq!(cfg.max_poll_attempts, 10);
    assert_eq!(cfg.terminate_grace, Duration::ZERO);
    assert_eq!(cfg.notification_ttl, Duration::from_secs(8));
    assert_eq!(cfg.default_instance_type, "t3.small");
}

#[test]
fn test_controller_config_rejects_zero_attempts_and_blank_type() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("POLL_MAX_ATTEMPTS", "0");
    env::set_var("DEFAULT_INSTANCE_TYPE", "   ");

    let cfg = ControllerConfig::from_env();
    clear_controller_vars();

    assert_eq!(cfg.max_poll_attempts, config::DEFAULT_POLL_MAX_ATTEMPTS);
    assert_eq!(cfg.default_instance_type, config::DEFAULT_INSTANCE_TYPE);
}
