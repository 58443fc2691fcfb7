use std::env;
use std::path::Path;
use std::time::Duration;

// Default configuration constants
pub const DEFAULT_HOST: &str = "127.0.0.1";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_API_BASE_URL: &str = "http://localhost:8000";
pub const DEFAULT_INSTANCE_TYPE: &str = "t2.micro";
pub const DEFAULT_POLL_INTERVAL_SECS: u64 = 2;
pub const DEFAULT_POLL_MAX_ATTEMPTS: u32 = 150;
pub const DEFAULT_TERMINATE_GRACE_SECS: u64 = 5;
pub const DEFAULT_NOTIFICATION_TTL_SECS: u64 = 3;
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_api_base_url() -> String {
    sanitize_base_url(&env::var("API_BASE_URL").unwrap_or_else(|_| DEFAULT_API_BASE_URL.to_string()))
}

pub fn get_request_timeout() -> Duration {
    Duration::from_secs(env_u64("REQUEST_TIMEOUT_SECS", DEFAULT_REQUEST_TIMEOUT_SECS))
}

pub fn sanitize_base_url(raw: &str) -> String {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        DEFAULT_API_BASE_URL.to_string()
    } else {
        trimmed.to_string()
    }
}

fn env_u64(key: &str, default: u64) -> u64 {
    env::var(key)
        .ok()
        .and_then(|v| v.trim().parse::<u64>().ok())
        .unwrap_or(default)
}

/// Timing and form defaults used by the instance controller.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ControllerConfig {
    /// Wait between two status checks while polling for a power state.
    pub poll_interval: Duration,
    /// Number of status checks before polling gives up with a timeout.
    pub max_poll_attempts: u32,
    /// Wait between a terminate call and the list refresh that follows it.
    pub terminate_grace: Duration,
    /// How long a notification stays visible.
    pub notification_ttl: Duration,
    pub default_instance_type: String,
}

impl Default for ControllerConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::from_secs(DEFAULT_POLL_INTERVAL_SECS),
            max_poll_attempts: DEFAULT_POLL_MAX_ATTEMPTS,
            terminate_grace: Duration::from_secs(DEFAULT_TERMINATE_GRACE_SECS),
            notification_ttl: Duration::from_secs(DEFAULT_NOTIFICATION_TTL_SECS),
            default_instance_type: DEFAULT_INSTANCE_TYPE.to_string(),
        }
    }
}

impl ControllerConfig {
    pub fn from_env() -> Self {
        let max_poll_attempts = env::var("POLL_MAX_ATTEMPTS")
            .ok()
            .and_then(|v| v.trim().parse::<u32>().ok())
            .filter(|n| *n > 0)
            .unwrap_or(DEFAULT_POLL_MAX_ATTEMPTS);
        let default_instance_type = env::var("DEFAULT_INSTANCE_TYPE")
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or_else(|| DEFAULT_INSTANCE_TYPE.to_string());

        Self {
            poll_interval: Duration::from_secs(env_u64("POLL_INTERVAL_SECS", DEFAULT_POLL_INTERVAL_SECS)),
            max_poll_attempts,
            terminate_grace: Duration::from_secs(env_u64("TERMINATE_GRACE_SECS", DEFAULT_TERMINATE_GRACE_SECS)),
            notification_ttl: Duration::from_secs(env_u64("NOTIFICATION_TTL_SECS", DEFAULT_NOTIFICATION_TTL_SECS)),
            default_instance_type,
        }
    }

    /// Upper bound on the time spent polling for a single action.
    pub fn max_poll_duration(&self) -> Duration {
        self.poll_interval * self.max_poll_attempts
    }
}
