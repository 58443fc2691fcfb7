use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use reqwest::StatusCode;
use serde_json::Value;
use yansi::Paint;

use crate::error::ApiError;

static SILENT: AtomicBool = AtomicBool::new(false);

pub fn set_silent(silent: bool) {
    SILENT.store(silent, Ordering::Relaxed);
}

fn log_output(msg: String) {
    if !SILENT.load(Ordering::Relaxed) {
        println!("{}", msg);
    }
}

/// HTTP client bound to one backend base address.
#[derive(Clone, Debug)]
pub struct ApiClient {
    client: reqwest::Client,
    api_base_url: String,
}

impl ApiClient {
    pub fn new(api_base_url: &str, timeout: Duration) -> Result<Self, ApiError> {
        let client = reqwest::Client::builder()
            .user_agent(format!("ec2dash/{}", env!("CARGO_PKG_VERSION")))
            .timeout(timeout)
            .build()
            .map_err(|e| ApiError::Transport(format!("Failed to create HTTP client: {}", e)))?;
        Ok(Self::from_parts(client, api_base_url))
    }

    pub fn from_parts(client: reqwest::Client, api_base_url: &str) -> Self {
        Self {
            client,
            api_base_url: crate::config::sanitize_base_url(api_base_url),
        }
    }

    pub fn api_base_url(&self) -> &str {
        &self.api_base_url
    }

    pub fn http(&self) -> &reqwest::Client {
        &self.client
    }
}

/// Core HTTP call against the backend.
/// Logs a curl equivalent of the request, and maps non-success statuses to `ApiError::Backend`.
pub async fn api_call(
    client: &reqwest::Client,
    api_base_url: &str,
    method: &str,
    endpoint: &str,
    body: Option<&Value>,
    params: &[(&str, &str)],
) -> Result<Value, ApiError> {
    // --- Curl Logging ---
    let mut url_for_log = format!("{}{}", api_base_url, endpoint);
    if !params.is_empty() {
        let query_string = params
            .iter()
            .map(|(k, v)| format!("{}={}", k, v))
            .collect::<Vec<String>>()
            .join("&");
        url_for_log = format!("{}?{}", url_for_log, query_string);
    }

    let mut parts = Vec::new();
    parts.push(Paint::new("curl").fg(yansi::Color::Green).bold().to_string());
    parts.push(format!("-X {}", Paint::new(method).fg(yansi::Color::Yellow).bold()));
    parts.push(format!("'{}'", Paint::new(&url_for_log).fg(yansi::Color::Cyan)));
    if let Some(d) = body {
        parts.push(format!(
            "{} {}",
            Paint::new("-H").fg(yansi::Color::Magenta),
            Paint::new("'Content-Type: application/json'").fg(yansi::Color::Magenta)
        ));
        let json_str = serde_json::to_string_pretty(d).unwrap_or_default();
        let escaped_json = json_str.replace('\'', "'\\''");
        parts.push(format!(
            "{} {}",
            Paint::new("-d").fg(yansi::Color::Blue),
            Paint::new(format!("'{}'", escaped_json)).fg(yansi::Color::White)
        ));
    }
    log_output(format!("Request:\n{}", parts.join(" ")));
    // --------------------

    let url = format!("{}{}", api_base_url, endpoint);
    let mut req = match method {
        "POST" => client.post(&url),
        "PUT" => client.put(&url),
        "DELETE" => client.delete(&url),
        _ => client.get(&url),
    };
    if !params.is_empty() {
        req = req.query(params);
    }
    if let Some(b) = body {
        req = req.json(b);
    }

    let response = req.send().await.map_err(|e| {
        tracing::warn!(%url, error = %e, "backend request failed");
        ApiError::Transport(e.to_string())
    })?;
    let status = response.status();
    let text = response
        .text()
        .await
        .map_err(|e| ApiError::Transport(e.to_string()))?;

    if !status.is_success() {
        log_output(format!(
            "Response:\n{}",
            Paint::new(format!("HTTP {}: {}", status, text)).fg(yansi::Color::Red)
        ));
        tracing::debug!(%url, %status, "backend returned an error status");
        return Err(ApiError::Backend {
            status: status.as_u16(),
            message: backend_error_message(status, &text),
        });
    }

    // Grayed out so the request line stands out
    log_output(format!("Response:\n{}", Paint::new(&text).rgb(100, 100, 100)));

    serde_json::from_str(&text).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Message to show for a failed call: the `detail` field when the backend sent one, else the body.
pub fn backend_error_message(status: StatusCode, body: &str) -> String {
    if let Ok(value) = serde_json::from_str::<Value>(body) {
        match value.get("detail") {
            Some(Value::String(detail)) => return detail.clone(),
            Some(detail) if !detail.is_null() => return detail.to_string(),
            _ => {}
        }
    }
    let trimmed = body.trim();
    if trimmed.is_empty() {
        format!("HTTP {}", status)
    } else {
        trimmed.to_string()
    }
}
