use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle phase of an instance as reported by the backend.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum PowerState {
    Pending,
    Running,
    Stopping,
    Stopped,
    ShuttingDown,
    Terminated,
    /// Any state string this client does not know about, kept verbatim.
    Unknown(String),
}

impl PowerState {
    pub fn as_str(&self) -> &str {
        match self {
            PowerState::Pending => "pending",
            PowerState::Running => "running",
            PowerState::Stopping => "stopping",
            PowerState::Stopped => "stopped",
            PowerState::ShuttingDown => "shutting-down",
            PowerState::Terminated => "terminated",
            PowerState::Unknown(raw) => raw,
        }
    }

    /// Colour class of the state badge in the instance table.
    pub fn badge_variant(&self) -> &'static str {
        match self {
            PowerState::Running => "success",
            PowerState::Stopped => "warning",
            _ => "danger",
        }
    }

    pub fn is_terminated(&self) -> bool {
        matches!(self, PowerState::Terminated)
    }
}

impl From<&str> for PowerState {
    fn from(raw: &str) -> Self {
        match raw.trim().to_lowercase().as_str() {
            "pending" => PowerState::Pending,
            "running" => PowerState::Running,
            "stopping" => PowerState::Stopping,
            "stopped" => PowerState::Stopped,
            "shutting-down" => PowerState::ShuttingDown,
            "terminated" => PowerState::Terminated,
            _ => PowerState::Unknown(raw.to_string()),
        }
    }
}

impl From<String> for PowerState {
    fn from(raw: String) -> Self {
        PowerState::from(raw.as_str())
    }
}

impl From<PowerState> for String {
    fn from(state: PowerState) -> Self {
        state.as_str().to_string()
    }
}

impl fmt::Display for PowerState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_known_states() {
        assert_eq!(PowerState::from("running"), PowerState::Running);
        assert_eq!(PowerState::from("shutting-down"), PowerState::ShuttingDown);
        assert_eq!(PowerState::from(" Stopped "), PowerState::Stopped);
    }

    #[test]
    fn keeps_unknown_states_verbatim() {
        let state = PowerState::from("rebooting");
        assert_eq!(state, PowerState::Unknown("rebooting".into()));
        assert_eq!(state.to_string(), "rebooting");
    }

    #[test]
    fn badge_follows_state() {
        assert_eq!(PowerState::Running.badge_variant(), "success");
        assert_eq!(PowerState::Stopped.badge_variant(), "warning");
        assert_eq!(PowerState::Pending.badge_variant(), "danger");
        assert_eq!(PowerState::Terminated.badge_variant(), "danger");
    }

    #[test]
    fn deserializes_from_json_string() {
        let state: PowerState = serde_json::from_str("\"shutting-down\"").unwrap();
        assert_eq!(state, PowerState::ShuttingDown);
        assert_eq!(serde_json::to_string(&PowerState::Stopping).unwrap(), "\"stopping\"");
    }
}
