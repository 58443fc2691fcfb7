use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tokio_util::sync::CancellationToken;

use crate::models::power_state::PowerState;

/// Lifecycle command accepted by `POST /api/aws/<action>`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InstanceAction {
    Start,
    Stop,
    Terminate,
}

impl InstanceAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Start => "start",
            Self::Stop => "stop",
            Self::Terminate => "terminate",
        }
    }

    /// State the instance is expected to reach once the action completes.
    pub fn desired_state(&self) -> PowerState {
        match self {
            Self::Start => PowerState::Running,
            Self::Stop => PowerState::Stopped,
            Self::Terminate => PowerState::Terminated,
        }
    }

    /// Start and stop are confirmed by polling; terminate is not.
    pub fn polls_for_state(&self) -> bool {
        !matches!(self, Self::Terminate)
    }
}

impl FromStr for InstanceAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "start" => Ok(Self::Start),
            "stop" => Ok(Self::Stop),
            "terminate" => Ok(Self::Terminate),
            other => Err(format!("unknown instance action: {}", other)),
        }
    }
}

impl fmt::Display for InstanceAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Where an in-flight action currently is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionStage {
    Issuing,
    Polling { attempts: u32 },
    GraceDelay,
    Refreshing,
}

impl ActionStage {
    pub fn label(&self) -> String {
        match self {
            ActionStage::Issuing => "Sending request".into(),
            ActionStage::Polling { attempts } => format!("Waiting for state change (check {})", attempts),
            ActionStage::GraceDelay => "Waiting for the backend to settle".into(),
            ActionStage::Refreshing => "Refreshing instances".into(),
        }
    }
}

/// An action plus its confirmation cycle. Lives until the cycle ends or the view closes.
#[derive(Debug, Clone)]
pub struct PendingAction {
    pub ticket: u64,
    pub instance_id: String,
    pub action: InstanceAction,
    pub desired_state: PowerState,
    pub stage: ActionStage,
    pub cancel: CancellationToken,
}

impl PendingAction {
    pub fn new(ticket: u64, action: InstanceAction, instance_id: &str) -> Self {
        Self {
            ticket,
            instance_id: instance_id.to_string(),
            action,
            desired_state: action.desired_state(),
            stage: ActionStage::Issuing,
            cancel: CancellationToken::new(),
        }
    }
}
