use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::api::InstanceBackend;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::models::PowerState;

/// How often and how long to check an instance's status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollPolicy {
    pub interval: Duration,
    pub max_attempts: u32,
}

impl From<&ControllerConfig> for PollPolicy {
    fn from(config: &ControllerConfig) -> Self {
        Self {
            interval: config.poll_interval,
            max_attempts: config.max_poll_attempts.max(1),
        }
    }
}

/// Check the instance's status until it reports `desired`.
///
/// The first check happens immediately; each non-matching status is followed by one
/// `interval` of sleep. Returns the number of checks made. Fails with
/// `ControllerError::TimedOut` once `max_attempts` checks did not match, and with
/// `ControllerError::Cancelled` as soon as `cancel` fires.
pub async fn wait_for_power_state<B, F>(
    backend: &B,
    instance_id: &str,
    desired: &PowerState,
    policy: PollPolicy,
    cancel: &CancellationToken,
    mut on_check: F,
) -> Result<u32, ControllerError>
where
    B: InstanceBackend + ?Sized,
    F: FnMut(u32, &PowerState),
{
    let cancelled = || ControllerError::Cancelled {
        instance_id: instance_id.to_string(),
    };
    let mut attempts = 0u32;

    loop {
        if cancel.is_cancelled() {
            return Err(cancelled());
        }

        attempts += 1;
        let current = backend.instance_status(instance_id).await?;
        on_check(attempts, &current);
        tracing::debug!(instance_id, attempts, current = %current, desired = %desired, "polled instance status");

        if &current == desired {
            return Ok(attempts);
        }
        if attempts >= policy.max_attempts {
            return Err(ControllerError::TimedOut {
                instance_id: instance_id.to_string(),
                desired: desired.clone(),
                attempts,
            });
        }

        tokio::select! {
            _ = cancel.cancelled() => return Err(cancelled()),
            _ = tokio::time::sleep(policy.interval) => {}
        }
    }
}
