use std::time::Duration;

use tokio::time::Instant;

use crate::models::instance::Instance;
use crate::models::instance_action::PendingAction;
use crate::models::machine_image::MachineImage;
use crate::models::notification::Notification;
use crate::models::view_state::ViewState;

/// Everything the dashboard renders, in one place.
#[derive(Debug, Clone, Default)]
pub struct DashboardState {
    /// Last successful listing, replaced wholesale on refresh.
    pub instances: Vec<Instance>,
    /// Images for the creation form; dropped when the form closes.
    pub amis: Vec<MachineImage>,
    pub list_loading: bool,
    pub amis_loading: bool,
    pub creating: bool,
    pub view: ViewState,
    pub pending: Option<PendingAction>,
    /// General channel: list, create, image and terminate outcomes.
    pub notice: Option<Notification>,
    /// Start/stop failures.
    pub action_error: Option<Notification>,
}

impl DashboardState {
    pub fn instance(&self, instance_id: &str) -> Option<&Instance> {
        self.instances.iter().find(|i| i.id == instance_id)
    }

    /// True while anything is in flight against the backend.
    pub fn is_busy(&self) -> bool {
        self.list_loading || self.amis_loading || self.creating || self.pending.is_some()
    }

    /// Swap in the next view. A start/stop still polling for the instance the outgoing
    /// view was showing is cancelled; terminate always runs to its refresh.
    /// Returns true when something was cancelled.
    pub fn replace_view(&mut self, next: ViewState) -> bool {
        let mut cancelled = false;
        if let (Some(pending), Some(outgoing)) = (&self.pending, self.view.instance_id()) {
            if pending.instance_id == outgoing && pending.action.polls_for_state() && next != self.view {
                tracing::info!(instance_id = %pending.instance_id, action = %pending.action, "view dismissed, cancelling action");
                pending.cancel.cancel();
                cancelled = true;
            }
        }
        if self.view.is_create_form() && !next.is_create_form() {
            self.amis.clear();
        }
        self.view = next;
        cancelled
    }

    pub fn prune_notifications(&mut self, now: Instant, ttl: Duration) {
        if self.notice.as_ref().is_some_and(|n| n.is_expired(now, ttl)) {
            self.notice = None;
        }
        if self.action_error.as_ref().is_some_and(|n| n.is_expired(now, ttl)) {
            self.action_error = None;
        }
    }
}
