use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use tokio::time::Instant;

use crate::api::InstanceBackend;
use crate::config::ControllerConfig;
use crate::error::ControllerError;
use crate::models::{
    ActionStage, CreateInstanceRequest, CreatedInstance, DashboardState, InstanceAction, Notification,
    PendingAction, ViewState,
};
use crate::services::poller::{wait_for_power_state, PollPolicy};

/// What a lifecycle request led to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActionOutcome {
    /// The instance reached the desired state after this many status checks.
    Completed { attempts: u32 },
    /// Terminate opened its confirmation view; nothing was sent yet.
    AwaitingConfirmation,
}

/// Owns the dashboard state and drives every backend interaction.
///
/// Cloning is cheap; clones share the same state, so a clone can be moved into a
/// spawned task while the first one keeps serving snapshots.
pub struct InstanceController<B: ?Sized> {
    backend: Arc<B>,
    config: ControllerConfig,
    state: Arc<Mutex<DashboardState>>,
    next_ticket: Arc<AtomicU64>,
}

impl<B: ?Sized> Clone for InstanceController<B> {
    fn clone(&self) -> Self {
        Self {
            backend: Arc::clone(&self.backend),
            config: self.config.clone(),
            state: Arc::clone(&self.state),
            next_ticket: Arc::clone(&self.next_ticket),
        }
    }
}

impl<B: InstanceBackend + ?Sized> InstanceController<B> {
    pub fn new(backend: Arc<B>, config: ControllerConfig) -> Self {
        Self {
            backend,
            config,
            state: Arc::new(Mutex::new(DashboardState::default())),
            next_ticket: Arc::new(AtomicU64::new(1)),
        }
    }

    pub fn config(&self) -> &ControllerConfig {
        &self.config
    }

    fn state(&self) -> MutexGuard<'_, DashboardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Copy of the current state with expired notifications dropped.
    pub fn snapshot(&self) -> DashboardState {
        let mut state = self.state();
        state.prune_notifications(Instant::now(), self.config.notification_ttl);
        state.clone()
    }

    /// Replace the instance table with a fresh listing.
    pub async fn refresh_instances(&self) -> Result<usize, ControllerError> {
        self.state().list_loading = true;
        let result = self.backend.list_instances().await;

        let mut state = self.state();
        state.list_loading = false;
        match result {
            Ok(instances) => {
                let count = instances.len();
                tracing::info!(count, "instance list refreshed");
                state.instances = instances;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch instances");
                state.notice = Some(Notification::danger(format!("Error fetching instances: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Reload the images offered in the creation form.
    pub async fn refresh_amis(&self) -> Result<usize, ControllerError> {
        self.state().amis_loading = true;
        let result = self.backend.list_amis().await;

        let mut state = self.state();
        state.amis_loading = false;
        match result {
            Ok(amis) => {
                let count = amis.len();
                tracing::debug!(count, "images refreshed");
                state.amis = amis;
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(error = %e, "failed to fetch images");
                state.notice = Some(Notification::danger(format!("Error fetching AMIs: {}", e)));
                Err(e.into())
            }
        }
    }

    /// Show an empty creation form and load the images it offers.
    pub async fn open_create_form(&self) -> Result<usize, ControllerError> {
        self.state().replace_view(ViewState::CreateForm {
            draft: CreateInstanceRequest::new(&self.config.default_instance_type),
        });
        self.refresh_amis().await
    }

    /// Keep the user's form input while the creation view is open.
    pub fn update_draft(&self, draft: CreateInstanceRequest) {
        let mut state = self.state();
        if state.view.is_create_form() {
            state.view = ViewState::CreateForm { draft };
        }
    }

    /// Submit a new instance. Rejected without a backend call when no image is selected.
    pub async fn create_instance(&self, request: CreateInstanceRequest) -> Result<CreatedInstance, ControllerError> {
        if !request.has_image() {
            self.update_draft(request);
            return Err(ControllerError::MissingImage);
        }

        self.state().creating = true;
        tracing::info!(name = %request.name, image_id = %request.image_id, is_spot = request.is_spot, "creating instance");
        let result = self.backend.create_instance(&request).await;

        {
            let mut state = self.state();
            state.creating = false;
            match &result {
                Ok(_) => {
                    state.replace_view(ViewState::List);
                    state.notice = Some(Notification::success("Instance created successfully!"));
                }
                Err(e) => {
                    tracing::warn!(error = %e, "failed to create instance");
                    state.notice = Some(Notification::danger(format!("Error creating instance: {}", e)));
                    if state.view.is_create_form() {
                        state.view = ViewState::CreateForm { draft: request };
                    }
                }
            }
        }

        let created = result?;
        // A failed refresh raises its own notification.
        let _ = self.refresh_instances().await;
        Ok(created)
    }

    pub fn open_instance(&self, instance_id: &str) {
        self.state().replace_view(ViewState::InstanceDetail {
            instance_id: instance_id.to_string(),
        });
    }

    /// Open the terminate confirmation for an instance.
    pub fn request_terminate(&self, instance_id: &str) {
        self.state().replace_view(ViewState::ConfirmTerminate {
            instance_id: instance_id.to_string(),
        });
    }

    /// Dismiss the current view. Cancels a start/stop still polling for the dismissed instance.
    pub fn close_view(&self) {
        self.state().replace_view(ViewState::List);
    }

    /// Start or stop an instance and wait until the backend reports the matching state.
    /// Terminate only opens its confirmation view; see [`Self::confirm_terminate`].
    pub async fn perform_action(&self, action: InstanceAction, instance_id: &str) -> Result<ActionOutcome, ControllerError> {
        if !action.polls_for_state() {
            self.request_terminate(instance_id);
            return Ok(ActionOutcome::AwaitingConfirmation);
        }

        let pending = self.begin_action(action, instance_id);
        let ticket = pending.ticket;
        tracing::info!(instance_id, %action, "issuing instance action");

        if let Err(e) = self.backend.instance_action(action, instance_id).await {
            let err = ControllerError::from(e);
            self.fail_action(ticket, action, &err);
            return Err(err);
        }

        self.set_stage(ticket, ActionStage::Polling { attempts: 0 });
        let polled = wait_for_power_state(
            &*self.backend,
            instance_id,
            &pending.desired_state,
            PollPolicy::from(&self.config),
            &pending.cancel,
            |attempts, _| self.set_stage(ticket, ActionStage::Polling { attempts }),
        )
        .await;

        let attempts = match polled {
            Ok(attempts) => attempts,
            Err(err @ ControllerError::Cancelled { .. }) => {
                tracing::info!(instance_id, %action, "stopped waiting for instance");
                self.finish_action(ticket);
                return Err(err);
            }
            Err(err) => {
                self.fail_action(ticket, action, &err);
                return Err(err);
            }
        };

        tracing::info!(instance_id, %action, attempts, "instance reached desired state");
        self.set_stage(ticket, ActionStage::Refreshing);
        let _ = self.refresh_instances().await;
        self.finish_action(ticket);
        self.close_view_for(instance_id);
        Ok(ActionOutcome::Completed { attempts })
    }

    /// Terminate the instance whose confirmation view is open.
    ///
    /// The list is refreshed after a fixed grace delay whatever state the instance is in by
    /// then, even when the confirmation view was dismissed in the meantime.
    pub async fn confirm_terminate(&self) -> Result<(), ControllerError> {
        let instance_id = match &self.state().view {
            ViewState::ConfirmTerminate { instance_id } => instance_id.clone(),
            _ => return Err(ControllerError::ConfirmationRequired),
        };

        let action = InstanceAction::Terminate;
        let ticket = self.begin_action(action, &instance_id).ticket;
        tracing::info!(instance_id = %instance_id, "terminating instance");

        if let Err(e) = self.backend.instance_action(action, &instance_id).await {
            tracing::warn!(instance_id = %instance_id, error = %e, "failed to terminate instance");
            {
                let mut state = self.state();
                state.notice = Some(Notification::danger(format!("Error terminating instance: {}", e)));
            }
            self.finish_action(ticket);
            return Err(e.into());
        }

        self.set_stage(ticket, ActionStage::GraceDelay);
        tokio::time::sleep(self.config.terminate_grace).await;

        self.set_stage(ticket, ActionStage::Refreshing);
        self.state().notice = Some(Notification::success("Instance terminated successfully!"));
        let _ = self.refresh_instances().await;
        self.finish_action(ticket);
        self.close_view_for(&instance_id);
        Ok(())
    }

    fn begin_action(&self, action: InstanceAction, instance_id: &str) -> PendingAction {
        let ticket = self.next_ticket.fetch_add(1, Ordering::Relaxed);
        let pending = PendingAction::new(ticket, action, instance_id);
        self.state().pending = Some(pending.clone());
        pending
    }

    fn set_stage(&self, ticket: u64, stage: ActionStage) {
        let mut state = self.state();
        if let Some(pending) = state.pending.as_mut().filter(|p| p.ticket == ticket) {
            pending.stage = stage;
        }
    }

    fn finish_action(&self, ticket: u64) {
        let mut state = self.state();
        if state.pending.as_ref().is_some_and(|p| p.ticket == ticket) {
            state.pending = None;
        }
    }

    fn fail_action(&self, ticket: u64, action: InstanceAction, err: &ControllerError) {
        tracing::warn!(%action, error = %err, "instance action failed");
        self.state().action_error = Some(Notification::danger(format!("Failed to {} instance: {}", action, err)));
        self.finish_action(ticket);
    }

    fn close_view_for(&self, instance_id: &str) {
        let mut state = self.state();
        if state.view.instance_id() == Some(instance_id) {
            state.replace_view(ViewState::List);
        }
    }
}
