use askama::Template;

use ec2dash::models::{CreateInstanceRequest, DashboardState, Instance, MachineImage, Notification, ViewState};

pub struct NoticeView {
    pub message: String,
    pub css_class: &'static str,
}

impl From<&Notification> for NoticeView {
    fn from(n: &Notification) -> Self {
        Self {
            message: n.message.clone(),
            css_class: n.kind.css_class(),
        }
    }
}

pub struct CreateFormView<'a> {
    pub draft: &'a CreateInstanceRequest,
    pub amis: &'a [MachineImage],
    pub amis_loading: bool,
    pub creating: bool,
}

pub struct DetailView<'a> {
    pub instance_id: String,
    pub instance: Option<&'a Instance>,
    pub action_in_flight: bool,
    pub show_power_toggle: bool,
    pub can_start: bool,
    pub can_stop: bool,
    pub can_terminate: bool,
}

#[derive(Template)]
#[template(path = "dashboard.html")]
pub struct DashboardTemplate<'a> {
    pub api_hostname: String,
    pub version: &'static str,
    pub auto_refresh: bool,
    pub notice: Option<NoticeView>,
    pub action_error: Option<NoticeView>,
    pub instances: &'a [Instance],
    pub list_loading: bool,
    pub pending_label: Option<String>,
    pub create_form: Option<CreateFormView<'a>>,
    pub detail: Option<DetailView<'a>>,
    pub confirm_terminate: Option<String>,
}

impl<'a> DashboardTemplate<'a> {
    pub fn from_state(state: &'a DashboardState, api_hostname: String) -> Self {
        let pending_label = state
            .pending
            .as_ref()
            .map(|p| format!("{} {}: {}", p.action, p.instance_id, p.stage.label()));

        let mut create_form = None;
        let mut detail = None;
        let mut confirm_terminate = None;
        match &state.view {
            ViewState::List => {}
            ViewState::CreateForm { draft } => {
                create_form = Some(CreateFormView {
                    draft,
                    amis: &state.amis,
                    amis_loading: state.amis_loading,
                    creating: state.creating,
                });
            }
            ViewState::InstanceDetail { instance_id } => {
                let action_in_flight = state.pending.as_ref().is_some_and(|p| &p.instance_id == instance_id);
                let instance = state.instance(instance_id);
                let power = instance.map(|i| i.power_state.as_str()).unwrap_or("");
                let terminated = instance.is_some_and(Instance::is_terminated);
                detail = Some(DetailView {
                    instance_id: instance_id.clone(),
                    instance,
                    action_in_flight,
                    show_power_toggle: !terminated,
                    can_start: power != "running" && !action_in_flight,
                    can_stop: power != "stopped" && !action_in_flight,
                    can_terminate: !terminated && !action_in_flight,
                });
            }
            ViewState::ConfirmTerminate { instance_id } => {
                confirm_terminate = Some(instance_id.clone());
            }
        }

        Self {
            api_hostname,
            version: env!("CARGO_PKG_VERSION"),
            // Reload while work is in flight, and once more so an expired toast disappears.
            auto_refresh: state.is_busy() || state.notice.is_some() || state.action_error.is_some(),
            notice: state.notice.as_ref().map(NoticeView::from),
            action_error: state.action_error.as_ref().map(NoticeView::from),
            instances: &state.instances,
            list_loading: state.list_loading,
            pending_label,
            create_form,
            detail,
            confirm_terminate,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ec2dash::models::{InstanceAction, PendingAction};

    fn instance(id: &str, power_state: &str) -> Instance {
        serde_json::from_value(serde_json::json!({
            "instance_id": id,
            "name": "web",
            "power_state": power_state,
        }))
        .unwrap()
    }

    fn detail_state(id: &str, power_state: &str) -> DashboardState {
        DashboardState {
            instances: vec![instance(id, power_state)],
            view: ViewState::InstanceDetail { instance_id: id.into() },
            ..Default::default()
        }
    }

    #[test]
    fn running_instance_can_only_stop() {
        let state = detail_state("i-1", "running");
        let page = DashboardTemplate::from_state(&state, "localhost:8000".into());
        let detail = page.detail.as_ref().expect("detail view");
        assert!(detail.show_power_toggle);
        assert!(!detail.can_start);
        assert!(detail.can_stop);
        assert!(detail.can_terminate);
        assert!(!page.auto_refresh);
    }

    #[test]
    fn terminated_instance_hides_toggle_and_terminate() {
        let state = detail_state("i-1", "terminated");
        let page = DashboardTemplate::from_state(&state, String::new());
        let detail = page.detail.as_ref().expect("detail view");
        assert!(!detail.show_power_toggle);
        assert!(!detail.can_terminate);

        let html = page.render().unwrap();
        assert!(html.contains("Edit Instance: i-1"));
        assert!(!html.contains("/instance/i-1/start"));
    }

    #[test]
    fn in_flight_action_only_locks_its_own_instance() {
        let mut state = detail_state("i-1", "stopped");
        state.pending = Some(PendingAction::new(1, InstanceAction::Start, "i-1"));
        let page = DashboardTemplate::from_state(&state, String::new());
        assert!(page.detail.as_ref().is_some_and(|d| d.action_in_flight && !d.can_start));
        assert!(page.auto_refresh);

        state.pending = Some(PendingAction::new(2, InstanceAction::Stop, "i-9"));
        let page = DashboardTemplate::from_state(&state, String::new());
        assert!(page.detail.as_ref().is_some_and(|d| !d.action_in_flight && d.can_start));
    }

    #[test]
    fn confirm_view_renders_its_modal() {
        let state = DashboardState {
            view: ViewState::ConfirmTerminate { instance_id: "i-7".into() },
            ..Default::default()
        };
        let page = DashboardTemplate::from_state(&state, String::new());
        assert_eq!(page.confirm_terminate.as_deref(), Some("i-7"));
        assert!(page.detail.is_none());

        let html = page.render().unwrap();
        assert!(html.contains("Confirm Termination"));
        assert!(html.contains("terminate instance i-7?"));
        assert!(html.contains("action=\"/terminate/confirm\""));
    }
}
