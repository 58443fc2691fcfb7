use crate::models::create_request::CreateInstanceRequest;

/// The one view the dashboard shows on top of the instance table.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ViewState {
    #[default]
    List,
    CreateForm { draft: CreateInstanceRequest },
    InstanceDetail { instance_id: String },
    ConfirmTerminate { instance_id: String },
}

impl ViewState {
    /// Instance the view is about, if any.
    pub fn instance_id(&self) -> Option<&str> {
        match self {
            ViewState::InstanceDetail { instance_id } | ViewState::ConfirmTerminate { instance_id } => {
                Some(instance_id)
            }
            _ => None,
        }
    }

    pub fn is_create_form(&self) -> bool {
        matches!(self, ViewState::CreateForm { .. })
    }
}
