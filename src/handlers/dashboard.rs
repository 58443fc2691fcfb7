use axum::{
    extract::{Form, State},
    response::IntoResponse,
};
use serde::Deserialize;

use ec2dash::models::CreateInstanceRequest;
use ec2dash::ControllerError;

use crate::app_state::AppState;
use crate::templates::DashboardTemplate;
use super::helpers::{back_to_dashboard, hostname_from_url, render_template};

#[derive(Deserialize)]
pub struct CreateInstanceForm {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub owner: String,
    #[serde(default)]
    pub instance_type: String,
    #[serde(default)]
    pub department: String,
    #[serde(default)]
    pub image_id: String,
    /// Present only when the checkbox is ticked.
    #[serde(default)]
    pub is_spot: Option<String>,
}

impl CreateInstanceForm {
    pub fn into_request(self) -> CreateInstanceRequest {
        CreateInstanceRequest {
            name: self.name.trim().to_string(),
            owner: self.owner.trim().to_string(),
            instance_type: self.instance_type.trim().to_string(),
            department: self.department.trim().to_string(),
            image_id: self.image_id.trim().to_string(),
            is_spot: self.is_spot.is_some(),
        }
    }
}

pub async fn dashboard_get(State(state): State<AppState>) -> impl IntoResponse {
    let snapshot = state.controller.snapshot();
    render_template(DashboardTemplate::from_state(
        &snapshot,
        hostname_from_url(&state.api_base_url),
    ))
}

pub async fn refresh_post(State(state): State<AppState>) -> impl IntoResponse {
    // Failures land in the notification channel.
    let _ = state.controller.refresh_instances().await;
    back_to_dashboard()
}

pub async fn create_open_post(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.controller.open_create_form().await;
    back_to_dashboard()
}

pub async fn amis_refresh_post(State(state): State<AppState>) -> impl IntoResponse {
    let _ = state.controller.refresh_amis().await;
    back_to_dashboard()
}

pub async fn create_post(
    State(state): State<AppState>,
    Form(form): Form<CreateInstanceForm>,
) -> impl IntoResponse {
    let request = form.into_request();
    if !request.has_image() {
        // The select is `required`; a missing image means the browser skipped validation.
        state.controller.update_draft(request);
        return back_to_dashboard();
    }
    state.controller.update_draft(request.clone());

    let controller = state.controller.clone();
    tokio::spawn(async move {
        match controller.create_instance(request).await {
            Ok(created) => tracing::info!(instance_id = ?created.instance_id, "instance created"),
            Err(ControllerError::MissingImage) => tracing::debug!("create rejected without image"),
            Err(e) => tracing::debug!(error = %e, "create failed"),
        }
    });
    back_to_dashboard()
}

pub async fn close_post(State(state): State<AppState>) -> impl IntoResponse {
    state.controller.close_view();
    back_to_dashboard()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unchecked_spot_box_means_on_demand() {
        let form = CreateInstanceForm {
            name: " web ".into(),
            owner: "ana".into(),
            instance_type: "t3.small".into(),
            department: "ops".into(),
            image_id: "ami-1".into(),
            is_spot: None,
        };
        let request = form.into_request();
        assert_eq!(request.name, "web");
        assert!(!request.is_spot);
        assert!(request.has_image());
    }
}
