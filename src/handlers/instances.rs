use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
};

use ec2dash::models::InstanceAction;

use crate::app_state::AppState;
use super::helpers::back_to_dashboard;

pub async fn instance_open_post(
    State(state): State<AppState>,
    Path(instance_id): Path<String>,
) -> impl IntoResponse {
    state.controller.open_instance(&instance_id);
    back_to_dashboard()
}

/// Start and stop run in the background; terminate only opens its confirmation.
pub async fn instance_action_post(
    State(state): State<AppState>,
    Path((instance_id, action)): Path<(String, String)>,
) -> impl IntoResponse {
    let action: InstanceAction = match action.parse() {
        Ok(a) => a,
        Err(e) => return (StatusCode::NOT_FOUND, e).into_response(),
    };

    if !action.polls_for_state() {
        state.controller.request_terminate(&instance_id);
        return back_to_dashboard();
    }

    let controller = state.controller.clone();
    tokio::spawn(async move {
        if let Err(e) = controller.perform_action(action, &instance_id).await {
            tracing::debug!(instance_id = %instance_id, %action, error = %e, "instance action ended with error");
        }
    });
    back_to_dashboard()
}

pub async fn terminate_confirm_post(State(state): State<AppState>) -> impl IntoResponse {
    let controller = state.controller.clone();
    tokio::spawn(async move {
        if let Err(e) = controller.confirm_terminate().await {
            tracing::debug!(error = %e, "terminate ended with error");
        }
    });
    back_to_dashboard()
}
