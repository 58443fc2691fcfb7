use serde::Deserialize;

use super::client::api_call;
use crate::error::ApiError;
use crate::models::{ActionResponse, CreateInstanceRequest, CreatedInstance, Instance, InstanceAction, PowerState};

pub const INSTANCES_ENDPOINT: &str = "/api/aws/";
pub const CREATE_ENDPOINT: &str = "/api/aws/create";
pub const STATUS_ENDPOINT: &str = "/api/aws/status";

#[derive(Deserialize)]
struct InstanceList {
    #[serde(default)]
    instances: Vec<Instance>,
}

#[derive(Deserialize)]
struct StatusPayload {
    status: String,
}

fn decode<T: serde::de::DeserializeOwned>(payload: serde_json::Value) -> Result<T, ApiError> {
    serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))
}

/// Load every instance, bypassing the backend's listing cache.
pub async fn load_instances(client: &reqwest::Client, api_base_url: &str) -> Result<Vec<Instance>, ApiError> {
    let payload = api_call(
        client,
        api_base_url,
        "GET",
        INSTANCES_ENDPOINT,
        None,
        &[("force_refresh", "true")],
    )
    .await?;
    let list: InstanceList = decode(payload)?;
    tracing::debug!(count = list.instances.len(), "loaded instances");
    Ok(list.instances)
}

pub async fn get_instance_status(
    client: &reqwest::Client,
    api_base_url: &str,
    instance_id: &str,
) -> Result<PowerState, ApiError> {
    let payload = api_call(
        client,
        api_base_url,
        "GET",
        STATUS_ENDPOINT,
        None,
        &[("instance_id", instance_id)],
    )
    .await?;
    let status: StatusPayload = decode(payload)?;
    Ok(PowerState::from(status.status))
}

pub async fn create_instance(
    client: &reqwest::Client,
    api_base_url: &str,
    request: &CreateInstanceRequest,
) -> Result<CreatedInstance, ApiError> {
    let body = serde_json::to_value(request).map_err(|e| ApiError::Decode(e.to_string()))?;
    let payload = api_call(client, api_base_url, "POST", CREATE_ENDPOINT, Some(&body), &[]).await?;
    decode(payload)
}

pub async fn instance_action(
    client: &reqwest::Client,
    api_base_url: &str,
    action: InstanceAction,
    instance_id: &str,
) -> Result<ActionResponse, ApiError> {
    let endpoint = format!("/api/aws/{}", action.as_str());
    let payload = api_call(
        client,
        api_base_url,
        "POST",
        &endpoint,
        None,
        &[("instance_id", instance_id)],
    )
    .await?;
    decode(payload)
}
