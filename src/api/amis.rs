use serde::Deserialize;

use super::client::api_call;
use crate::error::ApiError;
use crate::models::MachineImage;

pub const AMIS_ENDPOINT: &str = "/api/aws/amis/";

#[derive(Deserialize)]
struct AmiList {
    #[serde(default)]
    amis: Vec<MachineImage>,
}

/// Load the images offered for new instances.
pub async fn load_amis(client: &reqwest::Client, api_base_url: &str) -> Result<Vec<MachineImage>, ApiError> {
    let payload = api_call(client, api_base_url, "GET", AMIS_ENDPOINT, None, &[]).await?;
    let list: AmiList = serde_json::from_value(payload).map_err(|e| ApiError::Decode(e.to_string()))?;
    Ok(list.amis)
}
