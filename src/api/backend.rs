use async_trait::async_trait;

use super::client::ApiClient;
use super::{amis, instances};
use crate::error::ApiError;
use crate::models::{ActionResponse, CreateInstanceRequest, CreatedInstance, Instance, InstanceAction, MachineImage, PowerState};

/// The backend operations the instance controller depends on.
#[async_trait]
pub trait InstanceBackend: Send + Sync {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiError>;
    async fn list_amis(&self) -> Result<Vec<MachineImage>, ApiError>;
    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance, ApiError>;
    async fn instance_status(&self, instance_id: &str) -> Result<PowerState, ApiError>;
    async fn instance_action(&self, action: InstanceAction, instance_id: &str) -> Result<ActionResponse, ApiError>;
}

#[async_trait]
impl InstanceBackend for ApiClient {
    async fn list_instances(&self) -> Result<Vec<Instance>, ApiError> {
        instances::load_instances(self.http(), self.api_base_url()).await
    }

    async fn list_amis(&self) -> Result<Vec<MachineImage>, ApiError> {
        amis::load_amis(self.http(), self.api_base_url()).await
    }

    async fn create_instance(&self, request: &CreateInstanceRequest) -> Result<CreatedInstance, ApiError> {
        instances::create_instance(self.http(), self.api_base_url(), request).await
    }

    async fn instance_status(&self, instance_id: &str) -> Result<PowerState, ApiError> {
        instances::get_instance_status(self.http(), self.api_base_url(), instance_id).await
    }

    async fn instance_action(&self, action: InstanceAction, instance_id: &str) -> Result<ActionResponse, ApiError> {
        instances::instance_action(self.http(), self.api_base_url(), action, instance_id).await
    }
}
